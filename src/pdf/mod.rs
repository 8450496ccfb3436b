pub mod assemble;
pub mod document;

pub use document::{PdfDocument, Rotation};
