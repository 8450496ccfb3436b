use crate::commands::warn_rejected;
use crate::page_range::Selection;
use crate::pdf::{PdfDocument, Rotation};
use anyhow::Result;
use std::path::Path;

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    pages: &str,
    rotation: Rotation,
    output: Q,
) -> Result<()> {
    let mut doc = PdfDocument::open(&input)?;
    let total_pages = doc.page_count();

    let (selection, rejected) = Selection::parse_report(pages, total_pages);
    warn_rejected(&rejected);

    if selection.is_empty() {
        anyhow::bail!("{:?} selects no pages (document has {})", pages, total_pages);
    }

    doc.rotate_pages(selection.indices(), rotation)?;
    PdfDocument::save(&mut doc.doc, &output)?;

    println!(
        "Rotated {} page(s) by {} degrees in {}",
        selection.len(),
        rotation.degrees(),
        output.as_ref().display()
    );

    Ok(())
}
