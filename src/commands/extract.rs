use crate::commands::warn_rejected;
use crate::page_range::Selection;
use crate::pdf::PdfDocument;
use anyhow::Result;
use std::path::Path;

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(input: P, pages: &str, output: Q) -> Result<()> {
    let doc = PdfDocument::open(&input)?;
    let total_pages = doc.page_count();

    let (selection, rejected) = Selection::parse_report(pages, total_pages);
    warn_rejected(&rejected);

    if selection.is_empty() {
        anyhow::bail!("{:?} selects no pages (document has {})", pages, total_pages);
    }

    let mut new_doc = doc.assemble(selection.indices())?;
    PdfDocument::save(&mut new_doc, &output)?;

    println!(
        "Extracted {} page(s) to {}",
        selection.len(),
        output.as_ref().display()
    );

    Ok(())
}
