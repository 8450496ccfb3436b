use crate::commands::warn_rejected;
use crate::page_range::Selection;
use crate::pdf::PdfDocument;
use anyhow::{Context, Result};
use std::path::Path;

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output_dir: Q,
    pages: Option<&str>,
) -> Result<()> {
    let input = input.as_ref();
    let output_dir = output_dir.as_ref();

    // Create output directory if it doesn't exist
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    let doc = PdfDocument::open(input)?;
    let total_pages = doc.page_count();

    let selection = match pages {
        Some(expression) => {
            let (selection, rejected) = Selection::parse_report(expression, total_pages);
            warn_rejected(&rejected);
            if selection.is_empty() {
                anyhow::bail!(
                    "{:?} selects no pages (document has {})",
                    expression,
                    total_pages
                );
            }
            selection
        }
        None => Selection::all(total_pages),
    };

    // Get the base name of the input file
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("page");

    for page in selection.iter() {
        let output_path = output_dir.join(format!("{}_{:04}.pdf", stem, page.number()));

        let mut new_doc = doc.assemble(&[page])?;
        PdfDocument::save(&mut new_doc, &output_path)?;
    }

    println!(
        "Split {} page(s) into {}",
        selection.len(),
        output_dir.display()
    );

    Ok(())
}
