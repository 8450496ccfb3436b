use crate::page_range::{PageNumber, Selection};
use crate::pdf::PdfDocument;
use anyhow::Result;
use std::path::Path;

pub fn run<P: AsRef<Path>>(input: P, pages: &str, toggles: &[u32]) -> Result<()> {
    let doc = PdfDocument::open(&input)?;
    let total_pages = doc.page_count();

    let (mut selection, rejected) = Selection::parse_report(pages, total_pages);

    // Toggles behave like clicking page tiles: they land in the same
    // selection the typed expression produced.
    for &number in toggles {
        match PageNumber::new(number).and_then(|n| n.index(total_pages)) {
            Some(index) => selection.toggle(index),
            None => eprintln!("warning: page {} is outside the document", number),
        }
    }

    println!("Document: {} page(s)", total_pages);
    if selection.is_empty() {
        println!("Selection: empty");
    } else {
        println!(
            "Selection: {} ({} page(s))",
            selection.format(),
            selection.len()
        );
    }
    for rejection in &rejected {
        println!("Dropped {:?}: {}", rejection.token, rejection.reason);
    }

    Ok(())
}
