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

    // The copy primitive only knows keep-lists.
    let keep = selection.complement(total_pages);
    if keep.is_empty() {
        anyhow::bail!(
            "Cannot remove every page ({} selected, document has {})",
            selection.len(),
            total_pages
        );
    }

    let mut new_doc = doc.assemble(keep.indices())?;
    PdfDocument::save(&mut new_doc, &output)?;

    println!(
        "Removed {} page(s), kept {} in {}",
        selection.len(),
        keep.len(),
        output.as_ref().display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::assemble::sample_document;
    use std::path::PathBuf;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("repage-{}-{}", tag, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_refuses_to_remove_every_page() {
        let dir = scratch_dir("remove-all");
        let input = dir.join("in.pdf");
        sample_document(3).save(&input).unwrap();

        let err = run(&input, "1-3", dir.join("out.pdf")).unwrap_err();
        assert!(err.to_string().contains("every page"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_removes_selected_pages() {
        let dir = scratch_dir("remove-some");
        let input = dir.join("in.pdf");
        let output = dir.join("out.pdf");
        sample_document(4).save(&input).unwrap();

        run(&input, "2, 4", &output).unwrap();
        let result = lopdf::Document::load(&output).unwrap();
        assert_eq!(result.get_pages().len(), 2);

        std::fs::remove_dir_all(&dir).ok();
    }
}
