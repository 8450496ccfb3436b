use crate::page_range::Selection;
use crate::pdf::assemble::DocumentAssembler;
use crate::pdf::PdfDocument;
use anyhow::{Context, Result};
use lopdf::Document;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub fn run(inputs: &[PathBuf], output: &Path) -> Result<()> {
    let files = expand_inputs(inputs)?;
    if files.is_empty() {
        anyhow::bail!("No input files specified");
    }

    if files.len() == 1 {
        // Just copy the single file
        std::fs::copy(&files[0], output).with_context(|| {
            format!(
                "Failed to copy {} to {}",
                files[0].display(),
                output.display()
            )
        })?;
        println!("Copied 1 file to {}", output.display());
        return Ok(());
    }

    let mut assembler = DocumentAssembler::new();
    let mut total_pages = 0u32;
    for file in &files {
        let doc = Document::load(file)
            .with_context(|| format!("Failed to load PDF: {}", file.display()))?;
        let pages = doc.get_pages().len() as u32;
        assembler.append_pages(&doc, Selection::all(pages).indices())?;
        total_pages += pages;
    }

    let mut merged = assembler.finish();
    PdfDocument::save(&mut merged, output)?;

    println!(
        "Merged {} files ({} pages) into {}",
        files.len(),
        total_pages,
        output.display()
    );

    Ok(())
}

/// Directories expand to the PDF files under them, in path order.
fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            for entry in WalkDir::new(input) {
                let entry =
                    entry.with_context(|| format!("Failed to walk {}", input.display()))?;
                if entry.file_type().is_file() && is_pdf(entry.path()) {
                    found.push(entry.into_path());
                }
            }
            if found.is_empty() {
                anyhow::bail!("No PDF files found under {}", input.display());
            }
            found.sort();
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::assemble::sample_document;

    #[test]
    fn test_merges_pages_from_all_inputs() {
        let dir = std::env::temp_dir().join(format!("repage-merge-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let first = dir.join("a.pdf");
        let second = dir.join("b.pdf");
        let output = dir.join("merged.pdf");
        sample_document(2).save(&first).unwrap();
        sample_document(3).save(&second).unwrap();

        run(&[first, second], &output).unwrap();
        let merged = Document::load(&output).unwrap();
        assert_eq!(merged.get_pages().len(), 5);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf(Path::new("a.pdf")));
        assert!(is_pdf(Path::new("a.PDF")));
        assert!(!is_pdf(Path::new("a.txt")));
        assert!(!is_pdf(Path::new("pdf")));
    }
}
