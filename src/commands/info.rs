use crate::pdf::PdfDocument;
use anyhow::Result;
use std::path::Path;

pub fn run<P: AsRef<Path>>(path: P) -> Result<()> {
    let doc = PdfDocument::open(&path)?;
    let info = doc.get_info();

    println!("File: {}", path.as_ref().display());
    println!("Pages: {}", info.page_count);

    let fields = [
        ("Title", &info.title),
        ("Author", &info.author),
        ("Subject", &info.subject),
        ("Keywords", &info.keywords),
        ("Creator", &info.creator),
        ("Producer", &info.producer),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("{}: {}", label, value);
        }
    }

    if let Some(date) = &info.creation_date {
        println!("Created: {}", format_pdf_date(date));
    }
    if let Some(date) = &info.mod_date {
        println!("Modified: {}", format_pdf_date(date));
    }

    Ok(())
}

fn format_pdf_date(date: &str) -> String {
    // PDF date format: D:YYYYMMDDHHmmSSOHH'mm
    // Try to make it more readable
    if date.starts_with("D:") && date.len() >= 10 {
        let d = &date[2..];
        if d.len() >= 8 {
            let year = &d[0..4];
            let month = &d[4..6];
            let day = &d[6..8];
            let time = if d.len() >= 14 {
                format!(" {}:{}:{}", &d[8..10], &d[10..12], &d[12..14])
            } else {
                String::new()
            };
            return format!("{}-{}-{}{}", year, month, day, time);
        }
    }
    date.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pdf_date() {
        assert_eq!(format_pdf_date("D:20240131120000Z"), "2024-01-31 12:00:00");
        assert_eq!(format_pdf_date("D:20240131"), "2024-01-31");
        assert_eq!(format_pdf_date("yesterday"), "yesterday");
    }
}
