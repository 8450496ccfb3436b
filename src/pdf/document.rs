use anyhow::{Context, Result};
use lopdf::{Document, Object, ObjectId};
use std::path::Path;
use std::str::FromStr;

use crate::page_range::PageIndex;
use crate::pdf::assemble::DocumentAssembler;

pub struct PdfDocument {
    pub doc: Document,
    #[allow(dead_code)]
    pub path: String,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().display().to_string();
        let doc =
            Document::load(&path).with_context(|| format!("Failed to open PDF: {}", path_str))?;
        Ok(PdfDocument {
            doc,
            path: path_str,
        })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Page object ids in document order.
    pub fn page_ids(&self) -> Vec<ObjectId> {
        self.doc.get_pages().into_values().collect()
    }

    /// Get metadata from the document info dictionary
    pub fn get_info(&self) -> PdfInfo {
        let mut info = PdfInfo::default();

        if let Ok(info_obj) = self.doc.trailer.get(b"Info") {
            if let Object::Reference(info_ref) = info_obj {
                if let Ok(Object::Dictionary(dict)) = self.doc.get_object(*info_ref) {
                    info.title = get_string_from_dict(dict, b"Title");
                    info.author = get_string_from_dict(dict, b"Author");
                    info.creator = get_string_from_dict(dict, b"Creator");
                    info.producer = get_string_from_dict(dict, b"Producer");
                    info.creation_date = get_string_from_dict(dict, b"CreationDate");
                    info.mod_date = get_string_from_dict(dict, b"ModDate");
                    info.subject = get_string_from_dict(dict, b"Subject");
                    info.keywords = get_string_from_dict(dict, b"Keywords");
                }
            }
        }

        info.page_count = self.page_count();
        info
    }

    /// Copy the given pages, in the given order, into a new document.
    ///
    /// Position in the slice is position in the output; the list is not
    /// sorted here.
    pub fn assemble(&self, pages: &[PageIndex]) -> Result<Document> {
        let mut assembler = DocumentAssembler::new();
        assembler.append_pages(&self.doc, pages)?;
        Ok(assembler.finish())
    }

    /// Add a clockwise rotation to each of the given pages in place.
    pub fn rotate_pages(&mut self, pages: &[PageIndex], rotation: Rotation) -> Result<()> {
        let page_ids = self.page_ids();
        let total = page_ids.len();
        for &page in pages {
            if page.as_usize() >= total {
                anyhow::bail!("Page {} is out of range (1-{})", page.number(), total);
            }
        }

        for &page in pages {
            let id = page_ids[page.as_usize()];
            let dict = self
                .doc
                .get_dictionary_mut(id)
                .with_context(|| format!("Page {} has no dictionary", page.number()))?;
            let current = dict
                .get(b"Rotate")
                .ok()
                .and_then(|object| object.as_i64().ok())
                .unwrap_or(0);
            let degrees = (current + rotation.degrees()).rem_euclid(360);
            dict.set("Rotate", Object::Integer(degrees));
        }

        Ok(())
    }

    /// Save to a file
    pub fn save<P: AsRef<Path>>(doc: &mut Document, path: P) -> Result<()> {
        doc.save(&path)
            .with_context(|| format!("Failed to save PDF: {}", path.as_ref().display()))?;
        Ok(())
    }
}

/// Clockwise page rotation in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Right, // 90°
    Down,  // 180°
    Left,  // 270°
}

impl Rotation {
    pub fn degrees(self) -> i64 {
        match self {
            Rotation::Right => 90,
            Rotation::Down => 180,
            Rotation::Left => 270,
        }
    }
}

impl FromStr for Rotation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "90" => Ok(Rotation::Right),
            "180" => Ok(Rotation::Down),
            "270" => Ok(Rotation::Left),
            _ => Err(anyhow::anyhow!(
                "Rotation must be 90, 180, or 270 (got {:?})",
                s
            )),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct PdfInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub mod_date: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub page_count: u32,
}

fn get_string_from_dict(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key).ok().and_then(|obj| match obj {
        Object::String(bytes, _) => decode_pdf_string(bytes),
        _ => None,
    })
}

fn decode_pdf_string(bytes: &[u8]) -> Option<String> {
    // Check for UTF-16 BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        // UTF-16 BE
        let u16_chars: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|chunk| {
                if chunk.len() == 2 {
                    Some(u16::from_be_bytes([chunk[0], chunk[1]]))
                } else {
                    None
                }
            })
            .collect();
        String::from_utf16(&u16_chars).ok()
    } else {
        // Try as Latin-1 / PDFDocEncoding (simplified)
        Some(bytes.iter().map(|&b| b as char).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::assemble::sample_document;

    fn rotation_of(doc: &Document, position: usize) -> i64 {
        let page_id = doc.get_pages().into_values().nth(position).unwrap();
        doc.get_dictionary(page_id)
            .unwrap()
            .get(b"Rotate")
            .ok()
            .and_then(|object| object.as_i64().ok())
            .unwrap_or(0)
    }

    #[test]
    fn test_rotate_accumulates_and_wraps() {
        let mut doc = PdfDocument {
            doc: sample_document(3),
            path: String::from("sample"),
        };
        doc.rotate_pages(&[PageIndex::new(0)], Rotation::Right).unwrap();
        assert_eq!(rotation_of(&doc.doc, 0), 90);
        assert_eq!(rotation_of(&doc.doc, 1), 0);

        doc.rotate_pages(&[PageIndex::new(0)], Rotation::Left).unwrap();
        assert_eq!(rotation_of(&doc.doc, 0), 0);
    }

    #[test]
    fn test_rotate_rejects_out_of_range() {
        let mut doc = PdfDocument {
            doc: sample_document(2),
            path: String::from("sample"),
        };
        assert!(doc.rotate_pages(&[PageIndex::new(5)], Rotation::Down).is_err());
    }

    #[test]
    fn test_rotation_from_str() {
        assert_eq!("90".parse::<Rotation>().unwrap(), Rotation::Right);
        assert_eq!(" 180 ".parse::<Rotation>().unwrap(), Rotation::Down);
        assert_eq!("270".parse::<Rotation>().unwrap(), Rotation::Left);
        assert!("45".parse::<Rotation>().is_err());
    }
}
