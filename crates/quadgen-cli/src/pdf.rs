//! Per-page text extraction from PDF documents.

use std::path::Path;

use anyhow::{Context, Result};
use lopdf::Document;
use tracing::warn;

/// One page of extracted text, numbered as in the document (1-based).
#[derive(Debug)]
pub struct PageText {
    pub page_number: u32,
    pub text: String,
}

/// Extract the text of every page. A page that fails text extraction
/// (scanned image, garbled encoding) is kept with empty text so page
/// numbering stays aligned with the document.
pub fn extract_pages(path: &Path) -> Result<Vec<PageText>> {
    let doc =
        Document::load(path).with_context(|| format!("cannot load PDF {}", path.display()))?;

    let mut pages = Vec::new();
    for (page_number, _page_id) in doc.get_pages() {
        let text = match doc.extract_text(&[page_number]) {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    "{}: page {page_number}: text extraction failed: {e}",
                    path.display()
                );
                String::new()
            }
        };
        pages.push(PageText { page_number, text });
    }
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_error() {
        let err = extract_pages(Path::new("/nonexistent/doc.pdf")).unwrap_err();
        assert!(err.to_string().contains("doc.pdf"), "{err:#}");
    }

    /// Build a minimal single-page PDF with a correct xref table.
    fn minimal_pdf() -> Vec<u8> {
        let objects = [
            "1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n",
            "2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n",
            "3 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >>\nendobj\n",
        ];

        let mut body = String::from("%PDF-1.4\n");
        let mut offsets = Vec::new();
        for obj in objects {
            offsets.push(body.len());
            body.push_str(obj);
        }

        let xref_at = body.len();
        body.push_str("xref\n0 4\n0000000000 65535 f \n");
        for off in offsets {
            body.push_str(&format!("{off:010} 00000 n \n"));
        }
        body.push_str(&format!(
            "trailer\n<< /Size 4 /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n"
        ));
        body.into_bytes()
    }

    #[test]
    fn test_extracts_pages_from_minimal_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("minimal.pdf");
        std::fs::write(&path, minimal_pdf()).unwrap();

        let pages = extract_pages(&path).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page_number, 1);
    }
}
