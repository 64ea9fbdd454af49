//! Text extraction from resume documents

use crate::error::{CvMatchError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await.map_err(CvMatchError::Io)?;

        // Pages are emitted in document order; a page without text adds nothing.
        let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            CvMatchError::PdfExtraction(format!("Failed to extract text from PDF '{}': {}", path.display(), e))
        })?;
        Ok(text)
    }
}

pub struct DocxExtractor;

const DOCUMENT_PART: &str = "word/document.xml";

impl TextExtractor for DocxExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await.map_err(CvMatchError::Io)?;

        let xml = Self::read_document_part(bytes).map_err(|e| {
            CvMatchError::DocxExtraction(format!("Failed to read DOCX '{}': {}", path.display(), e))
        })?;

        Self::document_text(&xml)
    }
}

impl DocxExtractor {
    fn read_document_part(bytes: Vec<u8>) -> std::result::Result<String, String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| e.to_string())?;
        let mut part = archive.by_name(DOCUMENT_PART).map_err(|e| e.to_string())?;

        let mut xml = String::new();
        part.read_to_string(&mut xml).map_err(|e| e.to_string())?;
        Ok(xml)
    }

    /// Flatten WordprocessingML into plain text: one line per paragraph,
    /// tabs and breaks preserved.
    pub fn document_text(xml: &str) -> Result<String> {
        let mut reader = Reader::from_str(xml);
        let mut text = String::new();
        let mut in_run_text = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"w:t" => in_run_text = true,
                    b"w:tab" => text.push('\t'),
                    b"w:br" | b"w:cr" => text.push('\n'),
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"w:tab" => text.push('\t'),
                    b"w:br" | b"w:cr" | b"w:p" => text.push('\n'),
                    _ => {}
                },
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"w:t" => in_run_text = false,
                    b"w:p" => text.push('\n'),
                    _ => {}
                },
                Ok(Event::Text(t)) if in_run_text => {
                    let unescaped = t.unescape().map_err(|e| {
                        CvMatchError::DocxExtraction(format!("Invalid text run: {}", e))
                    })?;
                    text.push_str(&unescaped);
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(CvMatchError::DocxExtraction(format!(
                        "Malformed document XML at position {}: {}",
                        reader.buffer_position(),
                        e
                    )));
                }
                _ => {}
            }
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_text_paragraphs() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Rust </w:t></w:r><w:r><w:t>&amp; Go</w:t></w:r></w:p>
    <w:p><w:r><w:t>Skills</w:t><w:tab/><w:t>SQL</w:t><w:br/><w:t>Kafka</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

        let text = DocxExtractor::document_text(xml).unwrap();
        assert_eq!(text, "Jane Doe\nRust & Go\nSkills\tSQL\nKafka\n");
    }

    #[test]
    fn test_document_text_ignores_non_text_elements() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t>Title</w:t></w:r></w:p><w:sectPr/></w:body></w:document>"#;
        let text = DocxExtractor::document_text(xml).unwrap();
        assert_eq!(text, "Title\n");
    }

    #[test]
    fn test_document_text_malformed() {
        let result = DocxExtractor::document_text("<w:document><w:p></w:document>");
        assert!(matches!(result, Err(CvMatchError::DocxExtraction(_))));
    }

    #[tokio::test]
    async fn test_docx_not_a_zip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.docx");
        std::fs::write(&path, b"definitely not a zip archive").unwrap();

        let result = DocxExtractor.extract(&path).await;
        assert!(matches!(result, Err(CvMatchError::DocxExtraction(_))));
    }

    #[tokio::test]
    async fn test_pdf_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"%PDF-1.4 garbage").unwrap();

        let result = PdfExtractor.extract(&path).await;
        assert!(result.is_err());
    }
}
