//! Input manager for loading the resume and the job description

use crate::config::UnsupportedPolicy;
use crate::error::{CvMatchError, Result};
use crate::input::file_detector::ResumeFormat;
use crate::input::text_extractor::{DocxExtractor, PdfExtractor, TextExtractor};
use log::{debug, info};
use std::path::Path;
use tokio::fs;

/// Outcome of resume extraction
#[derive(Debug, Clone, PartialEq)]
pub enum ResumeText {
    Extracted { format: ResumeFormat, text: String },
    /// The file name does not carry a supported extension; the file was not opened.
    Unsupported { file_name: String },
}

impl ResumeText {
    /// Apply the unsupported-format policy and yield the text to work with.
    pub fn into_text(self, policy: UnsupportedPolicy) -> Result<String> {
        match (self, policy) {
            (ResumeText::Extracted { text, .. }, _) => Ok(text),
            (ResumeText::Unsupported { file_name }, UnsupportedPolicy::Empty) => {
                debug!("Unsupported resume format for {}, using empty text", file_name);
                Ok(String::new())
            }
            (ResumeText::Unsupported { file_name }, UnsupportedPolicy::Reject) => {
                Err(CvMatchError::UnsupportedFormat(format!(
                    "Resume must be a PDF or DOCX file: {}",
                    file_name
                )))
            }
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, ResumeText::Extracted { .. })
    }
}

#[derive(Debug, Default)]
pub struct InputManager;

impl InputManager {
    pub fn new() -> Self {
        Self
    }

    pub async fn extract_resume(&self, path: &Path) -> Result<ResumeText> {
        let format = ResumeFormat::from_path(path);

        let text = match format {
            ResumeFormat::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            ResumeFormat::Docx => {
                info!("Extracting text from DOCX: {}", path.display());
                DocxExtractor.extract(path).await?
            }
            ResumeFormat::Unsupported => {
                return Ok(ResumeText::Unsupported {
                    file_name: path.display().to_string(),
                });
            }
        };

        debug!("Extracted {} characters from {}", text.chars().count(), path.display());
        Ok(ResumeText::Extracted { format, text })
    }

    pub async fn read_job_description(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(CvMatchError::InvalidInput(format!(
                "Job description file does not exist: {}",
                path.display()
            )));
        }

        info!("Reading job description: {}", path.display());
        let content = fs::read_to_string(path).await.map_err(CvMatchError::Io)?;
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_policy() {
        let unsupported = ResumeText::Unsupported {
            file_name: "cv.txt".to_string(),
        };
        assert!(!unsupported.is_supported());
        assert_eq!(unsupported.clone().into_text(UnsupportedPolicy::Empty).unwrap(), "");
        assert!(matches!(
            unsupported.into_text(UnsupportedPolicy::Reject),
            Err(CvMatchError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_extracted_text_ignores_policy() {
        let extracted = ResumeText::Extracted {
            format: ResumeFormat::Docx,
            text: "Rust engineer".to_string(),
        };
        assert_eq!(extracted.into_text(UnsupportedPolicy::Reject).unwrap(), "Rust engineer");
    }
}
