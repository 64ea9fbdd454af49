//! Resume format detection

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    Docx,
    Unsupported,
}

impl ResumeFormat {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => ResumeFormat::Pdf,
            "docx" => ResumeFormat::Docx,
            _ => ResumeFormat::Unsupported,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(ResumeFormat::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection() {
        assert_eq!(ResumeFormat::from_path(Path::new("cv.pdf")), ResumeFormat::Pdf);
        assert_eq!(ResumeFormat::from_path(Path::new("cv.PDF")), ResumeFormat::Pdf);
        assert_eq!(ResumeFormat::from_path(Path::new("dir/cv.docx")), ResumeFormat::Docx);
        assert_eq!(ResumeFormat::from_path(Path::new("cv.txt")), ResumeFormat::Unsupported);
        assert_eq!(ResumeFormat::from_path(Path::new("cv.doc")), ResumeFormat::Unsupported);
        assert_eq!(ResumeFormat::from_path(Path::new("resume")), ResumeFormat::Unsupported);
    }
}
