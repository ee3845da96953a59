use serde::{Deserialize, Serialize};

use super::ExtractionError;
use crate::models::ExtractionMethod;

/// Text recovered from an uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizedText {
    pub method: ExtractionMethod,
    pub text: String,
}

/// Turns an uploaded file into report text (allows mocking for tests)
pub trait TextRecognizer {
    fn recognize(&self, bytes: &[u8], mime_type: &str) -> Result<RecognizedText, ExtractionError>;
}

/// Broad file category derived from a MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    PlainText,
    Pdf,
    Image,
    Unsupported,
}

impl FileCategory {
    pub fn from_mime(mime_type: &str) -> Self {
        // Drop parameters such as "; charset=utf-8"
        let essence = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "application/pdf" => Self::Pdf,
            m if m.starts_with("text/") => Self::PlainText,
            m if m.starts_with("image/") => Self::Image,
            _ => Self::Unsupported,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorizes_common_types() {
        assert_eq!(FileCategory::from_mime("application/pdf"), FileCategory::Pdf);
        assert_eq!(FileCategory::from_mime("image/jpeg"), FileCategory::Image);
        assert_eq!(FileCategory::from_mime("IMAGE/PNG"), FileCategory::Image);
        assert_eq!(FileCategory::from_mime("text/plain"), FileCategory::PlainText);
    }

    #[test]
    fn ignores_mime_parameters() {
        assert_eq!(
            FileCategory::from_mime("text/plain; charset=utf-8"),
            FileCategory::PlainText
        );
    }

    #[test]
    fn unknown_types_are_unsupported() {
        assert_eq!(FileCategory::from_mime("application/zip"), FileCategory::Unsupported);
        assert_eq!(FileCategory::from_mime(""), FileCategory::Unsupported);
    }
}
