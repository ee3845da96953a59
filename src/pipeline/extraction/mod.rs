pub mod types;
pub mod sanitize;
pub mod ocr;
pub mod vitals;

pub use types::*;
pub use sanitize::*;
pub use ocr::*;
pub use vitals::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Unsupported format for extraction: {0}")]
    UnsupportedFormat(String),

    #[error("Text encoding error: {0}")]
    EncodingError(String),

    #[error("Document contains no text")]
    EmptyDocument,
}
