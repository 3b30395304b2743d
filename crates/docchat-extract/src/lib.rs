//! Document-to-text extraction.
//!
//! A filename's extension picks one of three backends: PDF text extraction,
//! OCR over a decoded image, or a CSV rendered as a fixed-width table. Anything
//! else yields [`UNSUPPORTED_FORMAT_MESSAGE`] as ordinary text.

pub mod error;
pub mod extractor;
pub mod kind;
pub mod ocr;
pub mod pdf;
pub mod tabular;

pub use error::{ExtractError, Result};
pub use extractor::DocumentExtractor;
pub use kind::DocumentKind;
pub use ocr::{OcrEngine, TesseractOcr};

/// Returned (not raised) for files whose extension has no backend.
pub const UNSUPPORTED_FORMAT_MESSAGE: &str =
    "Unsupported file format. Please upload PDF, image, or CSV files.";
