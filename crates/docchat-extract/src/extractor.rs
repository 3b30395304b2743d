use std::sync::Arc;

use crate::error::Result;
use crate::kind::DocumentKind;
use crate::ocr::{self, OcrEngine, TesseractOcr};
use crate::{pdf, tabular, UNSUPPORTED_FORMAT_MESSAGE};

/// Routes an uploaded file to the backend matching its extension.
#[derive(Clone)]
pub struct DocumentExtractor {
    ocr: Arc<dyn OcrEngine>,
}

impl DocumentExtractor {
    pub fn new(ocr: Arc<dyn OcrEngine>) -> Self {
        Self { ocr }
    }

    /// Extract plain text from `bytes`.
    ///
    /// Unsupported extensions are not an error: they return
    /// [`UNSUPPORTED_FORMAT_MESSAGE`].
    pub fn extract(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        let kind = DocumentKind::from_filename(filename);

        tracing::debug!(
            filename = %filename,
            kind = %kind,
            size = bytes.len(),
            "Extracting document"
        );

        match kind {
            DocumentKind::Pdf => pdf::extract_pdf_text(bytes),
            DocumentKind::Image => {
                let image = ocr::decode_image(bytes)?;
                let text = self.ocr.recognize(&image)?;
                Ok(text.trim().to_string())
            }
            DocumentKind::Csv => tabular::extract_csv_text(bytes),
            DocumentKind::Unsupported => Ok(UNSUPPORTED_FORMAT_MESSAGE.to_string()),
        }
    }

    /// Like [`extract`](Self::extract), but a failure becomes its message text.
    pub fn extract_or_describe(&self, filename: &str, bytes: &[u8]) -> String {
        self.extract(filename, bytes).unwrap_or_else(|e| {
            tracing::warn!(filename = %filename, error = %e, "Document extraction failed");
            e.to_string()
        })
    }
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new(Arc::new(TesseractOcr::default()))
    }
}
