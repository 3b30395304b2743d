use thiserror::Error;

/// Extraction failures.
///
/// The `Display` form is the text shown inline to the user when failures are
/// embedded into the extracted text rather than surfaced.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Error extracting PDF text: {0}")]
    Pdf(String),

    #[error("Error extracting image text: {0}")]
    Image(String),

    #[error("Error extracting image text: {0}")]
    Ocr(String),

    #[error("Error extracting CSV text: {0}")]
    Csv(String),

    #[error("Error extracting CSV text: {0}")]
    Encoding(String),
}

impl From<csv::Error> for ExtractError {
    fn from(err: csv::Error) -> Self {
        ExtractError::Csv(err.to_string())
    }
}

impl From<image::ImageError> for ExtractError {
    fn from(err: image::ImageError) -> Self {
        ExtractError::Image(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
