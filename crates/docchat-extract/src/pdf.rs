use std::panic::{self, AssertUnwindSafe};

use crate::error::{ExtractError, Result};

/// Extracts text from an in-memory PDF, one page at a time.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    let pages = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }))
    .map_err(|_| ExtractError::Pdf("malformed PDF document".to_string()))?
    .map_err(|e| ExtractError::Pdf(e.to_string()))?;

    tracing::debug!(pages = pages.len(), "Extracted PDF pages");

    Ok(join_pages(pages))
}

/// Joins page texts with single newlines and trims the result.
///
/// pdf-extract wraps each page in layout line breaks; those are stripped per
/// page so consecutive pages are separated by exactly one newline.
pub fn join_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    pages
        .into_iter()
        .map(|page| page.as_ref().trim_matches(&['\n', '\r'][..]).to_string())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
