use crate::error::ParseError;
use tracing::{debug, info};

const PDF_MAGIC: &[u8] = b"%PDF-";

/// True when the buffer starts with the PDF header.
pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Split an in-memory PDF into per-page text, in page order.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, ParseError> {
    if !is_pdf(bytes) {
        return Err(ParseError::NotPdf);
    }
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| ParseError::Pdf(e.to_string()))?;
    debug!("Extracted {} pages", pages.len());
    Ok(pages)
}

/// Concatenate page texts with no separator.
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    pages.iter().map(|p| p.as_ref()).collect()
}

/// Parse a downloaded PDF into a single text, off the async runtime.
///
/// A PDF with no extractable text (e.g. a scanned image) is an error.
pub async fn extract_text(bytes: Vec<u8>) -> Result<String, ParseError> {
    // pdf-extract can panic on malformed files; a panicked task surfaces as a JoinError.
    let pages = tokio::task::spawn_blocking(move || extract_pages(&bytes))
        .await
        .map_err(|e| ParseError::Pdf(e.to_string()))??;

    let text = join_pages(&pages);
    if text.trim().is_empty() {
        return Err(ParseError::EmptyDocument);
    }
    info!(
        "Extracted {} characters from {} pages",
        text.chars().count(),
        pages.len()
    );
    Ok(text)
}
