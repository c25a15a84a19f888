// src/source/text.rs
use crate::source::Document;
use crate::utils::error::SourceError;

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Text,
}

impl DocumentFormat {
    /// Sniffs the format from content, ignoring file extensions.
    pub fn detect(bytes: &[u8]) -> Self {
        // Some generators put a BOM or whitespace before the header
        let head = &bytes[..bytes.len().min(1024)];
        if head.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC) {
            DocumentFormat::Pdf
        } else {
            DocumentFormat::Text
        }
    }
}

/// Converts a document into the newline-delimited text the engine reads.
/// PDF decoding is CPU-bound, so callers on the async runtime should go
/// through [`crate::source::document_text`].
pub fn extract_text(document: &Document) -> Result<String, SourceError> {
    let raw = match DocumentFormat::detect(&document.bytes) {
        DocumentFormat::Pdf => {
            tracing::debug!("Extracting PDF text from {} ({} bytes)", document.name, document.bytes.len());
            pdf_extract::extract_text_from_mem(&document.bytes)
                .map_err(|e| SourceError::PdfText(format!("{}: {}", document.name, e)))?
        }
        DocumentFormat::Text => String::from_utf8(document.bytes.clone())
            .map_err(|e| SourceError::InvalidText(format!("{}: {}", document.name, e)))?,
    };
    Ok(clean_text(&raw))
}

/// Removes NUL and byte-order-mark characters left behind by converters.
pub fn clean_text(text: &str) -> String {
    text.chars().filter(|c| *c != '\u{0}' && *c != '\u{FEFF}').collect()
}
