// src/source/mod.rs
pub mod client;
pub mod text;

use std::path::{Path, PathBuf};

use tokio::io::AsyncReadExt;

use crate::utils::error::SourceError;

pub use text::DocumentFormat;

/// Uploads above this size are refused.
pub const MAX_DOCUMENT_BYTES: usize = 50 * 1024 * 1024;

/// Raw bytes of one report plus a display name.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(name: String, bytes: Vec<u8>) -> Result<Self, SourceError> {
        if bytes.len() > MAX_DOCUMENT_BYTES {
            return Err(SourceError::TooLarge { size: bytes.len(), limit: MAX_DOCUMENT_BYTES });
        }
        Ok(Self { name, bytes })
    }

    /// File-system friendly name without extension, used for output paths.
    pub fn stem(&self) -> String {
        path_safe_stem(&self.name)
    }
}

fn path_safe_stem(name: &str) -> String {
    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name);
    let cleaned: String = stem
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.trim_matches('_').is_empty() {
        "document".to_string()
    } else {
        cleaned
    }
}

/// Where a document comes from, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Path(PathBuf),
    Url(String),
    Stdin,
}

impl DocumentSource {
    pub fn parse(input: &str) -> Self {
        if input == "-" {
            DocumentSource::Stdin
        } else if input.starts_with("http://") || input.starts_with("https://") {
            DocumentSource::Url(input.to_string())
        } else {
            DocumentSource::Path(PathBuf::from(input))
        }
    }

    /// Name the loaded [`Document`] will carry.
    pub fn document_name(&self) -> String {
        match self {
            DocumentSource::Path(path) => path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("document")
                .to_string(),
            DocumentSource::Url(url) => client::name_from_url(url),
            DocumentSource::Stdin => "stdin".to_string(),
        }
    }

    /// Same as [`Document::stem`] of the loaded document, known before loading.
    pub fn stem(&self) -> String {
        path_safe_stem(&self.document_name())
    }

    pub fn label(&self) -> String {
        match self {
            DocumentSource::Path(path) => path.display().to_string(),
            DocumentSource::Url(url) => url.clone(),
            DocumentSource::Stdin => "<stdin>".to_string(),
        }
    }
}

/// Reads the raw bytes of a document.
pub async fn load_document(source: &DocumentSource) -> Result<Document, SourceError> {
    match source {
        DocumentSource::Path(path) => {
            let metadata = tokio::fs::metadata(path).await.map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => SourceError::NotFound(path.display().to_string()),
                _ => SourceError::Io(e),
            })?;
            let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
            if size > MAX_DOCUMENT_BYTES {
                return Err(SourceError::TooLarge { size, limit: MAX_DOCUMENT_BYTES });
            }
            let bytes = tokio::fs::read(path).await?;
            let name = source.document_name();
            tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());
            Document::new(name, bytes)
        }
        DocumentSource::Url(url) => client::download_document(url).await,
        DocumentSource::Stdin => {
            let mut bytes = Vec::new();
            // one byte over the limit is enough to know it is too large
            tokio::io::stdin()
                .take(MAX_DOCUMENT_BYTES as u64 + 1)
                .read_to_end(&mut bytes)
                .await?;
            Document::new(source.document_name(), bytes)
        }
    }
}

/// Text of a document, with PDF decoding moved off the async workers.
pub async fn document_text(document: Document) -> Result<String, SourceError> {
    let name = document.name.clone();
    tokio::task::spawn_blocking(move || text::extract_text(&document))
        .await
        .map_err(|e| SourceError::PdfText(format!("{}: text extraction aborted: {}", name, e)))?
}

/// Loads a document and converts it to text in one step.
pub async fn load_text(source: &DocumentSource) -> Result<(Document, String), SourceError> {
    let document = load_document(source).await?;
    let text = document_text(document.clone()).await?;
    Ok((document, text))
}
