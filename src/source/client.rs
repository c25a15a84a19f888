// src/source/client.rs
use reqwest::header;
use std::time::Duration;

use crate::source::{Document, MAX_DOCUMENT_BYTES};
use crate::utils::error::SourceError;

const USER_AGENT: &str = concat!("indent_extractor/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Creates a reqwest client configured for report downloads.
fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
}

/// Downloads a report document (PDF or plain text) from its URL.
pub async fn download_document(url: &str) -> Result<Document, SourceError> {
    let client = build_client()?; // Propagate client build error if any

    tracing::info!("Downloading document from: {}", url);

    let response = client
        .get(url)
        .header(header::ACCEPT, "application/pdf,text/plain,*/*")
        .send()
        .await?; // Propagates reqwest::Error as SourceError::Network

    // Check if the request was successful (status code 2xx)
    let status = response.status();
    if !status.is_success() {
        tracing::error!("HTTP error status: {} for URL: {}", status, url);
        if status == reqwest::StatusCode::FORBIDDEN || status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(SourceError::Forbidden(url.to_string()));
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(url.to_string()));
        }
        return Err(SourceError::Http(status));
    }

    if let Some(length) = response.content_length() {
        let size = usize::try_from(length).unwrap_or(usize::MAX);
        if size > MAX_DOCUMENT_BYTES {
            return Err(SourceError::TooLarge { size, limit: MAX_DOCUMENT_BYTES });
        }
    }

    let bytes = response.bytes().await?;
    tracing::debug!("Successfully downloaded {} bytes from {}", bytes.len(), url);

    Document::new(name_from_url(url), bytes.to_vec())
}

/// Last path segment of a URL, without query or fragment.
pub fn name_from_url(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    without_query
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty() && !segment.contains(':'))
        .unwrap_or("document")
        .to_string()
}
