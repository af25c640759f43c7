//! Errors raised by the content pipeline

use thiserror::Error;

/// Content repository and pagination errors
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Content repository returned {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Content repository at {0} has no master ref")]
    NoMasterRef(String),

    #[error("No more pages to load")]
    NoMorePages,

    #[error("Document not found: {doc_type}/{uid}")]
    NotFound { doc_type: String, uid: String },
}

impl ContentError {
    /// Whether this error belongs to the fetch-failure family
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            ContentError::Fetch { .. }
                | ContentError::Status { .. }
                | ContentError::Decode { .. }
                | ContentError::NoMasterRef(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;
