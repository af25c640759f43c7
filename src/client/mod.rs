//! Content repository boundary
//!
//! [`ContentRepository`] is the seam the rest of the crate talks to. The
//! HTTP implementation is [`ContentClient`]; tests substitute an in-memory
//! repository.

mod http;
#[cfg(test)]
pub(crate) mod memory;

use async_trait::async_trait;

use crate::content::{ApiPage, RawDocument};
use crate::error::Result;

pub use http::ContentClient;

/// A predicate query over documents of a single type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub document_type: String,
    pub fetch: Vec<String>,
    pub page_size: usize,
}

impl Query {
    /// Query every document of `document_type`
    pub fn documents(document_type: &str) -> Self {
        Self {
            document_type: document_type.to_string(),
            fetch: Vec::new(),
            page_size: 20,
        }
    }

    /// Restrict the returned `data` to these fields
    pub fn fetch<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.fetch = fields
            .into_iter()
            .map(|f| f.as_ref().to_string())
            .collect();
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Predicate in the repository's query language
    pub fn predicate(&self) -> String {
        format!(r#"[[at(document.type, "{}")]]"#, escape_quotes(&self.document_type))
    }

    /// Field projection, qualified with the document type
    pub fn fetch_param(&self) -> Option<String> {
        if self.fetch.is_empty() {
            return None;
        }
        Some(
            self.fetch
                .iter()
                .map(|field| format!("{}.{}", self.document_type, field))
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

/// Predicate selecting one document by uid
pub fn uid_predicate(document_type: &str, uid: &str) -> String {
    format!(
        r#"[[at(my.{}.uid, "{}")]]"#,
        document_type,
        escape_quotes(uid)
    )
}

fn escape_quotes(s: &str) -> String {
    s.replace('"', "\\\"")
}

/// Source of raw documents
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Run a query and return its first page
    async fn query(&self, query: &Query) -> Result<ApiPage>;

    /// Fetch the page behind an opaque cursor URL
    async fn fetch_page(&self, cursor: &str) -> Result<ApiPage>;

    /// Look up a single document by type and uid
    async fn get_by_uid(&self, document_type: &str, uid: &str) -> Result<RawDocument>;
}
