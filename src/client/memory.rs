//! In-memory repository serving canned pages

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{ContentRepository, Query};
use crate::content::{ApiPage, RawDocument};
use crate::error::{ContentError, Result};

/// Serves a fixed chain of pages linked by `memory://page/<n>` cursors
pub(crate) struct MemoryRepository {
    pages: Vec<Vec<RawDocument>>,
    documents: HashMap<String, RawDocument>,
    failing_cursors: Vec<String>,
    requests: Mutex<Vec<String>>,
}

impl MemoryRepository {
    pub(crate) fn new(pages: Vec<Vec<RawDocument>>) -> Self {
        let documents = pages
            .iter()
            .flatten()
            .filter_map(|doc| doc.uid.clone().map(|uid| (uid, doc.clone())))
            .collect();
        Self {
            pages,
            documents,
            failing_cursors: Vec::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Make fetches of this cursor fail with a 500
    pub(crate) fn fail_on(mut self, cursor: &str) -> Self {
        self.failing_cursors.push(cursor.to_string());
        self
    }

    /// Every request received, in order
    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn cursor(index: usize) -> String {
        format!("memory://page/{}", index)
    }

    fn page(&self, index: usize) -> ApiPage {
        let results = self.pages.get(index).cloned().unwrap_or_default();
        let next = (index + 1 < self.pages.len()).then(|| Self::cursor(index + 1));
        ApiPage::new(results, next)
    }

    fn record(&self, request: String) {
        self.requests.lock().unwrap().push(request);
    }
}

#[async_trait]
impl ContentRepository for MemoryRepository {
    async fn query(&self, query: &Query) -> Result<ApiPage> {
        self.record(format!("query:{}", query.fetch.join(",")));
        Ok(self.page(0))
    }

    async fn fetch_page(&self, cursor: &str) -> Result<ApiPage> {
        self.record(cursor.to_string());
        if self.failing_cursors.iter().any(|c| c == cursor) {
            return Err(ContentError::Status {
                url: cursor.to_string(),
                status: 500,
            });
        }
        let index = cursor
            .strip_prefix("memory://page/")
            .and_then(|n| n.parse::<usize>().ok())
            .unwrap_or(usize::MAX);
        Ok(self.page(index))
    }

    async fn get_by_uid(&self, document_type: &str, uid: &str) -> Result<RawDocument> {
        self.record(format!("uid:{}", uid));
        self.documents
            .get(uid)
            .cloned()
            .ok_or_else(|| ContentError::NotFound {
                doc_type: document_type.to_string(),
                uid: uid.to_string(),
            })
    }
}

/// A post document with a title and one paragraph per section heading
pub(crate) fn post_document(uid: &str, title: &str) -> RawDocument {
    serde_json::from_value(serde_json::json!({
        "id": format!("id-{}", uid),
        "uid": uid,
        "type": "posts",
        "first_publication_date": "2021-03-25T19:25:28+0000",
        "data": {
            "title": title,
            "subtitle": format!("Sobre {}", title),
            "author": "Joseph Oliveira",
            "banner": { "url": format!("https://images.example/{}.png", uid) },
            "content": [
                {
                    "heading": "Introdução",
                    "body": [{ "type": "paragraph", "text": format!("Texto de {}", title), "spans": [] }]
                }
            ]
        }
    }))
    .unwrap()
}
