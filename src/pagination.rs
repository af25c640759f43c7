//! Cursor-based incremental loading of post summaries

use indexmap::IndexMap;
use std::sync::Arc;

use crate::client::ContentRepository;
use crate::content::{ApiPage, PostSummary};
use crate::error::{ContentError, Result};

/// Summaries loaded so far plus the cursor of the next page
///
/// Results keep fetch order and are unique by uid. They only ever grow, and
/// a `None` cursor is terminal.
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    results: IndexMap<String, PostSummary>,
    next_cursor: Option<String>,
}

impl PaginationState {
    /// Loaded summaries, in fetch order
    pub fn results(&self) -> impl Iterator<Item = &PostSummary> {
        self.results.values()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    /// Whether the "load more" affordance should be offered
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }

    /// Append a page, skipping uids already present; returns how many were added
    fn append(&mut self, page: ApiPage) -> usize {
        let before = self.results.len();
        for doc in &page.results {
            let summary = PostSummary::from_document(doc);
            if self.results.contains_key(&summary.uid) {
                tracing::debug!("Skipping duplicate post {}", summary.uid);
                continue;
            }
            self.results.insert(summary.uid.clone(), summary);
        }
        self.next_cursor = page.next_page;
        self.results.len() - before
    }
}

/// Loads further pages of the listing through the content repository
#[derive(Clone)]
pub struct PaginationController {
    repository: Arc<dyn ContentRepository>,
}

impl PaginationController {
    pub fn new(repository: Arc<dyn ContentRepository>) -> Self {
        Self { repository }
    }

    /// Build the initial state from the first page, in received order
    pub fn initialize(first_page: ApiPage) -> PaginationState {
        let mut state = PaginationState::default();
        state.append(first_page);
        state
    }

    /// Fetch the page behind the state's cursor and append its summaries
    ///
    /// Issues exactly one request. The exclusive borrow of `state` lasts
    /// until the fetch resolves, so a second load on the same state cannot
    /// start before the first finishes. On failure the state is unchanged.
    pub async fn load_next(&self, state: &mut PaginationState) -> Result<usize> {
        let cursor = state.next_cursor.clone().ok_or(ContentError::NoMorePages)?;
        let page = self.repository.fetch_page(&cursor).await?;
        let added = state.append(page);
        tracing::debug!(
            "Loaded {} more posts ({} total, more: {})",
            added,
            state.len(),
            state.has_more()
        );
        Ok(added)
    }

    /// Keep loading until the cursor is exhausted
    pub async fn load_all(&self, state: &mut PaginationState) -> Result<()> {
        while state.has_more() {
            self.load_next(state).await?;
        }
        Ok(())
    }
}
