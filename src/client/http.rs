//! HTTP client for the content repository API

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{uid_predicate, ContentRepository, Query};
use crate::config::ContentConfig;
use crate::content::{ApiPage, RawDocument};
use crate::error::{ContentError, Result};

/// API entry point response
#[derive(Debug, Deserialize)]
struct ApiInfo {
    #[serde(default)]
    refs: Vec<ApiRef>,
}

#[derive(Debug, Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(rename = "isMasterRef", default)]
    is_master: bool,
}

/// Content repository client over HTTP
///
/// The `reqwest::Client` is injected so callers control connection pooling
/// and TLS settings.
#[derive(Debug, Clone)]
pub struct ContentClient {
    http: reqwest::Client,
    endpoint: String,
    access_token: Option<String>,
}

impl ContentClient {
    /// Create a client with a default HTTP client
    pub fn new(config: &ContentConfig) -> Self {
        Self::with_http(reqwest::Client::new(), config)
    }

    /// Create a client around an existing HTTP client
    pub fn with_http(http: reqwest::Client, config: &ContentConfig) -> Self {
        Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        }
    }

    /// GET a URL and decode its JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: &str, params: &[(&str, String)]) -> Result<T> {
        tracing::debug!("Fetching {}", url);

        let mut request = self.http.get(url);
        if !params.is_empty() {
            request = request.query(params);
        }

        let response = request.send().await.map_err(|source| ContentError::Fetch {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| ContentError::Fetch {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_str(&body).map_err(|source| ContentError::Decode {
            url: url.to_string(),
            source,
        })
    }

    fn token_params(&self) -> Vec<(&'static str, String)> {
        self.access_token
            .iter()
            .map(|token| ("access_token", token.clone()))
            .collect()
    }

    /// Resolve the master ref, the repository's current published state
    async fn master_ref(&self) -> Result<String> {
        let info: ApiInfo = self.get_json(&self.endpoint, &self.token_params()).await?;
        info.refs
            .into_iter()
            .find(|r| r.is_master)
            .map(|r| r.reference)
            .ok_or_else(|| ContentError::NoMasterRef(self.endpoint.clone()))
    }

    async fn search(&self, predicate: String, extra: Vec<(&'static str, String)>) -> Result<ApiPage> {
        let reference = self.master_ref().await?;

        let mut params = vec![("ref", reference), ("q", predicate)];
        params.extend(extra);
        params.extend(self.token_params());

        let url = format!("{}/documents/search", self.endpoint);
        self.get_json(&url, &params).await
    }
}

#[async_trait]
impl ContentRepository for ContentClient {
    async fn query(&self, query: &Query) -> Result<ApiPage> {
        let mut extra = vec![("pageSize", query.page_size.to_string())];
        if let Some(fetch) = query.fetch_param() {
            extra.push(("fetch", fetch));
        }
        let page = self.search(query.predicate(), extra).await?;
        tracing::debug!(
            "Query for {} returned {} documents",
            query.document_type,
            page.results.len()
        );
        Ok(page)
    }

    async fn fetch_page(&self, cursor: &str) -> Result<ApiPage> {
        self.get_json(cursor, &[]).await
    }

    async fn get_by_uid(&self, document_type: &str, uid: &str) -> Result<RawDocument> {
        let page = self
            .search(
                uid_predicate(document_type, uid),
                vec![("pageSize", "1".to_string())],
            )
            .await?;

        page.results
            .into_iter()
            .next()
            .ok_or_else(|| ContentError::NotFound {
                doc_type: document_type.to_string(),
                uid: uid.to_string(),
            })
    }
}
