//! spacetraveling: a blog rendered from a headless content repository
//!
//! Post summaries are loaded page by page through the repository's cursors,
//! and each post document is assembled into ordered sections, rendered to
//! HTML and given a reading-time estimate.

pub mod client;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod pagination;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use client::{ContentClient, ContentRepository, Query};
use content::AssembledPost;
use pagination::{PaginationController, PaginationState};

/// The blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Content repository the blog reads from
    pub repository: Arc<dyn ContentRepository>,
}

impl Blog {
    /// Create a blog from a directory, talking to the configured repository
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env();

        let repository = Arc::new(ContentClient::new(&config.content));
        Ok(Self::with_repository(config, base_dir, repository))
    }

    /// Create a blog around an already constructed repository
    pub fn with_repository<P: AsRef<Path>>(
        config: config::SiteConfig,
        base_dir: P,
        repository: Arc<dyn ContentRepository>,
    ) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            public_dir,
            repository,
        }
    }

    /// Query for the listing's first page
    pub fn listing_query(&self) -> Query {
        Query::documents(&self.config.content.document_type)
            .fetch(&self.config.content.listing_fields)
            .page_size(self.config.content.page_size)
    }

    /// Query enumerating post routes
    pub fn route_query(&self) -> Query {
        Query::documents(&self.config.content.document_type)
            .fetch(&self.config.content.route_fields)
            .page_size(self.config.content.page_size)
    }

    pub fn pagination(&self) -> PaginationController {
        PaginationController::new(self.repository.clone())
    }

    /// Load the first page of post summaries
    pub async fn first_page(&self) -> error::Result<PaginationState> {
        let page = self.repository.query(&self.listing_query()).await?;
        Ok(PaginationController::initialize(page))
    }

    /// Uids of the posts whose pages are generated ahead of time
    pub async fn post_routes(&self) -> error::Result<Vec<String>> {
        let page = self.repository.query(&self.route_query()).await?;
        Ok(page
            .results
            .into_iter()
            .filter_map(|doc| doc.uid)
            .collect())
    }

    /// Fetch and assemble a single post
    pub async fn post(&self, uid: &str) -> error::Result<AssembledPost> {
        let doc = self
            .repository
            .get_by_uid(&self.config.content.document_type, uid)
            .await?;
        Ok(AssembledPost::from_document(doc))
    }

    /// Generate the static site
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
