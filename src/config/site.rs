//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub language: String,
    pub timezone: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub public_dir: String,

    // Date format (Moment.js style)
    pub date_format: String,

    #[serde(default)]
    pub labels: LabelsConfig,

    #[serde(default)]
    pub content: ContentConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "spacetraveling".to_string(),
            language: "pt-BR".to_string(),
            timezone: String::new(),

            url: "http://localhost:4000".to_string(),
            root: "/".to_string(),

            public_dir: "public".to_string(),

            date_format: "DD MMM YYYY".to_string(),

            labels: LabelsConfig::default(),
            content: ContentConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Override repository settings from the environment
    pub fn apply_env(&mut self) {
        if let Ok(endpoint) = std::env::var("PRISMIC_API_ENDPOINT") {
            if !endpoint.is_empty() {
                tracing::debug!("Using content endpoint from environment");
                self.content.endpoint = endpoint;
            }
        }
        if let Ok(token) = std::env::var("PRISMIC_ACCESS_TOKEN") {
            if !token.is_empty() {
                self.content.access_token = Some(token);
            }
        }
    }
}

/// Interface labels
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelsConfig {
    pub load_more: String,
    pub loading: String,
    pub reading_time_suffix: String,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            load_more: "Carregar mais posts".to_string(),
            loading: "Carregando...".to_string(),
            reading_time_suffix: "min".to_string(),
        }
    }
}

/// Content repository configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// API entry point, e.g. `https://<repo>.cdn.prismic.io/api/v2`
    pub endpoint: String,
    pub access_token: Option<String>,
    pub document_type: String,
    pub page_size: usize,
    /// Fields fetched for the listing page
    pub listing_fields: Vec<String>,
    /// Fields fetched when enumerating post routes
    pub route_fields: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://spacetraveling.cdn.prismic.io/api/v2".to_string(),
            access_token: None,
            document_type: "posts".to_string(),
            page_size: 2,
            listing_fields: vec![
                "title".to_string(),
                "subtitle".to_string(),
                "author".to_string(),
            ],
            route_fields: vec!["title".to_string()],
        }
    }
}
