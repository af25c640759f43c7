//! Built-in page templates using the Tera template engine
//!
//! The templates are embedded in the binary; there is no theme directory to
//! load at runtime.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::{LabelsConfig, SiteConfig};
use crate::content::{AssembledPost, BlockSerializer, PostSummary, RenderedSection, RichTextRenderer};
use crate::helpers::{date_xml, post_path, DateFormatter};
use crate::pagination::PaginationState;

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Values are escaped explicitly in the templates; section markup is
        // inserted verbatim
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("index.html", include_str!("site/index.html")),
            ("post.html", include_str!("site/post.html")),
            ("loading.html", include_str!("site/loading.html")),
            (
                "partials/header.html",
                include_str!("site/partials/header.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Render the post listing
    pub fn render_listing(&self, config: &ConfigData, listing: &ListingData) -> Result<String> {
        let mut context = Context::new();
        context.insert("config", config);
        context.insert("listing", listing);
        self.render("index.html", &context)
    }

    /// Render a single post page
    pub fn render_post(&self, config: &ConfigData, post: &PostData) -> Result<String> {
        let mut context = Context::new();
        context.insert("config", config);
        context.insert("post", post);
        self.render("post.html", &context)
    }

    /// Render the interim page shown while a post is being generated
    pub fn render_loading(&self, config: &ConfigData, refresh_seconds: u32) -> Result<String> {
        let mut context = Context::new();
        context.insert("config", config);
        context.insert("refresh_seconds", &refresh_seconds);
        self.render("loading.html", &context)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub language: String,
    pub root: String,
    pub labels: LabelsConfig,
}

impl ConfigData {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            language: config.language.clone(),
            root: config.root.clone(),
            labels: config.labels.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub uid: String,
    pub path: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub date: String,
    pub datetime: String,
}

impl SummaryData {
    pub fn new(summary: &PostSummary, dates: &DateFormatter, root: &str) -> Self {
        Self {
            uid: summary.uid.clone(),
            path: post_path(root, &summary.uid),
            title: summary.title.clone(),
            subtitle: summary.subtitle.clone(),
            author: summary.author.clone(),
            date: dates.format(summary.first_publication_date.as_ref()),
            datetime: summary
                .first_publication_date
                .as_ref()
                .map(date_xml)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingData {
    pub posts: Vec<SummaryData>,
    /// Target of the "load more" link, absent once every page is loaded
    pub load_more: Option<String>,
}

impl ListingData {
    pub fn new(
        state: &PaginationState,
        dates: &DateFormatter,
        root: &str,
        load_more: Option<String>,
    ) -> Self {
        Self {
            posts: state
                .results()
                .map(|summary| SummaryData::new(summary, dates, root))
                .collect(),
            load_more: load_more.filter(|_| state.has_more()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub uid: String,
    pub title: String,
    pub subtitle: String,
    pub banner_url: String,
    pub author: String,
    pub date: String,
    pub datetime: String,
    pub reading_time: usize,
    pub sections: Vec<RenderedSection>,
}

impl PostData {
    pub fn new<S: BlockSerializer>(
        post: &AssembledPost,
        dates: &DateFormatter,
        renderer: &RichTextRenderer<S>,
    ) -> Self {
        Self {
            uid: post.uid.clone(),
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            banner_url: post.banner_url.clone(),
            author: post.author.clone(),
            date: dates.format(post.first_publication_date.as_ref()),
            datetime: post
                .first_publication_date
                .as_ref()
                .map(date_xml)
                .unwrap_or_default(),
            reading_time: post.reading_time(),
            sections: post.render_sections(renderer),
        }
    }
}
