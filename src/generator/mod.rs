//! Generator module - writes the static site using the built-in Tera templates

use anyhow::{Context as _, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::{AssembledPost, HtmlSerializer, RichTextRenderer};
use crate::helpers::{listing_path, DateFormatter};
use crate::templates::{ConfigData, ListingData, PostData, TemplateRenderer};
use crate::Blog;

/// Seconds before the loading page asks the browser to retry
pub const LOADING_REFRESH_SECONDS: u32 = 2;

/// Static site generator
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
    rich_text: RichTextRenderer<HtmlSerializer>,
    dates: DateFormatter,
    config_data: ConfigData,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        let config = &blog.config;
        let renderer = TemplateRenderer::new()?;
        let rich_text = RichTextRenderer::new(HtmlSerializer::new(
            &config.root,
            &config.content.document_type,
        ));
        let dates = DateFormatter::new(&config.date_format, &config.language, &config.timezone);

        Ok(Self {
            blog: blog.clone(),
            renderer,
            rich_text,
            dates,
            config_data: ConfigData::new(config),
        })
    }

    /// Generate the entire site
    pub async fn generate(&self) -> Result<()> {
        fs::create_dir_all(&self.blog.public_dir)?;

        let listing_pages = self.generate_listing_pages().await?;
        let post_pages = self.generate_post_pages().await?;
        self.generate_loading_page()?;

        tracing::info!(
            "Generated {} listing pages and {} post pages",
            listing_pages,
            post_pages
        );
        Ok(())
    }

    /// Write one listing page per "load more" step
    ///
    /// Step 1 is the home page; each later step holds every summary loaded
    /// so far, and links to the next step while the cursor is not exhausted.
    pub async fn generate_listing_pages(&self) -> Result<usize> {
        let root = &self.blog.config.root;
        let controller = self.blog.pagination();
        let mut state = self
            .blog
            .first_page()
            .await
            .context("Failed to load the first page of posts")?;

        let mut step = 1;
        loop {
            let listing = ListingData::new(
                &state,
                &self.dates,
                root,
                Some(listing_path(root, step + 1)),
            );
            let html = self.renderer.render_listing(&self.config_data, &listing)?;
            self.write(&listing_file(step), &html)?;

            if !state.has_more() {
                break;
            }
            controller
                .load_next(&mut state)
                .await
                .with_context(|| format!("Failed to load listing page {}", step + 1))?;
            step += 1;
        }

        tracing::debug!("Listing holds {} posts after {} steps", state.len(), step);
        Ok(step)
    }

    /// Write the pages of every post returned by the route query
    pub async fn generate_post_pages(&self) -> Result<usize> {
        let routes = self
            .blog
            .post_routes()
            .await
            .context("Failed to enumerate post routes")?;

        let mut count = 0;
        for uid in routes {
            if !is_safe_segment(&uid) {
                tracing::warn!("Skipping post with unusable uid {:?}", uid);
                continue;
            }
            self.generate_post(&uid).await?;
            count += 1;
        }
        Ok(count)
    }

    /// Fetch, render and write a single post page
    pub async fn generate_post(&self, uid: &str) -> Result<PathBuf> {
        anyhow::ensure!(is_safe_segment(uid), "Invalid post uid: {:?}", uid);

        let post = self.blog.post(uid).await?;
        let html = self.render_post(&post)?;
        let relative = post_file(uid);
        self.write(&relative, &html)?;

        tracing::debug!("Generated post {} ({} min)", uid, post.reading_time());
        Ok(self.blog.public_dir.join(relative))
    }

    /// Render a post page
    pub fn render_post(&self, post: &AssembledPost) -> Result<String> {
        let data = PostData::new(post, &self.dates, &self.rich_text);
        self.renderer.render_post(&self.config_data, &data)
    }

    /// Render the interim loading page
    pub fn render_loading(&self) -> Result<String> {
        self.renderer
            .render_loading(&self.config_data, LOADING_REFRESH_SECONDS)
    }

    fn generate_loading_page(&self) -> Result<()> {
        let html = self.render_loading()?;
        self.write(Path::new("post/loading.html"), &html)
    }

    fn write(&self, relative: &Path, content: &str) -> Result<()> {
        let path = self.blog.public_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {:?}", path))?;
        tracing::debug!("Wrote {:?}", path);
        Ok(())
    }
}

/// Output file of a listing step, relative to the public directory
pub fn listing_file(step: usize) -> PathBuf {
    if step <= 1 {
        PathBuf::from("index.html")
    } else {
        PathBuf::from(format!("more/{}/index.html", step))
    }
}

/// Output file of a post page, relative to the public directory
pub fn post_file(uid: &str) -> PathBuf {
    PathBuf::from("post").join(uid).join("index.html")
}

/// Whether a uid can be used as a directory name
pub fn is_safe_segment(uid: &str) -> bool {
    !uid.is_empty()
        && uid != "."
        && uid != ".."
        && !uid.contains(['/', '\\'])
        && !uid.starts_with('.')
}
