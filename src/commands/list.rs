//! List site content

use anyhow::Result;

use crate::helpers::{full_url_for, post_path, DateFormatter};
use crate::Blog;

/// List site content by type
pub async fn run(blog: &Blog, content_type: &str) -> Result<()> {
    match content_type {
        "post" | "posts" => {
            let config = &blog.config;
            let dates =
                DateFormatter::new(&config.date_format, &config.language, &config.timezone);

            let mut state = blog.first_page().await?;
            blog.pagination().load_all(&mut state).await?;

            println!("Posts ({}):", state.len());
            for post in state.results() {
                println!(
                    "  {} - {} by {} [{}]",
                    dates.format(post.first_publication_date.as_ref()),
                    post.title,
                    post.author,
                    post.uid
                );
            }
        }
        "route" | "routes" => {
            let routes = blog.post_routes().await?;
            println!("Routes ({}):", routes.len());
            for uid in routes {
                let path = post_path(&blog.config.root, &uid);
                println!("  {}  {}", path, full_url_for(&blog.config, &path));
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, route", content_type);
        }
    }

    Ok(())
}
