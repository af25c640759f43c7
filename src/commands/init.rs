//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# spacetraveling configuration

# Site
title: spacetraveling
language: pt-BR
timezone: ''

# URL
url: http://localhost:4000
root: /

# Directory
public_dir: public

# Date format
date_format: DD MMM YYYY

labels:
  load_more: Carregar mais posts
  loading: Carregando...
  reading_time_suffix: min

# Content repository
# PRISMIC_API_ENDPOINT and PRISMIC_ACCESS_TOKEN override these values
content:
  endpoint: https://spacetraveling.cdn.prismic.io/api/v2
  document_type: posts
  page_size: 2
  listing_fields: [title, subtitle, author]
  route_fields: [title]
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;

    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("{:?} already exists", config_path);
    }
    fs::write(&config_path, DEFAULT_CONFIG)?;

    Ok(())
}
