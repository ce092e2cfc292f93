//! @acp:module "Publish Command"
//! @acp:summary "Convert one article to HTML and post it to WordPress"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::output;
use crate::config::Config;
use crate::export::{markdown_to_html, ArticleMeta, PostStatus, WordPressPublisher};

/// Options for the publish command
#[derive(Debug, Clone)]
pub struct PublishOptions {
    pub file: PathBuf,
    pub status: PostStatus,
}

/// Execute the publish command
pub fn execute_publish(options: PublishOptions, config: &Config) -> Result<bool> {
    let publisher = WordPressPublisher::from_config(&config.publish)?;

    let markdown = std::fs::read_to_string(&options.file)
        .with_context(|| format!("Reading {}", options.file.display()))?;
    let slug = options
        .file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let meta = ArticleMeta::extract(&markdown, slug);

    let link = publisher.publish(&meta.title, &markdown_to_html(&markdown), options.status)?;
    output::ok(format!("Published '{}' ({}) at {}", meta.title, options.status, link));
    Ok(true)
}
