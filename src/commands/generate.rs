//! @acp:module "Bundle Generate Command"
//! @acp:summary "Render a bundle or write an article from a source pack"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::output;
use crate::config::Config;
use crate::data::{load_bundle, read_document, InputFormat};
use crate::render::{load_render_bundle, render_bundle, HandlebarsRenderer, RenderBundle};
use crate::writer::{OpenAiClient, Writer};

/// Options for the bundle-generate command
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Bundle (.yaml/.yml) or source pack (.json)
    pub bundle: PathBuf,
    /// Output directory
    pub out: PathBuf,
    /// Output slug for source-pack articles
    pub slug: Option<String>,
    /// Registry root holding `authors/`
    pub registry: PathBuf,
    /// Directory of `<kind>.md.hbs` files overriding the built-in templates
    pub templates: Option<PathBuf>,
}

/// Execute the bundle-generate command; returns whether every article was produced
pub fn execute_generate(options: GenerateOptions, config: &Config) -> Result<bool> {
    match InputFormat::from_path(&options.bundle) {
        InputFormat::Json => write_source_pack(&options, config),
        InputFormat::Yaml => render(&options),
    }
}

fn write_source_pack(options: &GenerateOptions, config: &Config) -> Result<bool> {
    let client = OpenAiClient::from_config(&config.writer)?;
    let writer = Writer::new(config.writer.clone(), config.post.clone(), Box::new(client));
    let path = writer
        .write_from_source_pack(&options.bundle, &options.out, options.slug.as_deref())
        .with_context(|| format!("Writing from {}", options.bundle.display()))?;
    output::ok(format!("Wrote {}", path.display()));
    Ok(true)
}

fn render(options: &GenerateOptions) -> Result<bool> {
    let raw: serde_json::Value = read_document(&options.bundle)?;
    let bundle = if raw.get("items").is_some() {
        load_render_bundle(&options.bundle)?
    } else {
        let plans = load_bundle(&options.bundle, Some(&options.registry))?;
        for link in plans.dangling_interlinks() {
            output::warn(format!("Interlink {} -> {} has no plan in this bundle", link.from, link.to));
        }
        RenderBundle::from_bundle(&plans)
    };

    let mut renderer = HandlebarsRenderer::new()?;
    if let Some(dir) = &options.templates {
        renderer = renderer
            .with_template_dir(dir)
            .with_context(|| format!("Loading templates from {}", dir.display()))?;
    }
    let summary = render_bundle(&bundle, &options.out, &renderer)?;

    for path in &summary.written {
        output::ok(path.display());
    }
    for failure in &summary.failures {
        output::fail(format!("{}: {}", failure.slug, failure.reason));
    }
    Ok(summary.success())
}
