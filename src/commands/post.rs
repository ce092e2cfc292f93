//! @acp:module "Postprocess Command"
//! @acp:summary "Apply the repair pipeline to one markdown file"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::output;
use crate::config::Config;
use crate::data::load_source_pack;
use crate::post::{nudge_readability, PostContext, PostProcessor};

/// Options for the postprocess command
#[derive(Debug, Clone)]
pub struct PostOptions {
    pub file: PathBuf,
    /// Products, columns and sources for the table and sources repairs
    pub source_pack: Option<PathBuf>,
    /// Byline override
    pub author: Option<String>,
    /// Append missing narrative sections
    pub scaffold: bool,
    /// Shorten long sentences before repairing
    pub simplify: bool,
    /// Print a diff instead of writing
    pub dry_run: bool,
}

/// Execute the postprocess command
pub fn execute_post(options: PostOptions, config: &Config) -> Result<bool> {
    let before = std::fs::read_to_string(&options.file)
        .with_context(|| format!("Reading {}", options.file.display()))?;

    let mut context = PostContext::from_config(&config.post);
    if let Some(path) = &options.source_pack {
        context = context.with_pack(&load_source_pack(path)?);
    }
    if let Some(author) = &options.author {
        context = context.with_author(author.clone());
    }
    context.scaffold = options.scaffold;

    let input = if options.simplify {
        nudge_readability(&before)
    } else {
        before.clone()
    };
    let after = PostProcessor::new(context).apply(&input);

    if after == before {
        output::ok(format!("{} needs no repairs", options.file.display()));
        return Ok(true);
    }

    let name = options.file.display().to_string();
    if options.dry_run {
        print!("{}", PostProcessor::diff(&before, &after, &name));
    } else {
        std::fs::write(&options.file, &after)
            .with_context(|| format!("Writing {}", options.file.display()))?;
        output::ok(format!("Repaired {}", name));
    }
    Ok(true)
}
