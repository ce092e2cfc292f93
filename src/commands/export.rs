//! @acp:module "Export Command"
//! @acp:summary "Static HTML export of a markdown directory"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::output;
use crate::export::export_dir;

/// Options for the export command
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub src: PathBuf,
    pub out: PathBuf,
    /// Site root used for the JSON-LD `url`
    pub base_url: Option<String>,
}

/// Execute the export command
pub fn execute_export(options: ExportOptions) -> Result<bool> {
    let written = export_dir(&options.src, &options.out, options.base_url.as_deref())
        .with_context(|| format!("Exporting {}", options.src.display()))?;

    if written.is_empty() {
        output::warn(format!("No .md files found in {}", options.src.display()));
        return Ok(true);
    }
    for path in &written {
        output::ok(path.display());
    }
    println!("Exported {} file(s) to {}", written.len(), options.out.display());
    Ok(true)
}
