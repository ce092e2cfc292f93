//! @acp:module "Audit Command"
//! @acp:summary "Methodology audit of a bundle folder"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::Result;
use console::style;

use super::output;
use crate::audit::audit_bundle;

/// Options for the audit command
#[derive(Debug, Clone)]
pub struct AuditOptions {
    pub bundle: PathBuf,
    pub json: bool,
}

/// Execute the audit command; returns the audit's pass flag
pub fn execute_audit(options: AuditOptions) -> Result<bool> {
    let report = audit_bundle(&options.bundle);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(report.pass);
    }

    println!("{} {}", style("Audit").bold(), report.bundle.display());
    for (kind, path) in &report.files {
        println!("  {}: {}", style(kind).dim(), path.display());
    }
    for error in &report.errors {
        output::fail(error);
    }
    for warning in &report.warnings {
        output::warn(warning);
    }
    if report.pass {
        output::ok(format!("Methodology audit passed ({} warning(s))", report.warnings.len()));
    }

    Ok(report.pass)
}
