//! @acp:module "QA Report Command"
//! @acp:summary "Run the validator over a directory of markdown"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::output;
use crate::audit::declared_packs;
use crate::config::Config;
use crate::data::{load_bundle, load_source_pack, EditorialTargets};
use crate::qa::{resolve_packs, Validator};

/// Options for the qa-report command
#[derive(Debug, Clone)]
pub struct QaOptions {
    /// Directory of `.md` files
    pub dir: PathBuf,
    /// Source pack enabling the claim-coverage check
    pub source_pack: Option<PathBuf>,
    /// Bundle supplying editorial targets and declared packs
    pub bundle: Option<PathBuf>,
    /// Extra domain validation packs
    pub packs: Vec<String>,
    /// Print the report as JSON
    pub json: bool,
}

/// Execute the qa-report command; returns whether every file passed
pub fn execute_qa(options: QaOptions, config: &Config) -> Result<bool> {
    let mut pack_names = options.packs.clone();
    let targets = match &options.bundle {
        Some(path) => {
            pack_names.extend(declared_packs(path));
            load_bundle(path, None)?.editorial_targets
        }
        None => EditorialTargets {
            fk_max: config.qa.fk_max,
            style_min: config.qa.style_min,
            ..EditorialTargets::default()
        },
    };

    let mut validator = Validator::standard(&targets);
    if let Some(path) = &options.source_pack {
        let pack = load_source_pack(path)?;
        tracing::debug!("Claims checklist for {}: {} item(s)", pack.pack_id, pack.claims_checklist.len());
        validator = validator.with_claims();
    }
    for pack in resolve_packs(&pack_names) {
        validator = validator.with_pack(pack);
    }
    tracing::debug!("QA checks: {}", validator.check_names().join(", "));

    let report = validator
        .audit_dir(&options.dir)
        .with_context(|| format!("Running QA over {}", options.dir.display()))?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.is_empty() {
        output::ok(format!("QA passed for {}", options.dir.display()));
    } else {
        for (path, violations) in &report {
            for violation in violations {
                output::fail(format!("{}: {}", path.display(), violation));
            }
        }
    }

    Ok(report.is_empty())
}
