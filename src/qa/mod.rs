//! @acp:module "QA"
//! @acp:summary "Composable quality checks over rendered markdown"
//! @acp:domain qa
//! @acp:layer feature
//!
//! A document is parsed once into [`Document`]; every [`QaCheck`] reads that
//! structure and returns its violations. The [`Validator`] concatenates the
//! findings of all registered checks, so every problem is reported at once.

pub mod checks;
pub mod claims;
pub mod jargon;
pub mod packs;
pub mod style;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use walkdir::WalkDir;

pub use checks::{
    CitationDensity, ComparisonTable, FillerPhrases, HeadingStructure, LadderReference,
    LinkDensity, PreparednessNotes, LADDER_PHRASES,
};
pub use claims::{missing_concepts, ClaimsCheck};
pub use jargon::{find_jargon, JargonCheck, BANNED_JARGON};
pub use packs::{resolve_packs, DomainPack, WaterStandardsPack};
pub use style::{run_style_checks, StyleCheck, StyleReport};

use crate::data::EditorialTargets;
use crate::error::Result;
use crate::post::{has_sources_heading, has_table};

/// Failing files and their violations; passing files are absent
pub type QaReport = BTreeMap<PathBuf, Vec<String>>;

static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})[ \t]+(.*?)[ \t]*$").unwrap());
static SOURCES_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^##[ \t]+Sources[ \t]*$").unwrap());

/// @acp:summary "Structural facts about one markdown document"
#[derive(Debug, Clone)]
pub struct Document<'a> {
    /// Raw markdown
    pub text: &'a str,
    pub lower: String,
    pub starts_with_h1: bool,
    /// Text of each `## ` heading
    pub h2s: Vec<String>,
    /// (level, text) for every heading
    pub headings: Vec<(usize, String)>,
    pub external_links: usize,
    pub internal_links: usize,
    pub citations: usize,
    pub has_sources_heading: bool,
    pub source_entries: usize,
    pub has_table: bool,
}

impl<'a> Document<'a> {
    pub fn parse(text: &'a str) -> Self {
        let mut h2s = Vec::new();
        let mut headings = Vec::new();
        let mut source_entries = 0;
        let mut in_sources = false;

        for line in text.lines() {
            if let Some(h2) = line.strip_prefix("## ") {
                h2s.push(h2.trim().to_string());
            }
            if let Some(caps) = HEADING.captures(line) {
                headings.push((caps[1].len(), caps[2].to_string()));
                in_sources = SOURCES_LINE.is_match(line);
                continue;
            }
            let item = line.trim_start();
            if in_sources && (item.starts_with("- ") || item.starts_with("* ")) {
                source_entries += 1;
            }
        }

        Self {
            text,
            lower: text.to_lowercase(),
            starts_with_h1: text.trim_start().starts_with("# "),
            h2s,
            headings,
            external_links: text.matches("](http://").count() + text.matches("](https://").count(),
            internal_links: text.matches("](/").count(),
            citations: text.matches("[Source:").count(),
            has_sources_heading: has_sources_heading(text),
            source_entries,
            has_table: has_table(text),
        }
    }
}

/// @acp:summary "One independent QA rule"
pub trait QaCheck: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Violations found in `doc`; empty means pass
    fn check(&self, doc: &Document<'_>) -> Vec<String>;
}

/// @acp:summary "Ordered set of checks applied to documents"
pub struct Validator {
    checks: Vec<Box<dyn QaCheck>>,
}

impl Validator {
    /// No checks registered
    pub fn empty() -> Self {
        Self { checks: Vec::new() }
    }

    /// The standard battery, with style thresholds from `targets`
    pub fn standard(targets: &EditorialTargets) -> Self {
        Self::empty()
            .with_check(HeadingStructure)
            .with_check(LinkDensity)
            .with_check(CitationDensity)
            .with_check(ComparisonTable)
            .with_check(PreparednessNotes)
            .with_check(LadderReference)
            .with_check(FillerPhrases)
            .with_check(StyleCheck {
                fk_max: targets.fk_max,
                style_min: targets.style_min,
            })
            .with_check(JargonCheck)
    }

    pub fn with_check<C: QaCheck + 'static>(mut self, check: C) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Add the claim-coverage check
    pub fn with_claims(self) -> Self {
        self.with_check(ClaimsCheck)
    }

    /// Add a domain validation pack
    pub fn with_pack(mut self, pack: DomainPack) -> Self {
        self.checks.push(pack.check());
        self
    }

    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    /// Every violation in `text`, grouped by check in registration order
    pub fn validate(&self, text: &str) -> Vec<String> {
        let doc = Document::parse(text);
        self.checks
            .iter()
            .flat_map(|check| {
                let found = check.check(&doc);
                if !found.is_empty() {
                    tracing::debug!("{}: {} violation(s)", check.name(), found.len());
                }
                found
            })
            .collect()
    }

    pub fn validate_file(&self, path: &Path) -> Result<Vec<String>> {
        let text = std::fs::read_to_string(path)?;
        Ok(self.validate(&text))
    }

    /// Validate every `*.md` directly inside `dir`
    pub fn audit_dir(&self, dir: &Path) -> Result<QaReport> {
        let mut report = QaReport::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| crate::error::PraepError::Other(e.to_string()))?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            let violations = self.validate_file(path)?;
            tracing::debug!("QA {}: {} violation(s)", path.display(), violations.len());
            if !violations.is_empty() {
                report.insert(path.to_path_buf(), violations);
            }
        }
        Ok(report)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::standard(&EditorialTargets::default())
    }
}
