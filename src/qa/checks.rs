//! @acp:module "Structural Checks"
//! @acp:summary "Heading, link, citation, table and section checks"
//! @acp:domain qa
//! @acp:layer service

use std::sync::LazyLock;

use regex::Regex;

use super::{Document, QaCheck};

/// Phrases that count as a time-ladder reference, lowercase
pub const LADDER_PHRASES: &[&str] = &["72h", "72 hours", "2 weeks", "two weeks", "30 days", "90 days", "ladder"];

static FILLER: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    ["In conclusion", "In summary", "At the end of the day"]
        .into_iter()
        .map(|phrase| (phrase, Regex::new(&format!(r"(?i)\b{}\b", phrase)).unwrap()))
        .collect()
});

/// H1 first, at least three H2s
#[derive(Debug, Clone, Default)]
pub struct HeadingStructure;

impl QaCheck for HeadingStructure {
    fn name(&self) -> &'static str {
        "headings"
    }

    fn check(&self, doc: &Document<'_>) -> Vec<String> {
        let mut errs = Vec::new();
        if !doc.starts_with_h1 {
            errs.push("Missing H1 at top".to_string());
        }
        if doc.h2s.len() < 3 {
            errs.push("Fewer than 3 H2s".to_string());
        }
        errs
    }
}

/// At least two external links and one root-relative internal link
#[derive(Debug, Clone, Default)]
pub struct LinkDensity;

impl QaCheck for LinkDensity {
    fn name(&self) -> &'static str {
        "links"
    }

    fn check(&self, doc: &Document<'_>) -> Vec<String> {
        let mut errs = Vec::new();
        if doc.external_links < 2 {
            errs.push("Fewer than 2 external links".to_string());
        }
        if doc.internal_links < 1 {
            errs.push("Fewer than 1 internal link".to_string());
        }
        errs
    }
}

#[derive(Debug, Clone, Default)]
pub struct CitationDensity;

impl QaCheck for CitationDensity {
    fn name(&self) -> &'static str {
        "citations"
    }

    fn check(&self, doc: &Document<'_>) -> Vec<String> {
        let mut errs = Vec::new();
        if doc.citations < 3 {
            errs.push("Fewer than 3 inline citations".to_string());
        }
        if !doc.has_sources_heading {
            errs.push("Missing '## Sources' section".to_string());
        }
        if doc.source_entries < 2 {
            errs.push("Fewer than 2 source list entries".to_string());
        }
        errs
    }
}

#[derive(Debug, Clone, Default)]
pub struct ComparisonTable;

impl QaCheck for ComparisonTable {
    fn name(&self) -> &'static str {
        "table"
    }

    fn check(&self, doc: &Document<'_>) -> Vec<String> {
        if doc.has_table {
            Vec::new()
        } else {
            vec!["Missing comparison table".to_string()]
        }
    }
}

/// Domain-trust section
#[derive(Debug, Clone, Default)]
pub struct PreparednessNotes;

impl QaCheck for PreparednessNotes {
    fn name(&self) -> &'static str {
        "preparedness_notes"
    }

    fn check(&self, doc: &Document<'_>) -> Vec<String> {
        if doc.lower.contains("preparedness notes") {
            Vec::new()
        } else {
            vec!["Missing 'Preparedness Notes' section".to_string()]
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LadderReference;

impl QaCheck for LadderReference {
    fn name(&self) -> &'static str {
        "ladder"
    }

    fn check(&self, doc: &Document<'_>) -> Vec<String> {
        if LADDER_PHRASES.iter().any(|p| doc.lower.contains(p)) {
            Vec::new()
        } else {
            vec!["No time-ladder reference".to_string()]
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FillerPhrases;

impl QaCheck for FillerPhrases {
    fn name(&self) -> &'static str {
        "filler"
    }

    fn check(&self, doc: &Document<'_>) -> Vec<String> {
        FILLER
            .iter()
            .filter(|(_, re)| re.is_match(doc.text))
            .map(|(phrase, _)| format!("Contains filler phrase: {}", phrase))
            .collect()
    }
}
