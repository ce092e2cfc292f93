//! @acp:module "Claims"
//! @acp:summary "Required-concept coverage for articles written from a source pack"
//! @acp:domain qa
//! @acp:layer service

use std::sync::LazyLock;

use regex::Regex;

use super::{Document, QaCheck};

/// Concept name and the pattern that proves it is covered
static CONCEPTS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("time ladder", r"(?is)(72h|72 hours).*(2w|two weeks).*(30d|30 days|month)"),
        ("rotation", r"(?is)rotate|rotation|6–12|6-12"),
        ("ergonomics", r"(?is)(55-?gal|55 gallon|208\s?kg|460\s?lb|floor[- ]?load|lb/ft)"),
        ("citations", r"(?is)\[Source:"),
    ]
    .into_iter()
    .map(|(name, pattern)| (name, Regex::new(pattern).unwrap()))
    .collect()
});

/// Names of the concepts `markdown` does not cover, in fixed order
pub fn missing_concepts(markdown: &str) -> Vec<&'static str> {
    CONCEPTS
        .iter()
        .filter(|(_, re)| !re.is_match(markdown))
        .map(|(name, _)| *name)
        .collect()
}

/// Enabled when an article comes from a source pack with a claims checklist
#[derive(Debug, Clone, Default)]
pub struct ClaimsCheck;

impl QaCheck for ClaimsCheck {
    fn name(&self) -> &'static str {
        "claims"
    }

    fn check(&self, doc: &Document<'_>) -> Vec<String> {
        missing_concepts(doc.text)
            .into_iter()
            .map(|name| format!("Missing required concept: {}", name))
            .collect()
    }
}
