//! @acp:module "Jargon"
//! @acp:summary "Banned corporate jargon detection"
//! @acp:domain qa
//! @acp:layer service

use std::collections::BTreeSet;

use super::{Document, QaCheck};

/// Banned phrases, lowercase
pub const BANNED_JARGON: &[&str] = &[
    "boil the ocean",
    "move the needle",
    "low-hanging fruit",
    "paradigm shift",
    "win-win",
    "synergy",
    "circle back",
    "kpis and okrs",
    "touch base",
    "mission-critical",
    "cutting-edge",
    "next-gen",
    "state-of-the-art",
];

/// Sorted distinct banned phrases found in `markdown` (case-insensitive substring)
pub fn find_jargon(markdown: &str) -> Vec<&'static str> {
    let lower = markdown.to_lowercase();
    find_in_lower(&lower)
}

fn find_in_lower(lower: &str) -> Vec<&'static str> {
    BANNED_JARGON
        .iter()
        .copied()
        .filter(|phrase| lower.contains(phrase))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct JargonCheck;

impl QaCheck for JargonCheck {
    fn name(&self) -> &'static str {
        "jargon"
    }

    fn check(&self, doc: &Document<'_>) -> Vec<String> {
        find_in_lower(&doc.lower)
            .into_iter()
            .map(|hit| format!("Corporate jargon: {}", hit))
            .collect()
    }
}
