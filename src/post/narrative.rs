//! @acp:module "Narrative Helpers"
//! @acp:summary "Opt-in scaffold completion and sentence shortening"
//! @acp:domain content
//! @acp:layer service

use std::sync::LazyLock;

use regex::Regex;

/// Canonical narrative sections, in the order they are appended
pub const SECTION_ORDER: [&str; 5] = ["TL;DR", "Why this matters", "How to do it", "Related", "FAQ"];

/// Sentences longer than this are split
const MAX_SENTENCE_WORDS: usize = 28;

static JOINER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:and|but|which|that|because|so)\b").unwrap());

static ORDERED_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+[.)]\s").unwrap());

fn scaffold_block(section: &str) -> &'static str {
    match section {
        "TL;DR" => concat!(
            "## TL;DR\n",
            "- Keep 4 L / 1 gal per person per day.\n",
            "- Build capacity in steps (3d → 2w → 30d → 90d).\n",
            "- Store in food-grade containers; cool, dark, and labeled.\n\n",
        ),
        "Why this matters" => concat!(
            "## Why this matters\n",
            "Water access fails more often than we expect. A small buffer protects hydration, ",
            "cooking, and hygiene through short outages or boil orders.\n\n",
        ),
        "How to do it" => concat!(
            "## How to do it\n",
            "1. Count people and days. Aim for at least 2 weeks.\n",
            "2. Start with sealed bottles or clean, food-grade jugs.\n",
            "3. Add a gravity filter and unscented bleach for disinfection.\n",
            "4. Label and rotate every 6–12 months.\n\n",
        ),
        "Related" => "## Related\n- (Add internal links or leave for renderer interlinks.)\n\n",
        _ => concat!(
            "## FAQ\n",
            "**Do I need a filter if I have bleach?** Filter improves taste and removes ",
            "particulates; bleach inactivates microbes. Both together are best.\n\n",
        ),
    }
}

fn has_section(markdown: &str, title: &str) -> bool {
    let pattern = format!(r"(?mi)^##\s+{}\s*$", regex::escape(title));
    Regex::new(&pattern)
        .map(|re| re.is_match(markdown))
        .unwrap_or(false)
}

/// Append any missing narrative section, in canonical order
pub fn ensure_scaffold(markdown: &str) -> String {
    let missing: Vec<&str> = SECTION_ORDER
        .iter()
        .copied()
        .filter(|t| !has_section(markdown, t))
        .collect();
    if missing.is_empty() {
        return markdown.to_string();
    }

    let mut out = markdown.to_string();
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out.push('\n');
    for section in missing {
        out.push_str(scaffold_block(section));
    }
    out
}

/// Split text into sentences after `.`, `?` or `!` followed by whitespace
fn split_sentences(line: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '?' | '!') && chars.peek().is_some_and(|n| n.is_whitespace()) {
            sentences.push(current.trim().to_string());
            current.clear();
        }
    }
    if !current.trim().is_empty() {
        sentences.push(current.trim().to_string());
    }
    sentences
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn shorten(sentence: &str) -> Vec<String> {
    if sentence.split_whitespace().count() <= MAX_SENTENCE_WORDS {
        return vec![sentence.to_string()];
    }
    let clauses: Vec<String> = JOINER
        .split(sentence)
        .map(|c| c.trim().trim_end_matches(',').trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    if clauses.len() < 2 {
        return vec![sentence.to_string()];
    }
    clauses.iter().map(|c| capitalize(c)).collect()
}

fn is_structural(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty()
        || line.starts_with('#')
        || trimmed.starts_with('-')
        || trimmed.starts_with('*')
        || trimmed.starts_with('|')
        || trimmed.starts_with('>')
        || ORDERED_ITEM.is_match(trimmed)
}

/// Light-touch edits that tend to lower the reading grade.
///
/// Headings, lists, tables and quotes are left alone.
pub fn nudge_readability(markdown: &str) -> String {
    let lines: Vec<String> = markdown
        .lines()
        .map(|line| {
            if is_structural(line) {
                return line.to_string();
            }
            let normalized = line
                .replace(" — ", ". ")
                .replace('–', "-")
                .replace(';', ". ");
            let shorter: Vec<String> = split_sentences(&normalized)
                .iter()
                .flat_map(|s| shorten(s))
                .map(|mut s| {
                    if !s.ends_with(['.', '?', '!']) {
                        s.push('.');
                    }
                    s
                })
                .collect();
            if shorter.is_empty() {
                line.to_string()
            } else {
                shorter.join(" ")
            }
        })
        .collect();

    let mut out = lines.join("\n");
    if markdown.ends_with('\n') {
        out.push('\n');
    }
    out
}
