//! @acp:module "Repairs"
//! @acp:summary "Byline, comparison table, sources and internal-link repairs"
//! @acp:domain content
//! @acp:layer service
//!
//! Each repair checks for its own output first, so running it twice is a no-op.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::data::{Product, SourceRef};

/// How far into the document a bare "By Name" still counts as a byline
const BYLINE_WINDOW: usize = 200;

/// Heading placed above a synthesized table
pub const COMPARISON_HEADING: &str = "## Comparison table";

/// "By Name" at the start of a line, optionally wrapped in emphasis
static BYLINE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[_*]{0,2}By\s+\p{Lu}").unwrap());

static BYLINE_ANYWHERE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bBy\s+\p{Lu}").unwrap());

/// Markdown table divider row, e.g. `| --- | :---: |` or a single `| --- |`
static TABLE_DIVIDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?m)^[ \t]*\|?[ \t]*:?-{3,}:?[ \t]*(\|[ \t]*:?-{3,}:?[ \t]*)+\|?[ \t]*$",
        r"|^[ \t]*\|[ \t]*:?-{3,}:?[ \t]*\|[ \t]*$",
    ))
    .unwrap()
});

static SOURCES_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mi)^##[ \t]+Sources[ \t]*$").unwrap());

/// True when `text` contains a markdown table divider row
pub fn has_table(text: &str) -> bool {
    TABLE_DIVIDER.is_match(text)
}

/// True when `text` has a `## Sources` heading
pub fn has_sources_heading(text: &str) -> bool {
    SOURCES_HEADING.is_match(text)
}

fn has_byline(text: &str, author: &str) -> bool {
    let own = format!(r"(?m)^_By {}_[ \t]*$", regex::escape(author));
    if Regex::new(&own).is_ok_and(|re| re.is_match(text)) || BYLINE_LINE.is_match(text) {
        return true;
    }
    let head: String = text.chars().take(BYLINE_WINDOW).collect();
    BYLINE_ANYWHERE.is_match(&head)
}

/// Insert `_By <author>_` after the first H1 (or at the top) when no byline exists
pub fn inject_byline(text: &str, author: &str) -> String {
    if author.trim().is_empty() || has_byline(text, author.trim()) {
        return text.to_string();
    }
    let byline = format!("_By {}_", author.trim());

    let mut out = String::with_capacity(text.len() + byline.len() + 4);
    let mut inserted = false;
    for line in text.split_inclusive('\n') {
        out.push_str(line);
        if !inserted && line.starts_with("# ") {
            if !line.ends_with('\n') {
                out.push('\n');
            }
            out.push('\n');
            out.push_str(&byline);
            out.push('\n');
            inserted = true;
        }
    }

    if inserted {
        out
    } else {
        format!("{}\n\n{}", byline, text)
    }
}

/// Append `block` as a new section, separated by one blank line
fn append_block(text: &str, block: &str) -> String {
    let mut out = text.trim_end_matches('\n').to_string();
    if !out.is_empty() {
        out.push_str("\n\n");
    }
    out.push_str(block);
    out.push('\n');
    out
}

fn table_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

/// Append a comparison table built from `products` and `columns`.
///
/// Skipped when the text already has a table or either list is empty.
pub fn synthesize_comparison_table(text: &str, products: &[Product], columns: &[String]) -> String {
    if products.is_empty() || columns.is_empty() || has_table(text) {
        return text.to_string();
    }

    let mut block = String::new();
    block.push_str(COMPARISON_HEADING);
    block.push_str("\n\n| ");
    block.push_str(
        &columns
            .iter()
            .map(|c| table_cell(c))
            .collect::<Vec<_>>()
            .join(" | "),
    );
    block.push_str(" |\n|");
    block.push_str(&" --- |".repeat(columns.len()));
    for product in products {
        block.push_str("\n| ");
        block.push_str(
            &columns
                .iter()
                .map(|c| table_cell(&product.column_value(c)))
                .collect::<Vec<_>>()
                .join(" | "),
        );
        block.push_str(" |");
    }

    append_block(text, &block)
}

fn source_bullet(source: &SourceRef) -> String {
    let label = match source.publisher.as_deref().map(str::trim) {
        Some(p) if !p.is_empty() => format!("{} ({})", source.title, p),
        _ => source.title.clone(),
    };
    if source.url.trim().is_empty() {
        format!("- {}", label)
    } else {
        format!("- [{}]({})", label, source.url.trim())
    }
}

/// Sources deduplicated by URL (title when the URL is blank), first seen wins
pub fn dedup_sources(sources: &[SourceRef]) -> Vec<&SourceRef> {
    let mut seen = HashSet::new();
    sources
        .iter()
        .filter(|s| {
            let key = if s.url.trim().is_empty() {
                format!("title:{}", s.title.trim())
            } else {
                format!("url:{}", s.url.trim())
            };
            seen.insert(key)
        })
        .collect()
}

/// Append a `## Sources` section when missing and sources are available
pub fn synthesize_sources(text: &str, sources: &[SourceRef]) -> String {
    if sources.is_empty() || has_sources_heading(text) {
        return text.to_string();
    }

    let bullets: Vec<String> = dedup_sources(sources).into_iter().map(source_bullet).collect();
    append_block(text, &format!("## Sources\n\n{}", bullets.join("\n")))
}

/// Append the related-links line unless it is already present
pub fn inject_related(text: &str, related_line: &str) -> String {
    if related_line.is_empty() || text.contains(related_line) {
        return text.to_string();
    }
    append_block(text, related_line)
}
