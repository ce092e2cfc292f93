//! @acp:module "Render"
//! @acp:summary "Template rendering of hub/guide/review/FAQ bundles with cross-links"
//! @acp:domain content
//! @acp:layer feature
//!
//! Items are rendered one by one into `<slug>.md`. A failing item is recorded
//! and the batch continues; the summary reports overall success.

pub mod context;
pub mod planner;
pub mod renderer;
pub mod types;

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

pub use context::{LinkContext, RenderContext};
pub use planner::{build_outline, Outline};
pub use renderer::{ArticleRenderer, HandlebarsRenderer, DEFAULT_LADDER};
pub use types::{
    load_render_bundle, title_from_slug, Faq, ItemKind, Link, Pick, RenderBundle, RenderItem,
};

use crate::error::Result;

/// Any markdown heading line; group 1 is the heading text
static HEADING_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6}[ \t]+(.+?)[ \t]*#*[ \t]*$").unwrap());

/// Required headings for `kind` that `markdown` does not contain
pub fn missing_headings(markdown: &str, kind: ItemKind) -> Vec<&'static str> {
    let present: Vec<&str> = HEADING_LINE
        .captures_iter(markdown)
        .filter_map(|c| c.get(1).map(|m| m.as_str().trim()))
        .collect();

    kind.required_headings()
        .iter()
        .filter(|required| !present.contains(*required))
        .copied()
        .collect()
}

/// Why one item did not render cleanly
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure {
    pub slug: String,
    pub reason: String,
}

/// @acp:summary "Outcome of rendering a bundle"
#[derive(Debug, Clone, Default)]
pub struct RenderSummary {
    pub written: Vec<PathBuf>,
    pub failures: Vec<ItemFailure>,
}

impl RenderSummary {
    pub fn success(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, slug: &str, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::error!("{}: {}", slug, reason);
        self.failures.push(ItemFailure {
            slug: slug.to_string(),
            reason,
        });
    }
}

/// Render every item of `bundle` into `out_dir` through `renderer`
pub fn render_bundle(
    bundle: &RenderBundle,
    out_dir: &Path,
    renderer: &dyn ArticleRenderer,
) -> Result<RenderSummary> {
    std::fs::create_dir_all(out_dir)?;
    let mut summary = RenderSummary::default();

    for item in &bundle.items {
        let Some(kind) = item.item_kind() else {
            tracing::warn!("Skipping {}: unknown type '{}'", item.slug, item.kind);
            summary.fail(&item.slug, format!("unknown type '{}'", item.kind));
            continue;
        };

        let ctx = RenderContext::build(bundle, item);
        let markdown = match renderer.render(item, kind, &ctx) {
            Ok(md) => md,
            Err(e) => {
                summary.fail(&item.slug, format!("render failed: {}", e));
                continue;
            }
        };

        let path = out_dir.join(format!("{}.md", item.slug));
        if let Err(e) = std::fs::write(&path, &markdown) {
            summary.fail(&item.slug, format!("write failed: {}", e));
            continue;
        }
        tracing::debug!("Rendered {} ({}) -> {}", item.slug, kind, path.display());
        summary.written.push(path);

        let missing = missing_headings(&markdown, kind);
        if !missing.is_empty() {
            summary.fail(&item.slug, format!("missing headings: {}", missing.join(", ")));
        }
    }

    Ok(summary)
}
