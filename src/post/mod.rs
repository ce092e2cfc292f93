//! @acp:module "Post-Processor"
//! @acp:summary "Deterministic markdown repairs applied before QA"
//! @acp:domain content
//! @acp:layer service
//!
//! The pipeline is a pure `&str -> String` function: encoding repair, byline,
//! comparison table, sources section, related links. Every step detects its
//! own output, so applying the pipeline twice equals applying it once.

pub mod encoding;
pub mod narrative;
pub mod repairs;

use similar::TextDiff;

pub use encoding::repair_encoding;
pub use narrative::{ensure_scaffold, nudge_readability, SECTION_ORDER};
pub use repairs::{
    dedup_sources, has_sources_heading, has_table, inject_byline, inject_related,
    synthesize_comparison_table, synthesize_sources, COMPARISON_HEADING,
};

use crate::config::PostConfig;
use crate::data::{Product, SourcePack, SourceRef};

/// Internal-link line appended to every article
pub const DEFAULT_RELATED_LINE: &str = "**Related:** [Water Preparedness Time Ladder](/water-preparedness-time-ladder) · [How to Sanitize Water Containers](/sanitize-water-containers)";

/// @acp:summary "Inputs the repairs draw on, resolved before the pipeline runs"
#[derive(Debug, Clone)]
pub struct PostContext {
    /// Byline name
    pub author: String,
    pub products: Vec<Product>,
    pub columns: Vec<String>,
    pub sources: Vec<SourceRef>,
    pub related_line: String,
    /// Append missing narrative sections
    pub scaffold: bool,
}

impl PostContext {
    /// Context from configuration alone (no pack data)
    pub fn from_config(config: &PostConfig) -> Self {
        Self {
            author: config.default_author.clone(),
            products: Vec::new(),
            columns: Vec::new(),
            sources: Vec::new(),
            related_line: config.related_line.clone(),
            scaffold: false,
        }
    }

    /// Add a source pack's products, comparison columns and sources
    pub fn with_pack(mut self, pack: &SourcePack) -> Self {
        self.products = pack.products.clone();
        self.columns = pack.comparison_columns.clone();
        self.sources = pack.sources.clone();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }
}

impl Default for PostContext {
    fn default() -> Self {
        Self::from_config(&PostConfig::default())
    }
}

/// @acp:summary "Runs the repair pipeline"
#[derive(Debug, Clone, Default)]
pub struct PostProcessor {
    context: PostContext,
}

impl PostProcessor {
    pub fn new(context: PostContext) -> Self {
        Self { context }
    }

    /// Apply every repair in order
    pub fn apply(&self, markdown: &str) -> String {
        let ctx = &self.context;
        let text = repair_encoding(markdown);
        let text = inject_byline(&text, &ctx.author);
        let text = if ctx.scaffold {
            ensure_scaffold(&text)
        } else {
            text
        };
        let text = synthesize_comparison_table(&text, &ctx.products, &ctx.columns);
        let text = synthesize_sources(&text, &ctx.sources);
        inject_related(&text, &ctx.related_line)
    }

    /// Unified diff between two versions of a document
    pub fn diff(before: &str, after: &str, name: &str) -> String {
        TextDiff::from_lines(before, after)
            .unified_diff()
            .context_radius(2)
            .header(&format!("a/{}", name), &format!("b/{}", name))
            .to_string()
    }
}
