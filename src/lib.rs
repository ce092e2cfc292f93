#![forbid(unsafe_code)]

//! @acp:module "Praeparium Library"
//! @acp:summary "Bundle-driven preparedness articles with deterministic repairs and QA gates"
//! @acp:domain content
//! @acp:layer api
//! @acp:stability experimental
//!
//! # Praeparium
//!
//! Content pipeline for formulaic preparedness articles:
//!
//! ```text
//! Loader -> (Template Renderer | LLM Writer) -> Post-Processor -> QA Validator -> report
//! ```
//!
//! The methodology auditor runs independently over a bundle's folder, and the
//! exporter turns finished markdown into static HTML or WordPress posts.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use praeparium::post::{PostContext, PostProcessor};
//! use praeparium::qa::Validator;
//!
//! fn main() -> praeparium::Result<()> {
//!     let text = std::fs::read_to_string("out/water-storage.md")?;
//!     let repaired = PostProcessor::new(PostContext::default()).apply(&text);
//!     std::fs::write("out/water-storage.md", repaired)?;
//!
//!     let report = Validator::default().audit_dir(Path::new("out"))?;
//!     for (path, violations) in &report {
//!         println!("{}: {}", path.display(), violations.join("; "));
//!     }
//!     Ok(())
//! }
//! ```

pub mod audit;
pub mod commands;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod post;
pub mod qa;
pub mod render;
pub mod writer;

// Re-exports
pub use audit::{audit_bundle, AuditReport};
pub use config::Config;
pub use data::{load_bundle, load_source_pack, Bundle, EditorialTargets, SourcePack};
pub use error::{PraepError, Result};
pub use export::{export_dir, ArticleMeta, WordPressPublisher};
pub use post::{PostContext, PostProcessor};
pub use qa::{QaCheck, QaReport, Validator};
pub use render::{render_bundle, ArticleRenderer, HandlebarsRenderer, RenderBundle};
pub use writer::{ChatClient, OpenAiClient, Writer};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
