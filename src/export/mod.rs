//! @acp:module "Export"
//! @acp:summary "Static HTML export with JSON-LD Article metadata, and WordPress publishing"
//! @acp:domain export
//! @acp:layer feature

pub mod html;
pub mod publish;

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::Local;
use handlebars::Handlebars;
use regex::Regex;
use serde::Serialize;
use serde_json::json;

pub use html::markdown_to_html;
pub use publish::{PostStatus, WordPressPublisher};

use crate::error::{PraepError, Result};
use crate::render::title_from_slug;

/// JSON-LD author when the article carries no byline
pub const DEFAULT_LD_AUTHOR: &str = "Praeparium Editorial";
pub const LD_PUBLISHER: &str = "Praeparium";

/// `By Name` at the start of a line, optionally wrapped in emphasis; the name is capitalized
static AUTHOR_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[_*]{0,2}By\s+(\p{Lu}.*?)[._*]{0,2}$").unwrap());
static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(20\d{2}-\d{2}-\d{2})\b").unwrap());

/// @acp:summary "Title, author and date recovered from article markdown"
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleMeta {
    pub title: String,
    pub slug: String,
    pub author: Option<String>,
    pub date_published: Option<String>,
}

impl ArticleMeta {
    /// First `# ` line as title (else the title-cased slug), first `By NAME`
    /// line as author, first `20YY-MM-DD` token as publish date
    pub fn extract(markdown: &str, slug: &str) -> Self {
        let title = markdown
            .lines()
            .find_map(|l| l.strip_prefix("# "))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| title_from_slug(slug));

        let author = AUTHOR_LINE
            .captures(markdown)
            .map(|c| c[1].trim().to_string())
            .filter(|a| !a.is_empty());

        let date_published = ISO_DATE.captures(markdown).map(|c| c[1].to_string());

        Self {
            title,
            slug: slug.to_string(),
            author,
            date_published,
        }
    }

    /// JSON-LD Article object; `today` fills a missing date
    pub fn json_ld(&self, base_url: Option<&str>, today: &str) -> serde_json::Value {
        let mut ld = json!({
            "@context": "https://schema.org",
            "@type": "Article",
            "headline": self.title,
            "author": self.author.as_deref().unwrap_or(DEFAULT_LD_AUTHOR),
            "publisher": LD_PUBLISHER,
            "datePublished": self.date_published.as_deref().unwrap_or(today),
        });
        if let Some(base) = base_url.filter(|b| !b.trim().is_empty()) {
            ld["url"] = json!(format!("{}/{}", base.trim_end_matches('/'), self.slug));
        }
        ld
    }
}

#[derive(Serialize)]
struct PageData<'a> {
    title: &'a str,
    json_ld: String,
    body: String,
}

/// @acp:summary "Renders markdown articles into standalone HTML pages"
pub struct HtmlExporter {
    handlebars: Handlebars<'static>,
    base_url: Option<String>,
}

impl HtmlExporter {
    pub fn new(base_url: Option<String>) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_template_string("page", include_str!("../../templates/page.html.hbs"))?;
        Ok(Self { handlebars, base_url })
    }

    /// Full HTML page for one article
    pub fn render_page(&self, markdown: &str, slug: &str) -> Result<String> {
        let meta = ArticleMeta::extract(markdown, slug);
        let today = Local::now().format("%Y-%m-%d").to_string();
        let ld = serde_json::to_string(&meta.json_ld(self.base_url.as_deref(), &today))?;
        let data = PageData {
            title: &meta.title,
            // keep a literal "</script>" inside the JSON from closing the tag
            json_ld: ld.replace("</", "<\\/"),
            body: markdown_to_html(markdown),
        };
        Ok(self.handlebars.render("page", &data)?)
    }

    /// Export one markdown file to `<out_dir>/<stem>.html`
    pub fn export_file(&self, src: &Path, out_dir: &Path) -> Result<PathBuf> {
        let slug = src
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| PraepError::Other(format!("invalid file name: {}", src.display())))?;
        let markdown = std::fs::read_to_string(src)?;
        let page = self.render_page(&markdown, slug)?;
        let out = out_dir.join(format!("{}.html", slug));
        std::fs::write(&out, page)?;
        tracing::debug!("Exported {} -> {}", src.display(), out.display());
        Ok(out)
    }
}

/// Export every `*.md` directly in `src` into `out`; returns the written paths
pub fn export_dir(src: &Path, out: &Path, base_url: Option<&str>) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out)?;

    let pattern = src.join("*.md");
    let pattern = pattern.to_string_lossy();
    let mut sources: Vec<PathBuf> = glob::glob(&pattern)
        .map_err(|e| PraepError::Other(e.to_string()))?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();
    sources.sort();

    if sources.is_empty() {
        tracing::warn!("No .md files found in {}", src.display());
        return Ok(Vec::new());
    }

    let exporter = HtmlExporter::new(base_url.map(String::from))?;
    sources
        .iter()
        .map(|path| exporter.export_file(path, out))
        .collect()
}
