//! @acp:module "Render Types"
//! @acp:summary "Render bundle, items and item kinds for the template renderer"
//! @acp:domain content
//! @acp:layer model

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::data::{read_document, Bundle, SourceRef};
use crate::error::Result;

/// @acp:summary "Template family an item renders through"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Hub,
    Guide,
    Review,
    Faq,
}

impl ItemKind {
    pub fn all() -> [ItemKind; 4] {
        [ItemKind::Hub, ItemKind::Guide, ItemKind::Review, ItemKind::Faq]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Hub => "hub",
            ItemKind::Guide => "guide",
            ItemKind::Review => "review",
            ItemKind::Faq => "faq",
        }
    }

    /// Everything that is not a hub hangs off one
    pub fn is_spoke(&self) -> bool {
        !matches!(self, ItemKind::Hub)
    }

    /// Headings a rendered item of this kind must contain
    pub fn required_headings(&self) -> &'static [&'static str] {
        match self {
            ItemKind::Hub => &[
                "TL;DR",
                "Who this is for",
                "Timeframe ladder",
                "Core decisions",
                "Spokes",
                "FAQs",
            ],
            ItemKind::Guide => &[
                "TL;DR",
                "Who this is for",
                "Step by step",
                "Common mistakes",
                "Related",
                "FAQs",
            ],
            ItemKind::Review => &[
                "TL;DR",
                "Who this is for",
                "Top picks",
                "Comparison",
                "How we tested",
                "FAQs",
            ],
            ItemKind::Faq => &["TL;DR", "Questions", "Related"],
        }
    }
}

impl std::str::FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hub" => Ok(ItemKind::Hub),
            "guide" => Ok(ItemKind::Guide),
            "review" => Ok(ItemKind::Review),
            "faq" => Ok(ItemKind::Faq),
            _ => Err(format!("Unknown item type: {}", s)),
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A titled link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub title: String,
    pub url: String,
}

impl Link {
    /// Root-relative link to another article
    pub fn internal(title: impl Into<String>, slug: &str) -> Self {
        Self {
            title: title.into(),
            url: format!("/{}", slug),
        }
    }
}

/// Question and answer pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

/// Reviewed product pick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    pub name: String,
    #[serde(default)]
    pub reason: String,
}

/// @acp:summary "One article in a render bundle"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderItem {
    /// Raw type tag; parsed with `ItemKind::from_str`
    #[serde(rename = "type")]
    pub kind: String,
    pub slug: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Parent hub for spokes
    #[serde(default)]
    pub hub_slug: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub primary_keyword: Option<String>,
    #[serde(default)]
    pub personas: Vec<String>,
    /// Overrides the bundle default when present
    #[serde(default)]
    pub external_links: Option<Vec<Link>>,
    /// Overrides the bundle default when present
    #[serde(default)]
    pub source: Option<SourceRef>,
    #[serde(default)]
    pub related: Vec<Link>,
    #[serde(default)]
    pub ladder: Vec<String>,
    #[serde(default)]
    pub decisions: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub mistakes: Vec<String>,
    #[serde(default)]
    pub picks: Vec<Pick>,
    #[serde(default)]
    pub faqs: Vec<Faq>,
    /// Free-form fields available to templates as `extra.*`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RenderItem {
    /// Minimal item; used by `RenderBundle::from_bundle` and tests
    pub fn new(kind: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            slug: slug.into(),
            title: None,
            hub_slug: None,
            summary: None,
            primary_keyword: None,
            personas: Vec::new(),
            external_links: None,
            source: None,
            related: Vec::new(),
            ladder: Vec::new(),
            decisions: Vec::new(),
            steps: Vec::new(),
            mistakes: Vec::new(),
            picks: Vec::new(),
            faqs: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Parsed kind, or `None` for unknown tags
    pub fn item_kind(&self) -> Option<ItemKind> {
        self.kind.parse().ok()
    }

    /// Explicit title, else the slug in title case
    pub fn display_title(&self) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => title_from_slug(&self.slug),
        }
    }
}

/// @acp:summary "Flat list of typed items with bundle-wide defaults"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderBundle {
    #[serde(default)]
    pub bundle_slug: Option<String>,
    /// Inherited by every item without its own list
    #[serde(default)]
    pub external_links: Vec<Link>,
    /// Inherited by every item without its own source
    #[serde(default)]
    pub source: Option<SourceRef>,
    #[serde(default)]
    pub items: Vec<RenderItem>,
}

impl RenderBundle {
    /// Convert an article-plan bundle into render items.
    ///
    /// The kind comes from the template stem (`hub.md.j2` -> hub), defaulting
    /// to guide; interlinks become related links.
    pub fn from_bundle(bundle: &Bundle) -> Self {
        let items = bundle
            .article_plan
            .iter()
            .map(|plan| {
                let kind = plan
                    .template
                    .as_deref()
                    .and_then(|t| t.split('.').next())
                    .filter(|stem| !stem.is_empty())
                    .unwrap_or("guide")
                    .to_lowercase();

                let mut item = RenderItem::new(kind, plan.slug.clone());
                item.title = Some(plan.title.clone());
                item.primary_keyword = plan.primary_keyword.clone();
                item.personas = plan.personas.clone();
                item.related = plan
                    .interlink_out
                    .iter()
                    .map(|target| {
                        let title = bundle
                            .plan(target)
                            .map(|p| p.title.clone())
                            .unwrap_or_else(|| title_from_slug(target));
                        Link::internal(title, target)
                    })
                    .collect();
                item
            })
            .collect();

        Self {
            bundle_slug: bundle.bundle_slug.clone(),
            external_links: Vec::new(),
            source: None,
            items,
        }
    }

    pub fn item(&self, slug: &str) -> Option<&RenderItem> {
        self.items.iter().find(|i| i.slug == slug)
    }
}

/// Load a render bundle; plan bundles (`article_plan`) are converted
pub fn load_render_bundle(path: &Path) -> Result<RenderBundle> {
    let raw: Value = read_document(path)?;
    if raw.get("items").is_some() {
        return serde_json::from_value(raw).map_err(|e| crate::PraepError::parse(path, e));
    }
    let bundle: Bundle =
        serde_json::from_value(raw).map_err(|e| crate::PraepError::parse(path, e))?;
    for link in bundle.dangling_interlinks() {
        tracing::warn!("Interlink {} -> {} does not resolve inside the bundle", link.from, link.to);
    }
    Ok(RenderBundle::from_bundle(&bundle))
}

/// `filters-for-preppers` -> `Filters For Preppers`
pub fn title_from_slug(slug: &str) -> String {
    slug.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
