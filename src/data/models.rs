//! @acp:module "Bundle Models"
//! @acp:summary "Typed records for article bundles, authors and editorial targets"
//! @acp:domain content
//! @acp:layer model

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

fn default_fk_max() -> f64 {
    8.0
}

fn default_style_min() -> f64 {
    0.85
}

fn default_min_quotes() -> u32 {
    2
}

fn default_min_stats() -> u32 {
    2
}

fn default_min_faqs() -> u32 {
    5
}

fn default_min_internal_links() -> u32 {
    3
}

fn default_min_external_links() -> u32 {
    2
}

fn default_min_words() -> u32 {
    900
}

fn default_min_sections() -> u32 {
    6
}

fn default_true() -> bool {
    true
}

/// @acp:summary "Numeric and boolean quality thresholds for a bundle"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorialTargets {
    #[serde(default = "default_fk_max")]
    pub fk_max: f64,
    #[serde(default = "default_style_min")]
    pub style_min: f64,
    #[serde(default = "default_min_quotes")]
    pub min_quotes: u32,
    #[serde(default = "default_min_stats")]
    pub min_stats: u32,
    #[serde(default = "default_min_faqs")]
    pub min_faqs: u32,
    #[serde(default = "default_min_internal_links")]
    pub min_internal_links: u32,
    #[serde(default = "default_min_external_links")]
    pub min_external_links: u32,
    #[serde(default = "default_min_words")]
    pub min_words: u32,
    #[serde(default = "default_min_sections")]
    pub min_sections: u32,
    #[serde(default = "default_true")]
    pub narrative_flow_required: bool,
    #[serde(default = "default_true")]
    pub reviewer_signoff_required: bool,
}

impl Default for EditorialTargets {
    fn default() -> Self {
        Self {
            fk_max: default_fk_max(),
            style_min: default_style_min(),
            min_quotes: default_min_quotes(),
            min_stats: default_min_stats(),
            min_faqs: default_min_faqs(),
            min_internal_links: default_min_internal_links(),
            min_external_links: default_min_external_links(),
            min_words: default_min_words(),
            min_sections: default_min_sections(),
            narrative_flow_required: true,
            reviewer_signoff_required: true,
        }
    }
}

/// @acp:summary "Author record from the registry"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub author_id: String,
    pub display_name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub credentials: Vec<String>,
    #[serde(default)]
    pub expertise_domains: Vec<String>,
}

/// @acp:summary "One article to produce"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticlePlan {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub primary_keyword: Option<String>,
    #[serde(default)]
    pub personas: Vec<String>,
    #[serde(default)]
    pub interlink_out: Vec<String>,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub reviewer_id: Option<String>,
}

/// References to the supporting process files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Methodology {
    #[serde(default)]
    pub objectives_ref: Option<String>,
    #[serde(default)]
    pub requirements_ref: Option<String>,
    #[serde(default)]
    pub design_ref: Option<String>,
    #[serde(default)]
    pub deployment_ref: Option<String>,
}

/// @acp:summary "A set of article plans with shared authors and targets"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    #[serde(default)]
    pub bundle_slug: Option<String>,
    #[serde(default)]
    pub article_plan: Vec<ArticlePlan>,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub editorial_targets: EditorialTargets,
    #[serde(default)]
    pub methodology: Option<Methodology>,
}

/// An interlink whose target is not a plan in the same bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingInterlink {
    pub from: String,
    pub to: String,
}

impl Bundle {
    /// Find an injected author by id
    pub fn author(&self, author_id: &str) -> Option<&Author> {
        self.authors.iter().find(|a| a.author_id == author_id)
    }

    /// Find a plan by slug
    pub fn plan(&self, slug: &str) -> Option<&ArticlePlan> {
        self.article_plan.iter().find(|p| p.slug == slug)
    }

    /// Interlinks pointing outside the bundle, in plan order
    pub fn dangling_interlinks(&self) -> Vec<DanglingInterlink> {
        let slugs: HashSet<&str> = self.article_plan.iter().map(|p| p.slug.as_str()).collect();
        self.article_plan
            .iter()
            .flat_map(|plan| {
                plan.interlink_out
                    .iter()
                    .filter(|target| !slugs.contains(target.as_str()))
                    .map(move |target| DanglingInterlink {
                        from: plan.slug.clone(),
                        to: target.clone(),
                    })
            })
            .collect()
    }
}
