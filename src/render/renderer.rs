//! @acp:module "Article Renderer"
//! @acp:summary "Render contract and the handlebars implementation"
//! @acp:domain content
//! @acp:layer output

use std::path::Path;

use handlebars::Handlebars;
use serde::Serialize;
use serde_json::{Map, Value};

use super::context::{LinkContext, RenderContext};
use super::planner::Outline;
use super::types::{title_from_slug, Faq, ItemKind, Link, Pick, RenderItem};
use crate::data::{ArticlePlan, SourceRef};
use crate::error::Result;

/// Rungs used when a hub does not define its own ladder
pub const DEFAULT_LADDER: [&str; 4] = ["72 hours", "2 weeks", "30 days", "90 days"];

/// @acp:summary "Render contract: one item in, markdown out"
pub trait ArticleRenderer {
    fn render(&self, item: &RenderItem, kind: ItemKind, ctx: &RenderContext) -> Result<String>;
}

/// Data handed to every item template
#[derive(Debug, Serialize)]
struct TemplateData<'a> {
    title: String,
    slug: &'a str,
    kind: &'static str,
    bundle_slug: Option<&'a str>,
    summary: Option<&'a str>,
    primary_keyword: Option<&'a str>,
    personas: &'a [String],
    ladder: Vec<String>,
    decisions: &'a [String],
    steps: &'a [String],
    mistakes: &'a [String],
    picks: &'a [Pick],
    faqs: &'a [Faq],
    related: &'a [Link],
    links: &'a LinkContext,
    external_links: &'a [Link],
    source: Option<&'a SourceRef>,
    extra: &'a Map<String, Value>,
}

/// Data for the plain plan article
#[derive(Debug, Serialize)]
struct PlanData {
    title: String,
    why: Option<String>,
    personas: String,
    related: Vec<Link>,
}

/// @acp:summary "Handlebars renderer with the built-in article templates"
pub struct HandlebarsRenderer {
    registry: Handlebars<'static>,
}

impl HandlebarsRenderer {
    /// Register the embedded templates
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        // Output is markdown, not HTML
        registry.register_escape_fn(handlebars::no_escape);

        registry.register_template_string("hub", include_str!("../../templates/hub.md.hbs"))?;
        registry.register_template_string("guide", include_str!("../../templates/guide.md.hbs"))?;
        registry.register_template_string("review", include_str!("../../templates/review.md.hbs"))?;
        registry.register_template_string("faq", include_str!("../../templates/faq.md.hbs"))?;
        registry
            .register_template_string("article", include_str!("../../templates/article.md.hbs"))?;

        Ok(Self { registry })
    }

    /// Replace one of the built-in templates (e.g. a house-style hub)
    pub fn override_template(&mut self, kind: ItemKind, source: &str) -> Result<()> {
        self.registry.register_template_string(kind.as_str(), source)?;
        Ok(())
    }

    /// Override built-ins with `<kind>.md.hbs` files found in `dir`
    pub fn with_template_dir(mut self, dir: &Path) -> Result<Self> {
        for kind in ItemKind::all() {
            let path = dir.join(format!("{}.md.hbs", kind.as_str()));
            if !path.is_file() {
                continue;
            }
            let source = std::fs::read_to_string(&path)?;
            self.override_template(kind, &source)?;
            tracing::debug!("Using {} template from {}", kind, path.display());
        }
        Ok(self)
    }

    /// Render a bare article plan with the fixed narrative layout
    pub fn render_plan(&self, plan: &ArticlePlan, outline: Option<&Outline>) -> Result<String> {
        let title = if plan.title.trim().is_empty() {
            title_from_slug(&plan.slug)
        } else {
            plan.title.clone()
        };
        let personas = outline
            .map(|o| o.personas.clone())
            .unwrap_or_else(|| personas_line(&plan.personas));

        let data = PlanData {
            title,
            why: outline.and_then(|o| o.why.clone()),
            personas,
            related: plan
                .interlink_out
                .iter()
                .map(|slug| Link::internal(title_from_slug(slug), slug))
                .collect(),
        };
        Ok(self.registry.render("article", &data)?)
    }
}

impl ArticleRenderer for HandlebarsRenderer {
    fn render(&self, item: &RenderItem, kind: ItemKind, ctx: &RenderContext) -> Result<String> {
        let ladder = if item.ladder.is_empty() {
            DEFAULT_LADDER.iter().map(|s| s.to_string()).collect()
        } else {
            item.ladder.clone()
        };

        let data = TemplateData {
            title: item.display_title(),
            slug: &item.slug,
            kind: kind.as_str(),
            bundle_slug: ctx.bundle_slug.as_deref(),
            summary: item.summary.as_deref(),
            primary_keyword: item.primary_keyword.as_deref(),
            personas: &item.personas,
            ladder,
            decisions: &item.decisions,
            steps: &item.steps,
            mistakes: &item.mistakes,
            picks: &item.picks,
            faqs: &item.faqs,
            related: &item.related,
            links: &ctx.links,
            external_links: &ctx.external_links,
            source: ctx.source.as_ref(),
            extra: &item.extra,
        };

        Ok(self.registry.render(kind.as_str(), &data)?)
    }
}

/// "urban preppers, families", or "readers" when empty
pub fn personas_line(personas: &[String]) -> String {
    if personas.is_empty() {
        "readers".to_string()
    } else {
        personas.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{build_outline, missing_headings, RenderBundle};

    fn plan(slug: &str, title: &str) -> ArticlePlan {
        ArticlePlan {
            slug: slug.into(),
            title: title.into(),
            template: None,
            primary_keyword: None,
            personas: vec![],
            interlink_out: vec![],
            author_id: None,
            reviewer_id: None,
        }
    }

    #[test]
    fn test_render_plan_without_outline() {
        let renderer = HandlebarsRenderer::new().unwrap();
        let md = renderer
            .render_plan(&plan("filters-for-preppers", "Filters for Preppers"), None)
            .unwrap();

        assert_eq!(md.lines().next(), Some("# Filters for Preppers"));
        assert!(md.contains("## FAQ"));
        assert!(md.contains("readers"));
    }

    #[test]
    fn test_render_plan_with_outline_and_empty_title() {
        let renderer = HandlebarsRenderer::new().unwrap();
        let mut p = plan("water-storage", "");
        p.personas = vec!["urban preppers".into(), "families".into()];
        p.interlink_out = vec!["filters-for-preppers".into()];
        let mut outline = build_outline(&p);
        outline.why = Some("Because hydration matters more than anything else.".into());

        let md = renderer.render_plan(&p, Some(&outline)).unwrap();
        assert!(md.starts_with("# Water Storage\n"));
        assert!(md.contains("Because hydration matters"));
        assert!(md.contains("urban preppers, families"));
        assert!(md.contains("[Filters For Preppers](/filters-for-preppers)"));
    }

    #[test]
    fn test_every_kind_renders_its_required_headings() {
        let renderer = HandlebarsRenderer::new().unwrap();
        let bundle = RenderBundle::default();
        for kind in [ItemKind::Hub, ItemKind::Guide, ItemKind::Review, ItemKind::Faq] {
            let item = RenderItem::new(kind.as_str(), "sample");
            let ctx = RenderContext::build(&bundle, &item);
            let md = renderer.render(&item, kind, &ctx).unwrap();
            assert!(
                missing_headings(&md, kind).is_empty(),
                "{kind} is missing headings:\n{md}"
            );
        }
    }

    #[test]
    fn test_template_dir_overrides_matching_kinds() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("faq.md.hbs"), "# {{title}} (house style)\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let renderer = HandlebarsRenderer::new()
            .unwrap()
            .with_template_dir(dir.path())
            .unwrap();

        let item = RenderItem::new("faq", "canned-food");
        let ctx = RenderContext::default();
        let faq = renderer.render(&item, ItemKind::Faq, &ctx).unwrap();
        assert_eq!(faq, "# Canned Food (house style)\n");

        let guide = renderer.render(&RenderItem::new("guide", "g"), ItemKind::Guide, &ctx).unwrap();
        assert!(guide.contains("## Step by step"));
    }

    #[test]
    fn test_markdown_is_not_html_escaped() {
        let renderer = HandlebarsRenderer::new().unwrap();
        let mut item = RenderItem::new("guide", "bleach");
        item.title = Some("Bleach & Water <Ratios>".into());
        let ctx = RenderContext::default();
        let md = renderer.render(&item, ItemKind::Guide, &ctx).unwrap();
        assert!(md.starts_with("# Bleach & Water <Ratios>"));
    }
}
