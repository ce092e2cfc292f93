//! @acp:module "Planner"
//! @acp:summary "Outline construction for plan-based articles"
//! @acp:domain content
//! @acp:layer service

use serde::{Deserialize, Serialize};

use super::renderer::personas_line;
use crate::data::ArticlePlan;

/// Narrative hints fed into `HandlebarsRenderer::render_plan`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    #[serde(default)]
    pub why: Option<String>,
    /// Comma-joined persona list, "readers" when the plan names none
    #[serde(default)]
    pub personas: String,
}

pub fn build_outline(plan: &ArticlePlan) -> Outline {
    let why = plan
        .primary_keyword
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .map(|k| format!("Getting {} right keeps a short outage from becoming a crisis.", k));

    Outline {
        why,
        personas: personas_line(&plan.personas),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_outline_defaults_to_readers() {
        let plan = ArticlePlan {
            slug: "s".into(),
            title: "S".into(),
            template: None,
            primary_keyword: Some("water storage".into()),
            personas: vec![],
            interlink_out: vec![],
            author_id: None,
            reviewer_id: None,
        };
        let outline = build_outline(&plan);
        assert_eq!(outline.personas, "readers");
        assert!(outline.why.unwrap().contains("water storage"));
    }
}
