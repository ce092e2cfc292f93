//! End-to-end pipeline tests
//!
//! Render, repair, QA and audit flows driven through files on disk.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use praeparium::commands::{
    execute_generate, execute_post, execute_qa, GenerateOptions, PostOptions, QaOptions,
};
use praeparium::config::{Config, PostConfig, WriterConfig};
use praeparium::data::{load_source_pack, EditorialTargets};
use praeparium::post::{PostContext, PostProcessor};
use praeparium::qa::{DomainPack, Validator};
use praeparium::render::{load_render_bundle, render_bundle, HandlebarsRenderer};
use praeparium::writer::{ChatClient, ChatRequest, Writer};
use praeparium::{audit_bundle, Result};

/// Article that satisfies every standard check
const CLEAN_ARTICLE: &str = "# Water Storage Basics

_By Dana Reyes_

## TL;DR
Keep one gallon per person per day. Build up from 72 hours to 2 weeks [Source: CDC]. Then aim for 30 days [Source: FEMA]. Swap old jugs each year [Source: EPA].

## Comparison table

| name | price |
| --- | --- |
| Jug | 12 |

## Preparedness Notes
Use clean jugs. See the [time ladder](/water-preparedness-time-ladder).

## Sources
- [CDC water](https://www.cdc.gov/water)
- [FEMA water](https://www.ready.gov/water)
";

/// Draft missing byline, table and sources
const DRAFT: &str = "# Water Storage Basics

## TL;DR
Keep one gallon per person per day. Build up from 72 hours to 2 weeks [Source: CDC]. Then aim for 30 days [Source: FEMA]. Swap old jugs each year [Source: EPA].

## Preparedness Notes
Use clean jugs. Keep them in the dark.
";

fn write_pack(dir: &Path) -> PathBuf {
    let pack = serde_json::json!({
        "pack_id": "water-storage",
        "sources": [
            {"id": "cdc", "title": "Water Storage", "url": "https://www.cdc.gov/water", "publisher": "CDC"},
            {"id": "fema", "title": "Get Ready", "url": "https://www.ready.gov/water", "publisher": "FEMA"},
            {"id": "cdc-dup", "title": "Water Storage again", "url": "https://www.cdc.gov/water"}
        ],
        "claims_checklist": ["time ladder", "rotation"],
        "products": [{"name": "Jug", "price_usd": 12.5}],
        "comparison_columns": ["name", "price_usd"]
    });
    let path = dir.join("pack.json");
    std::fs::write(&path, pack.to_string()).unwrap();
    path
}

fn write_article(dir: &Path, name: &str, text: &str) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

// =============================================================================
// Post-processing feeding QA
// =============================================================================

mod repair_then_validate_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clean_article_passes_standard_battery() {
        let violations = Validator::default().validate(CLEAN_ARTICLE);
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn test_repairs_clear_structural_violations() {
        let dir = TempDir::new().unwrap();
        let pack = load_source_pack(&write_pack(dir.path())).unwrap();
        let validator = Validator::default();

        let before = validator.validate(DRAFT);
        assert!(before.contains(&"Missing comparison table".to_string()));
        assert!(before.contains(&"Missing '## Sources' section".to_string()));
        assert!(before.contains(&"Fewer than 2 external links".to_string()));
        assert!(before.contains(&"Fewer than 1 internal link".to_string()));

        let repaired = PostProcessor::new(PostContext::default().with_pack(&pack)).apply(DRAFT);
        let after = validator.validate(&repaired);
        for fixed in [
            "Missing comparison table",
            "Missing '## Sources' section",
            "Fewer than 2 source list entries",
            "Fewer than 2 external links",
            "Fewer than 1 internal link",
        ] {
            assert!(!after.contains(&fixed.to_string()), "{fixed} still reported:\n{repaired}");
        }
    }

    #[test]
    fn test_repaired_sources_are_deduplicated() {
        let dir = TempDir::new().unwrap();
        let pack = load_source_pack(&write_pack(dir.path())).unwrap();
        let repaired = PostProcessor::new(PostContext::default().with_pack(&pack)).apply(DRAFT);

        assert_eq!(repaired.matches("](https://www.cdc.gov/water)").count(), 1);
        assert!(repaired.contains("- [Water Storage (CDC)](https://www.cdc.gov/water)"));
        assert!(repaired.contains("- [Get Ready (FEMA)](https://www.ready.gov/water)"));
        assert!(repaired.contains("| Jug | 12.5 |"));
    }

    #[test]
    fn test_filler_and_missing_h2s_are_both_reported() {
        let text = "# Short\n\n## Only one\n\nIn conclusion, that is all.\n";
        let violations = Validator::default().validate(text);
        assert!(violations.contains(&"Fewer than 3 H2s".to_string()));
        assert!(violations.contains(&"Contains filler phrase: In conclusion".to_string()));
    }

    #[test]
    fn test_postprocess_command_rewrites_file_once() {
        let dir = TempDir::new().unwrap();
        let pack = write_pack(dir.path());
        let file = write_article(dir.path(), "water.md", DRAFT);
        let options = PostOptions {
            file: file.clone(),
            source_pack: Some(pack),
            author: Some("Dana Reyes".into()),
            scaffold: false,
            simplify: false,
            dry_run: false,
        };

        assert!(execute_post(options.clone(), &Config::default()).unwrap());
        let first = std::fs::read_to_string(&file).unwrap();
        assert!(first.contains("_By Dana Reyes_"));

        assert!(execute_post(options, &Config::default()).unwrap());
        assert_eq!(std::fs::read_to_string(&file).unwrap(), first);
    }

    #[test]
    fn test_postprocess_dry_run_leaves_file_alone() {
        let dir = TempDir::new().unwrap();
        let file = write_article(dir.path(), "water.md", DRAFT);
        let options = PostOptions {
            file: file.clone(),
            source_pack: None,
            author: None,
            scaffold: true,
            simplify: false,
            dry_run: true,
        };

        assert!(execute_post(options, &Config::default()).unwrap());
        assert_eq!(std::fs::read_to_string(&file).unwrap(), DRAFT);
    }
}

// =============================================================================
// QA over directories
// =============================================================================

mod qa_report_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_report_lists_only_failing_files() {
        let dir = TempDir::new().unwrap();
        let good = write_article(dir.path(), "good.md", CLEAN_ARTICLE);
        let bad = write_article(dir.path(), "bad.md", "no heading here\n");
        write_article(dir.path(), "notes.txt", "ignored");

        let report = Validator::default().audit_dir(dir.path()).unwrap();
        assert!(!report.contains_key(&good));
        assert_eq!(report.keys().collect::<Vec<_>>(), vec![&bad]);
        assert_eq!(report[&bad][0], "Missing H1 at top");
    }

    #[test]
    fn test_claims_and_domain_pack_extend_the_battery() {
        let text = format!("{CLEAN_ARTICLE}\nThis filter removes PFAS.\n");
        let validator = Validator::standard(&EditorialTargets::default())
            .with_claims()
            .with_pack(DomainPack::WaterStandards);

        let violations = validator.validate(&text);
        assert!(violations.contains(&"Missing required concept: rotation".to_string()));
        assert!(violations.contains(&"Missing required concept: ergonomics".to_string()));
        assert!(!violations.contains(&"Missing required concept: time ladder".to_string()));
        assert!(violations
            .contains(&"PFAS claim present but missing NSF/ANSI 53 or 401 reference.".to_string()));
    }

    #[test]
    fn test_qa_command_exit_status() {
        let dir = TempDir::new().unwrap();
        write_article(dir.path(), "good.md", CLEAN_ARTICLE);
        let options = QaOptions {
            dir: dir.path().to_path_buf(),
            source_pack: None,
            bundle: None,
            packs: vec![],
            json: true,
        };
        assert!(execute_qa(options.clone(), &Config::default()).unwrap());

        write_article(dir.path(), "bad.md", "# Bad\n\nIn summary, nothing.\n");
        assert!(!execute_qa(options, &Config::default()).unwrap());
    }

    #[test]
    fn test_qa_command_picks_up_bundle_packs() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        write_article(&out, "good.md", &format!("{CLEAN_ARTICLE}\nFilters for PFAS.\n"));
        std::fs::write(
            dir.path().join("requirements.yaml"),
            "domain_validation_packs: [water_standards]\n",
        )
        .unwrap();
        let bundle = dir.path().join("bundle.yaml");
        std::fs::write(&bundle, "article_plan: []\n").unwrap();

        let options = QaOptions {
            dir: out,
            source_pack: None,
            bundle: Some(bundle),
            packs: vec![],
            json: false,
        };
        assert!(!execute_qa(options, &Config::default()).unwrap());
    }
}

// =============================================================================
// Rendering bundles from disk
// =============================================================================

mod render_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BUNDLE: &str = r#"
bundle_slug: water-basics
source:
  id: cdc
  title: Water Storage
  url: https://www.cdc.gov/water
items:
  - type: hub
    slug: water
    title: Water Hub
  - type: hub
    slug: food
    title: Food Hub
  - type: guide
    slug: filters
    title: Choosing Filters
    hub_slug: water
  - type: review
    slug: containers
    title: Best Containers
    hub_slug: water
    picks:
      - name: Aquatank 55
        reason: Stackable
  - type: faq
    slug: canned-food
    hub_slug: food
"#;

    fn render(dir: &Path, yaml: &str) -> praeparium::render::RenderSummary {
        let path = dir.join("bundle.yaml");
        std::fs::write(&path, yaml).unwrap();
        let bundle = load_render_bundle(&path).unwrap();
        let renderer = HandlebarsRenderer::new().unwrap();
        render_bundle(&bundle, &dir.join("out"), &renderer).unwrap()
    }

    #[test]
    fn test_every_item_is_written() {
        let dir = TempDir::new().unwrap();
        let summary = render(dir.path(), BUNDLE);

        assert!(summary.success(), "{:?}", summary.failures);
        assert_eq!(summary.written.len(), 5);
        for slug in ["water", "food", "filters", "containers", "canned-food"] {
            assert!(dir.path().join("out").join(format!("{slug}.md")).exists(), "{slug}");
        }
    }

    #[test]
    fn test_hub_and_spoke_links() {
        let dir = TempDir::new().unwrap();
        render(dir.path(), BUNDLE);
        let out = dir.path().join("out");

        let hub = std::fs::read_to_string(out.join("water.md")).unwrap();
        assert!(hub.starts_with("# Water Hub\n"));
        assert!(hub.contains("- [Choosing Filters](/filters)"));
        assert!(hub.contains("- [Best Containers](/containers)"));
        assert!(hub.contains("- [Food Hub](/food)"));
        assert!(!hub.contains("(/canned-food)"));

        let guide = std::fs::read_to_string(out.join("filters.md")).unwrap();
        assert!(guide.contains("- Back to [Water Hub](/water)"));
        assert!(guide.contains("- [Best Containers](/containers)"));
        assert!(guide.contains("[Source: Water Storage](https://www.cdc.gov/water)"));

        let faq = std::fs::read_to_string(out.join("canned-food.md")).unwrap();
        assert!(faq.starts_with("# Canned Food\n"));
        assert!(faq.contains("- Back to [Food Hub](/food)"));
    }

    #[test]
    fn test_unknown_type_is_recorded_and_batch_continues() {
        let dir = TempDir::new().unwrap();
        let yaml = "items:\n  - type: podcast\n    slug: episode-1\n  - type: guide\n    slug: filters\n";
        let summary = render(dir.path(), yaml);

        assert!(!summary.success());
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].slug, "episode-1");
        assert_eq!(summary.written, vec![dir.path().join("out").join("filters.md")]);
    }

    #[test]
    fn test_generate_command_uses_template_dir() {
        let dir = TempDir::new().unwrap();
        let bundle = dir.path().join("bundle.yaml");
        std::fs::write(&bundle, "items:\n  - type: faq\n    slug: canned-food\n").unwrap();
        let templates = dir.path().join("templates");
        std::fs::create_dir_all(&templates).unwrap();
        std::fs::write(
            templates.join("faq.md.hbs"),
            "# {{title}}\n\n## TL;DR\n\n## Questions\n\n## Related\n",
        )
        .unwrap();

        let out = dir.path().join("out");
        let options = GenerateOptions {
            bundle,
            out: out.clone(),
            slug: None,
            registry: dir.path().join("registry"),
            templates: Some(templates),
        };
        assert!(execute_generate(options, &Config::default()).unwrap());
        assert_eq!(
            std::fs::read_to_string(out.join("canned-food.md")).unwrap(),
            "# Canned Food\n\n## TL;DR\n\n## Questions\n\n## Related\n"
        );
    }

    #[test]
    fn test_plan_bundle_converts_to_items() {
        let dir = TempDir::new().unwrap();
        let yaml = r#"
article_plan:
  - slug: water
    title: Water Hub
    template: hub.md.j2
  - slug: filters-for-preppers
    title: Filters for Preppers
    interlink_out: [water]
"#;
        let summary = render(dir.path(), yaml);
        assert!(summary.success(), "{:?}", summary.failures);

        let guide = std::fs::read_to_string(dir.path().join("out").join("filters-for-preppers.md"))
            .unwrap();
        assert_eq!(guide.lines().next(), Some("# Filters for Preppers"));
        assert!(guide.contains("- [Water Hub](/water)"));
    }
}

// =============================================================================
// Writer with a scripted client
// =============================================================================

mod writer_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Scripted(String);

    impl ChatClient for Scripted {
        fn complete(&self, _request: &ChatRequest) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_written_article_is_repaired_before_qa() {
        let dir = TempDir::new().unwrap();
        let pack = write_pack(dir.path());
        let reply = format!("{DRAFT}\n{}", "Rotate the jugs every year. ".repeat(15));
        let writer = Writer::new(
            WriterConfig::default(),
            PostConfig::default(),
            Box::new(Scripted(reply)),
        );

        let out = dir.path().join("out");
        let path = writer.write_from_source_pack(&pack, &out, None).unwrap();
        assert_eq!(path, out.join("water-storage.md"));

        let report = Validator::default().with_claims().audit_dir(&out).unwrap();
        let violations = report.get(&path).cloned().unwrap_or_default();
        assert!(!violations.contains(&"Missing comparison table".to_string()));
        assert!(!violations.contains(&"Missing '## Sources' section".to_string()));
        assert!(!violations.contains(&"Missing required concept: rotation".to_string()));
        assert!(!violations.contains(&"Missing required concept: citations".to_string()));
    }
}

// =============================================================================
// Methodology audit
// =============================================================================

mod audit_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_methodology(dir: &Path, signoff: &str) -> PathBuf {
        std::fs::write(dir.join("objectives.yaml"), "goal: Safe water\npersonas: [renter]\n").unwrap();
        std::fs::write(
            dir.join("requirements.yaml"),
            "editorial_targets:\n  fk_max: 8\ndomain_validation_packs: []\n",
        )
        .unwrap();
        std::fs::write(dir.join("design.md"), "# Design\n").unwrap();
        std::fs::write(
            dir.join("deployment.yaml"),
            format!(
                "review:\n  required_roles: [editor]\n  reviewer_signoff:\n{signoff}\nchecklist: [interlinks_validated, style_passed, fk_within_target, narrative_flow_present, reviewer_signoff_recorded]\ntargets:\n  markdown_out_dir: out\n  preview_dir: preview\n"
            ),
        )
        .unwrap();
        let bundle = dir.join("bundle.yaml");
        std::fs::write(&bundle, "article_plan: []\n").unwrap();
        bundle
    }

    #[test]
    fn test_signed_bundle_passes() {
        let dir = TempDir::new().unwrap();
        let bundle = write_methodology(
            dir.path(),
            "    name: Sam Ortiz\n    date: 2026-03-01\n    role: editor",
        );
        let report = audit_bundle(&bundle);
        assert!(report.pass, "{report:?}");
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_missing_signoff_date_fails() {
        let dir = TempDir::new().unwrap();
        let bundle = write_methodology(dir.path(), "    name: Sam Ortiz");
        let report = audit_bundle(&bundle);
        assert!(!report.pass);
        assert_eq!(report.errors, vec!["deployment.yaml: reviewer_signoff missing name/date"]);
    }

    #[test]
    fn test_missing_signoff_name_fails() {
        let dir = TempDir::new().unwrap();
        let bundle = write_methodology(dir.path(), "    date: 2026-03-01");
        assert!(!audit_bundle(&bundle).pass);
    }
}
