//! @acp:module "Methodology Audit"
//! @acp:summary "Checks the process files that sit next to a bundle"
//! @acp:domain audit
//! @acp:layer feature
//!
//! The audit never fails as an operation. Problems become errors (which fail
//! the audit) or warnings (which do not), and every file is inspected even
//! after an earlier one is found broken.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_yaml::{Mapping, Value};

/// Checklist flags a deployment file is expected to carry
pub const CHECKLIST_FLAGS: [&str; 5] = [
    "interlinks_validated",
    "style_passed",
    "fk_within_target",
    "narrative_flow_present",
    "reviewer_signoff_recorded",
];

/// @acp:summary "Kinds of methodology file"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MethodFile {
    Objectives,
    Requirements,
    Design,
    Deployment,
}

impl MethodFile {
    pub fn all() -> [MethodFile; 4] {
        [
            MethodFile::Objectives,
            MethodFile::Requirements,
            MethodFile::Design,
            MethodFile::Deployment,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MethodFile::Objectives => "objectives",
            MethodFile::Requirements => "requirements",
            MethodFile::Design => "design",
            MethodFile::Deployment => "deployment",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            MethodFile::Objectives => "objectives.yaml",
            MethodFile::Requirements => "requirements.yaml",
            MethodFile::Design => "design.md",
            MethodFile::Deployment => "deployment.yaml",
        }
    }
}

impl fmt::Display for MethodFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @acp:summary "Result of auditing one bundle folder"
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub bundle: PathBuf,
    /// Kind name to path, for the files that exist
    pub files: BTreeMap<String, PathBuf>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub pass: bool,
}

impl AuditReport {
    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Read a YAML file, tolerating a BOM and treating an empty document as `{}`
fn read_yaml(path: &Path) -> Result<Value, String> {
    let raw = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let text = raw.strip_prefix('\u{feff}').unwrap_or(&raw);
    if text.trim().is_empty() {
        return Ok(Value::Mapping(Mapping::new()));
    }
    match serde_yaml::from_str::<Value>(text).map_err(|e| e.to_string())? {
        Value::Null => Ok(Value::Mapping(Mapping::new())),
        value => Ok(value),
    }
}

/// Present and not null, false, zero or empty
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Sequence(seq)) => !seq.is_empty(),
        Some(Value::Mapping(map)) => !map.is_empty(),
        Some(Value::Tagged(tagged)) => truthy(Some(&tagged.value)),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Membership test for a list, a mapping's keys, or a string
fn contains(haystack: &Value, needle: &str) -> bool {
    match haystack {
        Value::Sequence(seq) => seq.iter().any(|v| v.as_str() == Some(needle)),
        Value::Mapping(map) => map.contains_key(needle),
        Value::String(s) => s.contains(needle),
        _ => false,
    }
}

/// Locate the methodology files in the bundle's folder
pub fn find_methodology_files(bundle_path: &Path) -> BTreeMap<MethodFile, PathBuf> {
    let root = bundle_root(bundle_path);
    MethodFile::all()
        .into_iter()
        .map(|kind| (kind, root.join(kind.file_name())))
        .filter(|(_, path)| path.exists())
        .collect()
}

fn bundle_root(bundle_path: &Path) -> PathBuf {
    let resolved = std::fs::canonicalize(bundle_path).unwrap_or_else(|_| bundle_path.to_path_buf());
    match resolved.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Validation pack names declared in the bundle's `requirements.yaml`
pub fn declared_packs(bundle_path: &Path) -> Vec<String> {
    let path = bundle_root(bundle_path).join(MethodFile::Requirements.file_name());
    let Ok(req) = read_yaml(&path) else {
        return Vec::new();
    };
    match req.get("domain_validation_packs") {
        Some(Value::Sequence(seq)) => seq.iter().filter_map(|v| v.as_str().map(String::from)).collect(),
        _ => Vec::new(),
    }
}

/// Audit the methodology files next to `bundle_path`
pub fn audit_bundle(bundle_path: &Path) -> AuditReport {
    let files = find_methodology_files(bundle_path);
    let mut report = AuditReport {
        bundle: std::fs::canonicalize(bundle_path).unwrap_or_else(|_| bundle_path.to_path_buf()),
        files: files
            .iter()
            .map(|(kind, path)| (kind.as_str().to_string(), path.clone()))
            .collect(),
        errors: Vec::new(),
        warnings: Vec::new(),
        pass: true,
    };

    for kind in MethodFile::all() {
        if !files.contains_key(&kind) {
            report.error(format!("Missing {} file: {}", kind, kind.file_name()));
        }
    }

    for (kind, path) in &files {
        if *kind == MethodFile::Design {
            continue;
        }
        let doc = match read_yaml(path) {
            Ok(doc) => doc,
            Err(e) => {
                report.error(format!("{} unreadable: {}", kind.file_name(), e));
                continue;
            }
        };
        match kind {
            MethodFile::Objectives => audit_objectives(&doc, &mut report),
            MethodFile::Requirements => audit_requirements(&doc, &mut report),
            MethodFile::Deployment => audit_deployment(&doc, &mut report),
            MethodFile::Design => {}
        }
    }

    report.pass = report.errors.is_empty();
    tracing::debug!(
        "Audit {}: {} error(s), {} warning(s)",
        report.bundle.display(),
        report.errors.len(),
        report.warnings.len()
    );
    report
}

fn audit_objectives(obj: &Value, report: &mut AuditReport) {
    if !truthy(obj.get("goal")) {
        report.warn("objectives.yaml: missing 'goal'");
    }
    if !truthy(obj.get("personas")) {
        report.warn("objectives.yaml: missing 'personas'");
    }
}

fn audit_requirements(req: &Value, report: &mut AuditReport) {
    let targets = req.get("editorial_targets");
    if !truthy(targets) {
        report.warn("requirements.yaml: editorial_targets missing");
    } else {
        let fk_max = match targets.and_then(|t| t.get("fk_max")) {
            None => Some(8.0),
            Some(value) => as_number(value),
        };
        match fk_max {
            Some(fk) if fk > 10.0 => report.warn("requirements.yaml: fk_max unusually high (>10)"),
            Some(_) => {}
            None => report.warn("requirements.yaml: fk_max not a number"),
        }
    }

    if req.get("domain_validation_packs").is_none() {
        report.warn("requirements.yaml: domain_validation_packs missing");
    }
}

fn audit_deployment(dep: &Value, report: &mut AuditReport) {
    let empty = Value::Mapping(Mapping::new());
    let review = dep.get("review").filter(|r| r.is_mapping()).unwrap_or(&empty);
    let signoff = review
        .get("reviewer_signoff")
        .filter(|s| truthy(Some(s)))
        .or_else(|| dep.get("reviewer_signoff"));

    let signed = signoff
        .filter(|s| s.is_mapping())
        .is_some_and(|s| truthy(s.get("name")) && truthy(s.get("date")));

    if !signed {
        report.error("deployment.yaml: reviewer_signoff missing name/date");
    } else {
        let roles = review.get("required_roles");
        match roles {
            Some(roles) if truthy(Some(roles)) => {
                let role = signoff.and_then(|s| s.get("role")).filter(|r| truthy(Some(r)));
                if let Some(role) = role {
                    let role = role.as_str().map(String::from).unwrap_or_else(|| {
                        serde_yaml::to_string(role).unwrap_or_default().trim().to_string()
                    });
                    if !contains(roles, &role) {
                        report.warn("deployment.yaml: signoff role not in review.required_roles");
                    }
                }
            }
            _ => report.warn("deployment.yaml: review.required_roles missing"),
        }
    }

    let checklist = dep.get("checklist").unwrap_or(&empty);
    for flag in CHECKLIST_FLAGS {
        if !contains(checklist, flag) {
            report.warn(format!("deployment.yaml: checklist missing '{}'", flag));
        }
    }

    let targets = dep.get("targets");
    if !truthy(targets) {
        report.warn("deployment.yaml: targets missing (preview/out dirs)");
    } else if let Some(targets) = targets {
        if !truthy(targets.get("markdown_out_dir")) {
            report.warn("deployment.yaml: targets.markdown_out_dir missing");
        }
        if !truthy(targets.get("preview_dir")) {
            report.warn("deployment.yaml: targets.preview_dir missing");
        }
    }
}
