//! @acp:module "Bundle Loader"
//! @acp:summary "Parse bundles, source packs and the author registry from disk"
//! @acp:domain content
//! @acp:layer io

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::models::{Author, Bundle};
use super::sourcepack::{SourcePack, MANDATORY_KEYS};
use crate::error::{PraepError, Result};

/// Input encoding, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Yaml,
    Json,
}

impl InputFormat {
    /// `.yaml`/`.yml` are YAML, everything else is treated as JSON
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => InputFormat::Yaml,
            _ => InputFormat::Json,
        }
    }
}

/// Read and decode a YAML/JSON file into `T`; decode failures become `Parse`
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)?;
    let text = text.trim_start_matches('\u{feff}');
    match InputFormat::from_path(path) {
        InputFormat::Yaml => serde_yaml::from_str(text).map_err(|e| PraepError::parse(path, e)),
        InputFormat::Json => serde_json::from_str(text).map_err(|e| PraepError::parse(path, e)),
    }
}

/// Load a bundle, injecting authors from `<registry>/authors/` when given
pub fn load_bundle(path: &Path, registry_dir: Option<&Path>) -> Result<Bundle> {
    let mut bundle: Bundle = read_document(path)?;

    if let Some(registry) = registry_dir {
        let authors = load_authors(&registry.join("authors"))?;
        tracing::debug!("Injected {} authors from {}", authors.len(), registry.display());
        bundle.authors = authors;
    }

    for link in bundle.dangling_interlinks() {
        tracing::warn!("Interlink {} -> {} does not resolve inside the bundle", link.from, link.to);
    }

    Ok(bundle)
}

/// Raw author file; every field optional so the stem can fill the gaps
#[derive(Debug, Default, Deserialize)]
struct AuthorFile {
    author_id: Option<String>,
    display_name: Option<String>,
    name: Option<String>,
    bio: Option<String>,
    #[serde(default)]
    credentials: Vec<String>,
    #[serde(default)]
    expertise_domains: Vec<String>,
}

/// Load every `*.yaml`/`*.yml` author file in `dir`, sorted by path.
///
/// A missing directory yields an empty registry.
pub fn load_authors(dir: &Path) -> Result<Vec<Author>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let pattern = dir.join("*.y*ml");
    let pattern = pattern.to_string_lossy();
    let mut paths: Vec<_> = glob::glob(&pattern)
        .map_err(|e| PraepError::Other(format!("invalid author glob: {}", e)))?
        .filter_map(|entry| entry.ok())
        .filter(|p| {
            matches!(
                p.extension().and_then(|e| e.to_str()),
                Some("yaml") | Some("yml")
            )
        })
        .collect();
    paths.sort();

    let mut authors = Vec::with_capacity(paths.len());
    for path in paths {
        let text = std::fs::read_to_string(&path)?;
        let raw: Option<AuthorFile> =
            serde_yaml::from_str(text.trim_start_matches('\u{feff}'))
                .map_err(|e| PraepError::parse(&path, e))?;
        let raw = raw.unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let display_name = raw
            .display_name
            .or(raw.name)
            .unwrap_or_else(|| stem.clone());
        authors.push(Author {
            author_id: raw.author_id.unwrap_or(stem),
            display_name,
            bio: raw.bio,
            credentials: raw.credentials,
            expertise_domains: raw.expertise_domains,
        });
    }

    Ok(authors)
}

/// Load a source pack, rejecting packs without `sources` or `claims_checklist`
pub fn load_source_pack(path: &Path) -> Result<SourcePack> {
    let raw: Value = read_document(path)?;

    let missing: Vec<String> = MANDATORY_KEYS
        .iter()
        .filter(|key| raw.get(**key).map(|v| v.is_null()).unwrap_or(true))
        .map(|key| key.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PraepError::MissingKeys {
            path: path.to_path_buf(),
            keys: missing,
        });
    }

    let mut pack: SourcePack =
        serde_json::from_value(raw.clone()).map_err(|e| PraepError::parse(path, e))?;
    pack.raw = raw;
    Ok(pack)
}
