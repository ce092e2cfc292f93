//! @acp:module "Source Pack Models"
//! @acp:summary "Citation-bearing input unit for the LLM writer"
//! @acp:domain content
//! @acp:layer model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys a source pack must carry before it is worth a model call
pub const MANDATORY_KEYS: [&str; 2] = ["sources", "claims_checklist"];

/// @acp:summary "A cited source"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessed: Option<String>,
}

/// @acp:summary "A product that may appear in a comparison table"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_l: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stackable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_usd: Option<f64>,
    #[serde(default)]
    pub affiliate_urls: Vec<String>,
    /// Any other column a pack wants to compare on
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Render one comparison column for this product.
    ///
    /// Scalars are stringified, lists joined with ", ", missing values are empty.
    pub fn column_value(&self, column: &str) -> String {
        let value = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map.get(column).cloned(),
            _ => None,
        };
        value.map(|v| display_value(&v)).unwrap_or_default()
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// Article entry nested in a pack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackArticle {
    #[serde(default)]
    pub article_id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub slug: String,
    #[serde(default)]
    pub require_comparison_table: bool,
}

/// @acp:summary "LLM-oriented input unit"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcePack {
    #[serde(default)]
    pub pack_id: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub sources: Vec<SourceRef>,
    pub claims_checklist: Vec<String>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub comparison_columns: Vec<String>,
    #[serde(default)]
    pub articles: Vec<PackArticle>,
    /// The document as loaded, unmodeled keys included
    #[serde(skip)]
    pub raw: Value,
}

impl SourcePack {
    /// Output slug: the pack's own slug, else its id
    pub fn default_slug(&self) -> Option<&str> {
        self.slug
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| Some(self.pack_id.as_str()).filter(|s| !s.trim().is_empty()))
    }

    /// JSON handed to the model: the loaded document, else the typed fields
    pub fn to_prompt_json(&self) -> serde_json::Result<String> {
        if self.raw.is_null() {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string_pretty(&self.raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        serde_json::from_value(serde_json::json!({
            "name": "Aquatank 55",
            "certifications": ["NSF/ANSI 61", "BPA-free"],
            "price_usd": 129.5,
            "stackable": true,
            "color": "blue"
        }))
        .unwrap()
    }

    #[test]
    fn test_column_value_scalars_and_lists() {
        let p = product();
        assert_eq!(p.column_value("name"), "Aquatank 55");
        assert_eq!(p.column_value("certifications"), "NSF/ANSI 61, BPA-free");
        assert_eq!(p.column_value("price_usd"), "129.5");
        assert_eq!(p.column_value("stackable"), "true");
        assert_eq!(p.column_value("color"), "blue");
        assert_eq!(p.column_value("capacity_l"), "");
    }

    #[test]
    fn test_default_slug_falls_back_to_pack_id() {
        let pack: SourcePack = serde_json::from_value(serde_json::json!({
            "pack_id": "water-storage-v1",
            "sources": [],
            "claims_checklist": []
        }))
        .unwrap();
        assert_eq!(pack.default_slug(), Some("water-storage-v1"));
    }
}
