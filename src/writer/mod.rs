//! @acp:module "Writer"
//! @acp:summary "Source-pack article generation through a chat-completion API"
//! @acp:domain writer
//! @acp:layer feature
//!
//! Generation is fail-fast: a transport error, an API error or a short reply
//! stops the write before anything lands on disk.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{PostConfig, WriterConfig};
use crate::data::{load_source_pack, SourcePack};
use crate::error::{PraepError, Result};
use crate::post::{PostContext, PostProcessor};

/// User prompt; `{source_pack_json}` is replaced with the pack
pub const WRITER_PROMPT: &str = include_str!("../../prompts/writer.txt");

pub const SYSTEM_PROMPT: &str = "You are Praeparium\u{2019}s senior preparedness writer. \
Follow the STRUCTURE exactly; cite quantitative claims inline. \
Return only final Markdown, no commentary.";

const FALLBACK_SLUG: &str = "article";

/// @acp:summary "One chat message"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// @acp:summary "Chat-completion request body"
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub temperature: f64,
    pub top_p: f64,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    pub fn new(config: &WriterConfig, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
            frequency_penalty: config.frequency_penalty,
            presence_penalty: config.presence_penalty,
            messages,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completion provider
pub trait ChatClient: Send + Sync {
    /// Text of the first choice; empty when the provider returned none
    fn complete(&self, request: &ChatRequest) -> Result<String>;
}

/// @acp:summary "OpenAI-compatible chat-completion client"
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    api_base: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            api_key: api_key.into(),
        }
    }

    /// Client from config; the API key must be set
    pub fn from_config(config: &WriterConfig) -> Result<Self> {
        let key = config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| PraepError::external("openai", "OPENAI_API_KEY not set"))?;
        Ok(Self::new(config.api_base.clone(), key))
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

impl ChatClient for OpenAiClient {
    fn complete(&self, request: &ChatRequest) -> Result<String> {
        let response = ureq::post(&self.endpoint())
            .set("User-Agent", concat!("praeparium/", env!("CARGO_PKG_VERSION")))
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(request)
            .map_err(|e| match e {
                ureq::Error::Status(code, resp) => {
                    let body = resp.into_string().unwrap_or_default();
                    PraepError::external("openai", format!("HTTP {}: {}", code, body.trim()))
                }
                ureq::Error::Transport(t) => PraepError::external("openai", t),
            })?;

        let parsed: ChatResponse = response
            .into_json()
            .map_err(|e| PraepError::external("openai", format!("invalid response: {}", e)))?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}

/// Build the user message for `pack`
pub fn build_user_prompt(pack: &SourcePack) -> Result<String> {
    let json = pack.to_prompt_json()?;
    Ok(WRITER_PROMPT.replace("{source_pack_json}", &json))
}

/// @acp:summary "Writes articles from source packs"
pub struct Writer {
    config: WriterConfig,
    post: PostConfig,
    client: Box<dyn ChatClient>,
}

impl Writer {
    pub fn new(config: WriterConfig, post: PostConfig, client: Box<dyn ChatClient>) -> Self {
        Self { config, post, client }
    }

    /// Generate, repair and write `<slug>.md` into `out_dir`
    pub fn write_from_source_pack(
        &self,
        pack_path: &Path,
        out_dir: &Path,
        slug: Option<&str>,
    ) -> Result<PathBuf> {
        let pack = load_source_pack(pack_path)?;
        let request = ChatRequest::new(
            &self.config,
            vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(build_user_prompt(&pack)?),
            ],
        );

        tracing::debug!("Requesting article for {} from {}", pack_path.display(), self.config.model);
        let text = self.client.complete(&request)?;
        let chars = text.trim().chars().count();
        if chars < self.config.min_chars {
            return Err(PraepError::ContentTooShort {
                chars,
                min: self.config.min_chars,
            });
        }

        let processor = PostProcessor::new(PostContext::from_config(&self.post).with_pack(&pack));
        let markdown = processor.apply(&text);

        let slug = slug
            .filter(|s| !s.trim().is_empty())
            .or_else(|| pack.default_slug())
            .unwrap_or(FALLBACK_SLUG);

        std::fs::create_dir_all(out_dir)?;
        let path = out_dir.join(format!("{}.md", slug));
        std::fs::write(&path, markdown)?;
        tracing::info!("Wrote {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct FakeClient {
        reply: String,
        seen: Mutex<Vec<ChatRequest>>,
    }

    impl FakeClient {
        fn replying(text: &str) -> Self {
            Self {
                reply: text.to_string(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl ChatClient for FakeClient {
        fn complete(&self, request: &ChatRequest) -> Result<String> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.reply.clone())
        }
    }

    fn write_pack(dir: &Path, slug: Option<&str>) -> PathBuf {
        let mut pack = serde_json::json!({
            "pack_id": "water-storage",
            "sources": [{"id": "cdc", "title": "Water Storage", "url": "https://www.cdc.gov/water", "publisher": "CDC"}],
            "claims_checklist": ["time ladder"],
            "products": [{"name": "Jug", "price_usd": 12.5}],
            "comparison_columns": ["name", "price_usd"]
        });
        if let Some(slug) = slug {
            pack["slug"] = slug.into();
        }
        let path = dir.join("pack.json");
        std::fs::write(&path, pack.to_string()).unwrap();
        path
    }

    fn long_article() -> String {
        format!("# Water Storage\n\n{}", "Store water in a cool dark place. ".repeat(20))
    }

    #[test]
    fn test_writes_post_processed_article() {
        let dir = TempDir::new().unwrap();
        let pack = write_pack(dir.path(), Some("best-jugs"));
        let client = FakeClient::replying(&long_article());
        let writer = Writer::new(WriterConfig::default(), PostConfig::default(), Box::new(client));

        let path = writer
            .write_from_source_pack(&pack, &dir.path().join("out"), None)
            .unwrap();
        assert_eq!(path, dir.path().join("out").join("best-jugs.md"));

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("_By Praeparium Editorial Team_"));
        assert!(text.contains("## Comparison table"));
        assert!(text.contains("## Sources"));
        assert!(text.contains("](/water-preparedness-time-ladder)"));
    }

    #[test]
    fn test_request_carries_pack_and_parameters() {
        let dir = TempDir::new().unwrap();
        let pack = write_pack(dir.path(), None);
        let client = std::sync::Arc::new(FakeClient::replying(&long_article()));

        struct Shared(std::sync::Arc<FakeClient>);
        impl ChatClient for Shared {
            fn complete(&self, request: &ChatRequest) -> Result<String> {
                self.0.complete(request)
            }
        }

        let writer = Writer::new(
            WriterConfig::default(),
            PostConfig::default(),
            Box::new(Shared(client.clone())),
        );
        let path = writer
            .write_from_source_pack(&pack, dir.path(), Some("custom"))
            .unwrap();
        assert!(path.ends_with("custom.md"));

        let seen = client.seen.lock().unwrap();
        let request = &seen[0];
        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.temperature, 0.25);
        assert_eq!(request.messages[0].role, "system");
        assert!(request.messages[1].content.contains("\"pack_id\": \"water-storage\""));
        assert!(!request.messages[1].content.contains("{source_pack_json}"));
    }

    #[test]
    fn test_prompt_keeps_unmodeled_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pack.json");
        let raw = serde_json::json!({
            "pack_id": "water-storage",
            "audience_notes": "renters with no garage",
            "sources": [{"title": "Water Storage", "url": "https://www.cdc.gov/water", "license": "public domain"}],
            "claims_checklist": [],
            "articles": [{"slug": "water-storage", "outline_hints": ["start with 72 hours"]}]
        });
        std::fs::write(&path, raw.to_string()).unwrap();

        let prompt = build_user_prompt(&load_source_pack(&path).unwrap()).unwrap();
        assert!(prompt.contains("\"audience_notes\": \"renters with no garage\""));
        assert!(prompt.contains("\"outline_hints\""));
        assert!(prompt.contains("\"license\": \"public domain\""));
    }

    #[test]
    fn test_short_reply_is_rejected() {
        let dir = TempDir::new().unwrap();
        let pack = write_pack(dir.path(), None);
        let writer = Writer::new(
            WriterConfig::default(),
            PostConfig::default(),
            Box::new(FakeClient::replying("   too short   ")),
        );
        let err = writer
            .write_from_source_pack(&pack, &dir.path().join("out"), None)
            .unwrap_err();
        assert!(matches!(err, PraepError::ContentTooShort { chars: 9, min: 400 }));
        assert!(!dir.path().join("out").join("water-storage.md").exists());
    }

    #[test]
    fn test_missing_keys_stop_before_call() {
        let dir = TempDir::new().unwrap();
        let pack = dir.path().join("pack.json");
        std::fs::write(&pack, r#"{"pack_id": "x"}"#).unwrap();
        let writer = Writer::new(
            WriterConfig::default(),
            PostConfig::default(),
            Box::new(FakeClient::replying(&long_article())),
        );
        let err = writer.write_from_source_pack(&pack, dir.path(), None).unwrap_err();
        assert!(matches!(err, PraepError::MissingKeys { .. }));
    }

    #[test]
    fn test_client_requires_key() {
        assert!(OpenAiClient::from_config(&WriterConfig::default()).is_err());
        let config = WriterConfig {
            api_key: Some("sk-test".into()),
            api_base: "http://localhost:9/v1/".into(),
            ..WriterConfig::default()
        };
        let client = OpenAiClient::from_config(&config).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9/v1/chat/completions");
    }
}
