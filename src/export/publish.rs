//! @acp:module "WordPress Publisher"
//! @acp:summary "Creates posts through the WordPress REST API"
//! @acp:domain export
//! @acp:layer service

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::config::PublishConfig;
use crate::error::{PraepError, Result};

const SERVICE: &str = "wordpress";

/// @acp:summary "Post status on creation"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Publish,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Publish => "publish",
        }
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(PostStatus::Draft),
            "publish" => Ok(PostStatus::Publish),
            _ => Err(format!("Unknown post status: {}", s)),
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Serialize)]
struct NewPost<'a> {
    title: &'a str,
    content: &'a str,
    status: PostStatus,
}

#[derive(Debug, Deserialize)]
struct CreatedPost {
    #[serde(default)]
    link: Option<String>,
}

/// @acp:summary "Basic-auth WordPress REST client"
#[derive(Debug, Clone)]
pub struct WordPressPublisher {
    base_url: String,
    username: String,
    password: String,
}

impl WordPressPublisher {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Publisher from config; base URL, username and password are all required
    pub fn from_config(config: &PublishConfig) -> Result<Self> {
        let require = |value: &Option<String>, name: &str| {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(String::from)
                .ok_or_else(|| PraepError::external(SERVICE, format!("{} not set", name)))
        };
        Ok(Self::new(
            require(&config.base_url, "WP_BASE_URL")?,
            require(&config.username, "WP_USERNAME")?,
            require(&config.password, "WP_APP_PASSWORD")?,
        ))
    }

    fn endpoint(&self) -> String {
        format!("{}/wp-json/wp/v2/posts", self.base_url.trim_end_matches('/'))
    }

    fn authorization(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {}", token)
    }

    /// Create a post and return its public link
    pub fn publish(&self, title: &str, html: &str, status: PostStatus) -> Result<String> {
        let body = NewPost {
            title,
            content: html,
            status,
        };

        let response = ureq::post(&self.endpoint())
            .set("User-Agent", concat!("praeparium/", env!("CARGO_PKG_VERSION")))
            .set("Authorization", &self.authorization())
            .send_json(&body)
            .map_err(|e| match e {
                ureq::Error::Status(code, resp) => {
                    let text = resp.into_string().unwrap_or_default();
                    PraepError::external(SERVICE, format!("HTTP {}: {}", code, text.trim()))
                }
                ureq::Error::Transport(t) => PraepError::external(SERVICE, t),
            })?;

        let created: CreatedPost = response
            .into_json()
            .map_err(|e| PraepError::external(SERVICE, format!("invalid response: {}", e)))?;

        created
            .link
            .filter(|l| !l.is_empty())
            .ok_or_else(|| PraepError::external(SERVICE, "response has no link"))
    }
}
