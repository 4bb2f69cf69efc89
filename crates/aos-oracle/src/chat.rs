//! OpenAI-compatible chat-completions client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use aos_core::entities::AnalysisResult;
use aos_schema::SchemaRegistry;

use crate::error::OracleError;
use crate::gateway::{AnalysisContext, AnalysisGateway};
use crate::http::check_response;
use crate::parse::parse_analysis;
use crate::prompt::{SYSTEM_PROMPT, build_prompt};

/// Connection settings for [`ChatOracle`].
#[derive(Debug, Clone)]
pub struct ChatOracleConfig {
    /// Endpoint root; `/chat/completions` is appended.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
}

/// [`AnalysisGateway`] backed by a chat-completions endpoint.
pub struct ChatOracle {
    http: reqwest::Client,
    config: ChatOracleConfig,
    schema: SchemaRegistry,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatOracle {
    /// # Errors
    ///
    /// Returns `OracleError::NotConfigured` if the base URL or API key is
    /// empty, or `OracleError::Unavailable` if the HTTP client cannot be built.
    pub fn new(config: ChatOracleConfig) -> Result<Self, OracleError> {
        if config.base_url.trim().is_empty() || config.api_key.trim().is_empty() {
            return Err(OracleError::NotConfigured);
        }
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| OracleError::Unavailable(e.to_string()))?;
        Ok(Self {
            http,
            config,
            schema: SchemaRegistry::new(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    async fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        let body = ChatRequest {
            model: &self.config.model,
            temperature: self.config.temperature,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let resp = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;
        let resp = check_response(resp).await?;

        let data: ChatResponse = resp
            .json()
            .await
            .map_err(|e| OracleError::Malformed(format!("unexpected completion shape: {e}")))?;
        data.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| OracleError::Malformed("completion has no content".into()))
    }
}

#[async_trait]
impl AnalysisGateway for ChatOracle {
    async fn analyze(&self, ctx: &AnalysisContext) -> Result<AnalysisResult, OracleError> {
        let prompt = build_prompt(ctx);
        tracing::debug!(session_id = %ctx.session_id, model = %self.config.model, "requesting analysis");
        let reply = self.complete(&prompt).await?;
        parse_analysis(&reply, &self.schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str, api_key: &str) -> ChatOracleConfig {
        ChatOracleConfig {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: "gemini-2.5-flash".into(),
            temperature: 0.2,
        }
    }

    #[test]
    fn requires_url_and_key() {
        assert!(matches!(
            ChatOracle::new(config("", "sk")),
            Err(OracleError::NotConfigured)
        ));
        assert!(matches!(
            ChatOracle::new(config("http://localhost", " ")),
            Err(OracleError::NotConfigured)
        ));
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let oracle = ChatOracle::new(config("http://localhost:9000/v1/", "sk")).unwrap();
        assert_eq!(oracle.endpoint(), "http://localhost:9000/v1/chat/completions");
    }

    #[test]
    fn request_body_shape() {
        let body = ChatRequest {
            model: "m",
            temperature: 0.5,
            messages: [
                ChatMessage { role: "system", content: "s" },
                ChatMessage { role: "user", content: "u" },
            ],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "u");
    }
}
