//! Chat completion client for local (Ollama) and hosted (OpenAI) backends

use crate::config::{BackendConfig, BackendKind};
use crate::error::{CvMatchError, Result};
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const OLLAMA_CHAT_PATH: &str = "/api/chat";
const OPENAI_CHAT_PATH: &str = "/v1/chat/completions";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Request body shared by both backends
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    /// Always false: the reply must arrive as a single JSON document.
    pub stream: bool,
    pub temperature: f64,
}

impl ChatRequest {
    pub fn user(model: &str, prompt: &str, temperature: f64) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
            temperature,
        }
    }
}

/// What the backend sent back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum ChatReply {
    /// The assistant message content.
    Message(String),
    /// Valid JSON with an unexpected shape; the body verbatim.
    Raw(String),
}

impl ChatReply {
    pub fn text(&self) -> &str {
        match self {
            ChatReply::Message(text) | ChatReply::Raw(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            ChatReply::Message(text) | ChatReply::Raw(text) => text,
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, ChatReply::Message(_))
    }
}

pub struct ChatClient {
    http: Client,
    kind: BackendKind,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

impl ChatClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let api_key = match config.kind {
            BackendKind::Ollama => None,
            BackendKind::OpenAi => Some(config.resolve_api_key().ok_or_else(|| {
                CvMatchError::Configuration(format!(
                    "No API key for the OpenAI backend. Set backend.api_key or the {} environment variable",
                    config.api_key_env
                ))
            })?),
        };

        let mut builder = Client::builder().user_agent(concat!("cv-match/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| CvMatchError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            kind: config.kind,
            endpoint: Self::endpoint_for(config.kind, config.host()),
            model: config.model().to_string(),
            api_key,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn kind(&self) -> BackendKind {
        self.kind
    }

    fn endpoint_for(kind: BackendKind, host: &str) -> String {
        let base = if host.contains("://") {
            host.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", host.trim_end_matches('/'))
        };
        let path = match kind {
            BackendKind::Ollama => OLLAMA_CHAT_PATH,
            BackendKind::OpenAi => OPENAI_CHAT_PATH,
        };
        format!("{}{}", base, path)
    }

    /// Send one prompt as a user message and return the reply.
    pub async fn complete(&self, prompt: &str, temperature: f64) -> Result<ChatReply> {
        let request = ChatRequest::user(&self.model, prompt, temperature);
        debug!(
            "POST {} (model {}, temperature {}, {} prompt chars)",
            self.endpoint,
            self.model,
            temperature,
            prompt.chars().count()
        );

        let mut builder = self.http.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Chat endpoint returned HTTP {}", status);
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        parse_reply(self.kind, &body)
    }

    fn transport_error(&self, err: reqwest::Error) -> CvMatchError {
        match (err.is_timeout(), self.timeout_secs) {
            (true, Some(secs)) => CvMatchError::Timeout(secs),
            _ => CvMatchError::Network(format!("Request to {} failed: {}", self.endpoint, err)),
        }
    }
}

/// Pull the assistant text out of a response body.
///
/// A body that is not JSON is an error; JSON without the expected fields
/// comes back as `ChatReply::Raw`.
pub fn parse_reply(kind: BackendKind, body: &str) -> Result<ChatReply> {
    let json: Value = serde_json::from_str(body)?;

    let content = match kind {
        BackendKind::Ollama => json.get("message").and_then(|m| m.get("content")),
        BackendKind::OpenAi => json
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content")),
    };

    match content {
        Some(Value::String(text)) => Ok(ChatReply::Message(text.clone())),
        // A present but null content field is an empty assistant turn.
        Some(Value::Null) => Ok(ChatReply::Message(String::new())),
        _ => {
            warn!("Chat response did not contain message content, using the raw body");
            Ok(ChatReply::Raw(body.to_string()))
        }
    }
}
