//! Anthropic engine - ReasoningEngine over the Messages API.
//!
//! Operations and delegation are exposed to the model as tools: each
//! available operation becomes a tool in Anthropic's format, and when
//! delegates are present a synthetic `transfer_to_agent` tool carries the
//! routing decision. The first `tool_use` block in a response becomes the
//! inference outcome; otherwise the concatenated text blocks are the reply.
//!
//! # Configuration
//!
//! ```ignore
//! let config = AnthropicConfig::new(api_key)
//!     .with_model("claude-sonnet-4-20250514");
//! let engine = AnthropicEngine::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::operations::OperationCall;
use crate::domain::session::{TranscriptMessage, TranscriptRole};
use crate::ports::{InferenceOutcome, InferenceRequest, ReasoningEngine, ReasoningError};

/// Anthropic API version header value.
const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// Name of the synthetic routing tool.
const TRANSFER_TOOL: &str = "transfer_to_agent";

/// Configuration for the Anthropic engine.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    api_key: Secret<String>,
    /// Model to use.
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum tokens per reply.
    pub max_tokens: u32,
    /// Retries on transient failures (timeouts, network errors, 5xx).
    pub max_retries: u32,
}

impl AnthropicConfig {
    /// Creates a configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "claude-sonnet-4-20250514".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            timeout: Duration::from_secs(60),
            max_tokens: 1024,
            max_retries: 3,
        }
    }

    /// Sets the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry budget for transient failures.
    pub fn with_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Anthropic Messages API engine.
pub struct AnthropicEngine {
    config: AnthropicConfig,
    client: Client,
}

impl AnthropicEngine {
    /// Creates an engine with the given configuration.
    pub fn new(config: AnthropicConfig) -> Result<Self, ReasoningError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ReasoningError::InvalidRequest(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url)
    }

    fn to_api_request(&self, request: &InferenceRequest) -> ApiRequest {
        let mut messages: Vec<ApiMessage> = request
            .transcript
            .iter()
            .map(ApiMessage::from_transcript)
            .collect();

        // A prior operation outcome is handed back as a user-role message so
        // the model can compose the final reply around it.
        if let Some(outcome) = &request.prior_outcome {
            messages.push(ApiMessage {
                role: "user".to_string(),
                content: outcome.render_for_agent(),
            });
        }

        // The API requires at least one message.
        if messages.is_empty() {
            messages.push(ApiMessage {
                role: "user".to_string(),
                content: "Hello".to_string(),
            });
        }

        let mut tools: Vec<serde_json::Value> = request
            .operations
            .iter()
            .map(|op| op.to_anthropic_format())
            .collect();

        if !request.delegates.is_empty() {
            let names: Vec<&str> = request.delegates.iter().map(|d| d.name.as_str()).collect();
            let descriptions: Vec<String> = request
                .delegates
                .iter()
                .map(|d| format!("{}: {}", d.name, d.description))
                .collect();
            tools.push(serde_json::json!({
                "name": TRANSFER_TOOL,
                "description": format!(
                    "Hand this turn to a specialist agent. Available agents:\n{}",
                    descriptions.join("\n")
                ),
                "input_schema": {
                    "type": "object",
                    "required": ["agent"],
                    "properties": {
                        "agent": { "type": "string", "enum": names }
                    }
                }
            }));
        }

        ApiRequest {
            model: self.config.model.clone(),
            system: request.instructions.clone(),
            messages,
            tools,
            max_tokens: self.config.max_tokens,
        }
    }

    fn map_send_error(&self, err: reqwest::Error) -> ReasoningError {
        if err.is_timeout() {
            ReasoningError::Timeout {
                timeout_secs: self.config.timeout.as_secs() as u32,
            }
        } else if err.is_connect() {
            ReasoningError::network(format!("connection failed: {}", err))
        } else {
            ReasoningError::network(err.to_string())
        }
    }

    fn map_status(status: StatusCode, body: &str) -> ReasoningError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ReasoningError::AuthenticationFailed
            }
            StatusCode::TOO_MANY_REQUESTS => {
                ReasoningError::unavailable("rate limited by provider")
            }
            s if s.is_server_error() => {
                ReasoningError::unavailable(format!("provider error {}: {}", s, body))
            }
            s => ReasoningError::InvalidRequest(format!("provider rejected request {}: {}", s, body)),
        }
    }

    fn parse_response(response: ApiResponse) -> Result<InferenceOutcome, ReasoningError> {
        for block in &response.content {
            if block.kind == "tool_use" {
                let name = block.name.clone().unwrap_or_default();
                let input = block.input.clone().unwrap_or(serde_json::json!({}));

                if name == TRANSFER_TOOL {
                    let agent = input
                        .get("agent")
                        .and_then(|a| a.as_str())
                        .ok_or_else(|| {
                            ReasoningError::parse("transfer_to_agent without an agent name")
                        })?;
                    return Ok(InferenceOutcome::Transfer {
                        agent: agent.to_string(),
                    });
                }
                return Ok(InferenceOutcome::Invoke(OperationCall::new(name, input)));
            }
        }

        let text: String = response
            .content
            .iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(ReasoningError::parse("response contained no text or tool_use"));
        }
        Ok(InferenceOutcome::Reply(text))
    }
}

impl AnthropicEngine {
    async fn send_once(&self, api_request: &ApiRequest) -> Result<InferenceOutcome, ReasoningError> {
        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", self.config.api_key())
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .header("Content-Type", "application/json")
            .json(api_request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::map_status(status, &body));
        }

        let parsed: ApiResponse = response
            .json()
            .await
            .map_err(|e| ReasoningError::parse(e.to_string()))?;
        Self::parse_response(parsed)
    }

    fn is_retryable(error: &ReasoningError) -> bool {
        matches!(
            error,
            ReasoningError::Unavailable { .. }
                | ReasoningError::Timeout { .. }
                | ReasoningError::Network(_)
        )
    }
}

#[async_trait]
impl ReasoningEngine for AnthropicEngine {
    async fn infer(&self, request: InferenceRequest) -> Result<InferenceOutcome, ReasoningError> {
        let api_request = self.to_api_request(&request);

        let mut attempt = 0u32;
        loop {
            match self.send_once(&api_request).await {
                Ok(outcome) => return Ok(outcome),
                Err(error) if Self::is_retryable(&error) && attempt < self.config.max_retries => {
                    attempt += 1;
                    tracing::debug!(%error, attempt, "retrying inference request");
                    tokio::time::sleep(Duration::from_millis(200 * attempt as u64)).await;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiRequest {
    model: String,
    system: String,
    messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<serde_json::Value>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: String,
    content: String,
}

impl ApiMessage {
    fn from_transcript(message: &TranscriptMessage) -> Self {
        let role = match message.role {
            TranscriptRole::User => "user",
            TranscriptRole::Assistant => "assistant",
        };
        Self {
            role: role.to_string(),
            content: message.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    input: Option<serde_json::Value>,
}
