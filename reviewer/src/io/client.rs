//! Review client abstraction and the chat-completion implementation.
//!
//! The [`ReviewClient`] trait decouples the batch from the model backend.
//! Tests drive the batch with scripted clients that never touch the network.

use std::sync::LazyLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use jsonschema::{Draft, Validator};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::core::questions::review_schema;
use crate::core::types::ReviewContent;
use crate::io::config::ModelConfig;
use crate::io::prompt::render_review_prompt;

/// Error bodies longer than this are cut in error messages.
const ERROR_BODY_LIMIT: usize = 2_000;

/// Abstraction over review backends.
#[async_trait]
pub trait ReviewClient: Send + Sync {
    /// Review one rendered case. Errors are returned as-is, without retry.
    async fn review(&self, case: &str) -> Result<ReviewContent>;
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint with
/// JSON-schema constrained output.
#[derive(Debug, Clone)]
pub struct ChatReviewClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl ChatReviewClient {
    /// Create from config, reading the API key from `cfg.api_key_env`.
    pub fn from_config(cfg: &ModelConfig) -> Result<Self> {
        let api_key = std::env::var(&cfg.api_key_env)
            .with_context(|| format!("{} not set", cfg.api_key_env))?;
        Self::new(
            &api_key,
            &cfg.base_url,
            &cfg.name,
            cfg.request_timeout(),
        )
    }

    pub fn new(api_key: &str, base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let auth_value = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| anyhow!("invalid API key format"))?;
        headers.insert(AUTHORIZATION, auth_value);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .context("build http client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Serialize)]
struct ChatApiRequest<'a> {
    model: &'a str,
    messages: [ApiMessage<'a>; 1],
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Serialize)]
struct JsonSchemaFormat {
    name: &'static str,
    schema: &'static Value,
}

#[derive(Deserialize)]
struct ChatApiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl ReviewClient for ChatReviewClient {
    #[instrument(skip_all, fields(model = %self.model, case_len = case.len()))]
    async fn review(&self, case: &str) -> Result<ReviewContent> {
        let prompt = render_review_prompt(case)?;
        let body = ChatApiRequest {
            model: &self.model,
            messages: [ApiMessage {
                role: "user",
                content: &prompt,
            }],
            response_format: ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: "schema",
                    schema: review_schema(),
                },
            },
        };

        let start = Instant::now();
        let response = self
            .client
            .post(self.chat_url())
            .json(&body)
            .send()
            .await
            .context("send review request")?;
        let status = response.status();
        let text = response.text().await.context("read review response")?;
        debug!(
            status = status.as_u16(),
            latency_ms = start.elapsed().as_millis() as u64,
            "review response received"
        );

        if !status.is_success() {
            warn!(status = status.as_u16(), "review request failed");
            bail!(
                "review request failed with status {}: {}",
                status,
                truncate(&text, ERROR_BODY_LIMIT)
            );
        }

        let content = decode_envelope(&text)?;
        decode_content(&content)
    }
}

/// First decoding stage: the chat-completion envelope, yielding the message
/// content string.
pub fn decode_envelope(body: &str) -> Result<String> {
    let envelope: ChatApiResponse =
        serde_json::from_str(body).context("parse review response envelope")?;
    envelope
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| anyhow!("review response has no message content"))
}

/// Second decoding stage: the message content is itself JSON and must match
/// the review schema.
pub fn decode_content(content: &str) -> Result<ReviewContent> {
    let value: Value = serde_json::from_str(content).context("parse review content json")?;
    validate_schema(&value)?;
    serde_json::from_value(value).context("parse review content")
}

/// Review schema compiled once (Draft 2020-12); a compile failure is kept as text.
static REVIEW_VALIDATOR: LazyLock<Result<Validator, String>> = LazyLock::new(|| {
    jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(review_schema())
        .map_err(|err| err.to_string())
});

fn review_validator() -> Result<&'static Validator> {
    REVIEW_VALIDATOR
        .as_ref()
        .map_err(|err| anyhow!("compile review schema: {err}"))
}

fn validate_schema(instance: &Value) -> Result<()> {
    let messages: Vec<String> = review_validator()?
        .iter_errors(instance)
        .map(|err| err.to_string())
        .collect();
    if !messages.is_empty() {
        bail!("review content violates schema:\n- {}", messages.join("\n- "));
    }
    Ok(())
}

fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
