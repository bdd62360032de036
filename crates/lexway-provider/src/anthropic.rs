//! Anthropic provider implementation.
//!
//! Completions go through the Messages API with a single forced tool whose
//! `input_schema` is the declared [`ShapeSpec`], so the reply is machine-
//! checked against the shape on the provider side; the raw text returned to
//! callers is the serialized tool input. Files are stored via the Files API
//! (beta). One bounded timeout per call, no retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::ProviderError;
use crate::{CompletionRequest, ProviderAdapter, UploadedFile};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";
const FILES_BETA: &str = "files-api-2025-04-14";

/// [`ProviderAdapter`] backed by the Anthropic API.
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    max_output_tokens: u32,
}

impl AnthropicProvider {
    /// Create a new provider with the given credentials and call timeout.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_output_tokens: 4096,
        })
    }

    /// Override the API base URL (testing, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the max output token limit (default 4096).
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Build the user message content blocks.
    fn build_content(request: &CompletionRequest) -> Value {
        match &request.attachment {
            Some(attachment) => {
                let block_type = if attachment.is_image() { "image" } else { "document" };
                json!([
                    {
                        "type": block_type,
                        "source": { "type": "file", "file_id": attachment.file_id }
                    },
                    { "type": "text", "text": request.user_text },
                ])
            }
            None => json!(request.user_text),
        }
    }

    /// Pull the forced tool's input (or a plain text fallback) out of a
    /// Messages API reply.
    fn extract_reply(body: &Value) -> Result<String, ProviderError> {
        let blocks = body["content"].as_array().ok_or(ProviderError::EmptyResponse)?;

        for block in blocks {
            if block["type"] == "tool_use" {
                return serde_json::to_string(&block["input"])
                    .map_err(|e| ProviderError::Transport(e.to_string()));
            }
        }
        // The model occasionally answers in text despite the forced tool.
        for block in blocks {
            if block["type"] == "text" {
                if let Some(t) = block["text"].as_str() {
                    if !t.is_empty() {
                        return Ok(t.to_string());
                    }
                }
            }
        }
        Err(ProviderError::EmptyResponse)
    }

    /// Check the HTTP status and read the body, mapping failures.
    async fn read_body(response: reqwest::Response) -> Result<Value, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(ProviderError::from_status(status.as_u16(), message));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let mut body = json!({
            "model": self.model,
            "max_tokens": self.max_output_tokens,
            "messages": [
                { "role": "user", "content": Self::build_content(&request) }
            ],
            "tools": [{
                "name": request.shape.name,
                "description": "Deliver the structured response.",
                "input_schema": request.shape.schema,
            }],
            "tool_choice": { "type": "tool", "name": request.shape.name },
        });
        if let Some(system) = &request.system {
            body["system"] = json!(system);
        }

        debug!(model = %self.model, shape = %request.shape.name, "Anthropic completion");

        let mut call = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION);
        if request.attachment.is_some() {
            call = call.header("anthropic-beta", FILES_BETA);
        }

        let response = call.json(&body).send().await?;
        let body = Self::read_body(response).await?;
        Self::extract_reply(&body)
    }

    async fn upload(
        &self,
        filename: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedFile, ProviderError> {
        let part = multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime_type)
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        debug!(filename, mime_type, "Anthropic file upload");

        let response = self
            .client
            .post(format!("{}/files", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("anthropic-beta", FILES_BETA)
            .multipart(form)
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        let file_id = body["id"]
            .as_str()
            .ok_or(ProviderError::EmptyResponse)?
            .to_string();
        Ok(UploadedFile { file_id })
    }
}
