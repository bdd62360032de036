//! OpenAI provider implementation.
//!
//! Completions go through the Responses API with a strict `json_schema`
//! text format built from the declared [`ShapeSpec`]; files are stored via
//! the Files API with `purpose=user_data`. One bounded timeout per call,
//! no retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::ProviderError;
use crate::{CompletionRequest, ProviderAdapter, UploadedFile};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// [`ProviderAdapter`] backed by the OpenAI API.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    max_output_tokens: u32,
}

impl OpenAiProvider {
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

    /// Build the `input` array for a completion.
    fn build_input(request: &CompletionRequest) -> Vec<Value> {
        let mut input = Vec::new();
        if let Some(system) = &request.system {
            input.push(json!({ "role": "system", "content": system }));
        }

        let user_content = match &request.attachment {
            Some(attachment) => {
                let part_type = if attachment.is_image() {
                    "input_image"
                } else {
                    "input_file"
                };
                json!([
                    { "type": part_type, "file_id": attachment.file_id },
                    { "type": "input_text", "text": request.user_text },
                ])
            }
            None => json!(request.user_text),
        };
        input.push(json!({ "role": "user", "content": user_content }));
        input
    }

    /// Pull the assistant text out of a Responses API reply.
    fn extract_output_text(body: &Value) -> Result<String, ProviderError> {
        let mut text = String::new();
        if let Some(items) = body["output"].as_array() {
            for item in items {
                if item["type"] != "message" {
                    continue;
                }
                if let Some(parts) = item["content"].as_array() {
                    for part in parts {
                        if part["type"] == "output_text" {
                            if let Some(t) = part["text"].as_str() {
                                text.push_str(t);
                            }
                        }
                    }
                }
            }
        }
        if text.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(text)
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
impl ProviderAdapter for OpenAiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let body = json!({
            "model": self.model,
            "input": Self::build_input(&request),
            "max_output_tokens": self.max_output_tokens,
            "text": {
                "format": {
                    "type": "json_schema",
                    "name": request.shape.name,
                    "schema": request.shape.schema,
                    "strict": true,
                }
            }
        });

        debug!(model = %self.model, shape = %request.shape.name, "OpenAI completion");

        let response = self
            .client
            .post(format!("{}/responses", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        Self::extract_output_text(&body)
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
        let form = multipart::Form::new()
            .text("purpose", "user_data")
            .part("file", part);

        debug!(filename, mime_type, "OpenAI file upload");

        let response = self
            .client
            .post(format!("{}/files", self.base_url))
            .bearer_auth(&self.api_key)
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
