//! Lexway provider crate - the external LLM/file service boundary.
//!
//! Provides the [`ProviderAdapter`] trait for structured completions and
//! file uploads, a [`MockProvider`] for testing, and vendor implementations
//! for OpenAI ([`openai::OpenAiProvider`]) and Anthropic
//! ([`anthropic::AnthropicProvider`]) selected by configuration.
//!
//! Every call is awaited under a single bounded timeout; no retries are
//! attempted. The adapter returns raw text that *should* conform to the
//! declared output shape; callers normalize and validate it locally.

pub mod anthropic;
pub mod error;
pub mod openai;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

pub use anthropic::AnthropicProvider;
pub use error::ProviderError;
pub use openai::OpenAiProvider;

/// Declared output shape handed to the provider with every completion.
///
/// The schema is a standard JSON Schema document; `name` labels it for
/// vendors that require a named format.
#[derive(Debug, Clone)]
pub struct ShapeSpec {
    pub name: String,
    pub schema: serde_json::Value,
}

impl ShapeSpec {
    pub fn new(name: impl Into<String>, schema: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

/// Reference to a file previously uploaded to the provider.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_id: String,
    pub mime_type: String,
}

impl Attachment {
    /// Whether the attachment should be presented to the model as an image.
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// One completion request against the provider.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Instructions fixed for the whole exchange.
    pub system: Option<String>,
    /// The user-side text block (rendered transcript or extraction prompt).
    pub user_text: String,
    /// Optional uploaded file to place alongside the text.
    pub attachment: Option<Attachment>,
    /// Output shape the reply must conform to.
    pub shape: ShapeSpec,
}

/// Handle returned by a successful file upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_id: String,
}

/// Boundary to the external LLM/file service.
///
/// Implementations are opaque: given a prompt and a declared output shape
/// they return text that should - but is not guaranteed to - conform.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Run one completion and return the raw reply text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;

    /// Store a file with the provider and return its id.
    async fn upload(
        &self,
        filename: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedFile, ProviderError>;
}

/// Scripted provider for testing.
///
/// Replies are served in FIFO order from a queue; an exhausted queue fails
/// the call. Call counts let tests assert that no provider interaction
/// happened on validation failures.
#[derive(Debug, Default)]
pub struct MockProvider {
    replies: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<CompletionRequest>>,
    completions: AtomicUsize,
    uploads: AtomicUsize,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that serves a single canned reply.
    pub fn with_reply(reply: impl Into<String>) -> Self {
        let mock = Self::new();
        mock.push_reply(reply);
        mock
    }

    /// Queue another canned reply.
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.replies
            .lock()
            .expect("mock replies lock poisoned")
            .push_back(reply.into());
    }

    /// Number of `complete` calls observed.
    pub fn completion_count(&self) -> usize {
        self.completions.load(Ordering::SeqCst)
    }

    /// Number of `upload` calls observed.
    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    /// Completion requests observed so far, in call order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .expect("mock requests lock poisoned")
            .clone()
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        self.completions.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .expect("mock requests lock poisoned")
            .push(request);
        self.replies
            .lock()
            .expect("mock replies lock poisoned")
            .pop_front()
            .ok_or(ProviderError::EmptyResponse)
    }

    async fn upload(
        &self,
        _filename: &str,
        _mime_type: &str,
        _bytes: Vec<u8>,
    ) -> Result<UploadedFile, ProviderError> {
        let n = self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(UploadedFile {
            file_id: format!("file-mock-{}", n + 1),
        })
    }
}
