//! Route handler functions for all API endpoints.
//!
//! Each handler extracts its request body via axum extractors, calls the
//! matching service on AppState, and returns a JSON response. Provider
//! and parse failures propagate as server errors; nothing is persisted
//! when an exchange fails.

use std::time::Instant;

use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use lexway_chat::ChatReply;
use lexway_docs::DocAnalysis;
use lexway_provider::ProviderAdapter;

use crate::error::ApiError;
use crate::state::AppState;

/// MIME types accepted by the upload endpoint.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "text/plain",
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/webp",
];

// =============================================================================
// Request / response types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: Option<String>,
    pub user_input: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub response: ChatReply,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub filename: String,
    pub content_type: String,
    pub file_id: String,
    pub mime_type: String,
}

#[derive(Debug, Deserialize)]
pub struct DocAnalysisRequest {
    pub file_id: String,
    pub mime_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocAnalysisResponse {
    pub response: DocAnalysis,
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub file_id: String,
    pub mime_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub response: ExtractResponseBody,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractResponseBody {
    pub success: bool,
    pub data: String,
    pub mime_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

// =============================================================================
// Handler functions
// =============================================================================

/// POST /chat - run one guidance conversation turn.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let started = Instant::now();
    let outcome = state
        .engine
        .chat(body.session_id.as_deref(), &body.user_input)
        .await?;

    info!(
        session = %outcome.session_id,
        guidance = outcome.reply.legal_guidance_generation,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Chat turn completed"
    );

    Ok(Json(ChatResponse {
        session_id: outcome.session_id,
        response: outcome.reply,
    }))
}

/// POST /upload_file - validate and forward a document to provider storage.
///
/// The MIME check runs before any provider interaction.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .map(str::to_string)
            .ok_or_else(|| {
                ApiError::BadRequest("file part must declare a content type".to_string())
            })?;

        if !ALLOWED_MIME_TYPES.contains(&content_type.as_str()) {
            return Err(ApiError::UnsupportedMediaType(format!(
                "unsupported file type '{}'; accepted: {}",
                content_type,
                ALLOWED_MIME_TYPES.join(", ")
            )));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {}", e)))?;
        if bytes.len() > state.config.upload.max_bytes {
            return Err(ApiError::BadRequest(format!(
                "file exceeds the {} byte limit",
                state.config.upload.max_bytes
            )));
        }

        let uploaded = state
            .provider
            .upload(&filename, &content_type, bytes.to_vec())
            .await?;

        info!(filename = %filename, file_id = %uploaded.file_id, "File uploaded");

        return Ok(Json(UploadResponse {
            filename,
            content_type: content_type.clone(),
            file_id: uploaded.file_id,
            mime_type: content_type,
        }));
    }

    Err(ApiError::BadRequest(
        "multipart field 'file' is required".to_string(),
    ))
}

/// POST /doc_analysis - structured review of an uploaded document.
pub async fn doc_analysis(
    State(state): State<AppState>,
    Json(body): Json<DocAnalysisRequest>,
) -> Result<Json<DocAnalysisResponse>, ApiError> {
    let analysis = state
        .analyzer
        .analyze(&body.file_id, body.mime_type.as_deref())
        .await?;
    Ok(Json(DocAnalysisResponse { response: analysis }))
}

/// POST /extract_user_details - text extraction from an uploaded file.
pub async fn extract_user_details(
    State(state): State<AppState>,
    Json(body): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, ApiError> {
    let extraction = state
        .extractor
        .extract(&body.file_id, &body.mime_type)
        .await?;
    Ok(Json(ExtractResponse {
        response: ExtractResponseBody {
            success: extraction.success,
            data: extraction.data,
            mime_type: body.mime_type,
        },
    }))
}

/// GET /health - health check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;

    use lexway_core::config::LexwayConfig;
    use lexway_provider::MockProvider;
    use lexway_store::MemoryStore;
    use tower::ServiceExt;

    fn make_state(provider: Arc<MockProvider>) -> AppState {
        AppState::new(
            LexwayConfig::default(),
            provider,
            Arc::new(MemoryStore::new()),
        )
    }

    fn make_app(provider: Arc<MockProvider>) -> axum::Router {
        crate::create_router(make_state(provider))
    }

    fn multipart_body(boundary: &str, filename: &str, content_type: &str) -> String {
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: {ct}\r\n\r\nfile contents\r\n--{b}--\r\n",
            b = boundary,
            f = filename,
            ct = content_type,
        )
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = make_app(Arc::new(MockProvider::new()));
        let resp = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let health: HealthResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(health.status, "healthy");
    }

    #[tokio::test]
    async fn test_chat_requires_user_input_field() {
        let provider = Arc::new(MockProvider::new());
        let app = make_app(provider.clone());
        let resp = app
            .oneshot(
                Request::post("/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"session_id": "abc"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        // Missing field fails JSON extraction before the engine runs.
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(provider.completion_count(), 0);
    }

    #[tokio::test]
    async fn test_chat_rejects_blank_input() {
        let provider = Arc::new(MockProvider::new());
        let app = make_app(provider.clone());
        let resp = app
            .oneshot(
                Request::post("/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"user_input": "   "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(provider.completion_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_rejects_zip_before_provider_call() {
        let provider = Arc::new(MockProvider::new());
        let app = make_app(provider.clone());

        let boundary = "lexway-test-boundary";
        let resp = app
            .oneshot(
                Request::post("/upload_file")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={}", boundary),
                    )
                    .body(Body::from(multipart_body(
                        boundary,
                        "archive.zip",
                        "application/zip",
                    )))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(provider.upload_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_accepts_pdf() {
        let provider = Arc::new(MockProvider::new());
        let app = make_app(provider.clone());

        let boundary = "lexway-test-boundary";
        let resp = app
            .oneshot(
                Request::post("/upload_file")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={}", boundary),
                    )
                    .body(Body::from(multipart_body(
                        boundary,
                        "contract.pdf",
                        "application/pdf",
                    )))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let upload: UploadResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(upload.filename, "contract.pdf");
        assert_eq!(upload.content_type, "application/pdf");
        assert_eq!(upload.mime_type, "application/pdf");
        assert!(upload.file_id.starts_with("file-mock-"));
        assert_eq!(provider.upload_count(), 1);
    }

    #[tokio::test]
    async fn test_upload_without_file_field_is_bad_request() {
        let provider = Arc::new(MockProvider::new());
        let app = make_app(provider.clone());

        let boundary = "lexway-test-boundary";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nvalue\r\n--{b}--\r\n",
            b = boundary
        );
        let resp = app
            .oneshot(
                Request::post("/upload_file")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={}", boundary),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(provider.upload_count(), 0);
    }

    #[tokio::test]
    async fn test_allowed_mime_types_cover_the_contract() {
        for mime in [
            "application/pdf",
            "text/plain",
            "image/png",
            "image/jpeg",
            "image/gif",
            "image/webp",
        ] {
            assert!(ALLOWED_MIME_TYPES.contains(&mime), "missing {}", mime);
        }
        assert!(!ALLOWED_MIME_TYPES.contains(&"application/zip"));
    }
}
