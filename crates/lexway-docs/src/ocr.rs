//! Text extraction from uploaded documents and images.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use lexway_chat::normalize;
use lexway_provider::{Attachment, CompletionRequest, ProviderAdapter, ShapeSpec};

use crate::error::DocsError;

/// Instruction for the extraction call.
const EXTRACTION_PROMPT: &str = "You are an OCR data extraction assistant. Extract the text from the provided document and return ONLY valid JSON. No markdown, no explanations, no extra text, no summary.";

/// Declared output shape for a text extraction call.
pub fn extraction_shape() -> ShapeSpec {
    ShapeSpec::new(
        "document_text_extraction",
        json!({
            "type": "object",
            "properties": {
                "success": {
                    "type": "boolean",
                    "description": "Whether text extraction succeeded"
                },
                "data": {
                    "type": "string",
                    "description": "Raw text extracted from the document"
                }
            },
            "required": ["success", "data"],
            "additionalProperties": false
        }),
    )
}

/// Result of one extraction call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrExtraction {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: String,
}

/// Runs text extraction against the provider boundary.
pub struct TextExtractor {
    provider: Arc<dyn ProviderAdapter>,
}

impl TextExtractor {
    pub fn new(provider: Arc<dyn ProviderAdapter>) -> Self {
        Self { provider }
    }

    /// Extract text from a previously uploaded file.
    ///
    /// The MIME type decides whether the provider sees the file as an
    /// image or a document.
    pub async fn extract(
        &self,
        file_id: &str,
        mime_type: &str,
    ) -> Result<OcrExtraction, DocsError> {
        debug!(file_id, mime_type, "Extracting document text");

        let request = CompletionRequest {
            system: None,
            user_text: EXTRACTION_PROMPT.to_string(),
            attachment: Some(Attachment {
                file_id: file_id.to_string(),
                mime_type: mime_type.to_string(),
            }),
            shape: extraction_shape(),
        };
        let raw = self.provider.complete(request).await?;
        let extraction: OcrExtraction = normalize(&raw)?;

        info!(
            file_id,
            success = extraction.success,
            chars = extraction.data.len(),
            "Text extraction finished"
        );
        Ok(extraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexway_provider::MockProvider;

    #[tokio::test]
    async fn test_extract_parses_reply() {
        let provider = Arc::new(MockProvider::with_reply(
            json!({ "success": true, "data": "ACME CORP\nInvoice #42" }).to_string(),
        ));
        let extractor = TextExtractor::new(provider.clone());

        let extraction = extractor
            .extract("file-9", "image/png")
            .await
            .unwrap();
        assert!(extraction.success);
        assert!(extraction.data.contains("Invoice #42"));

        let requests = provider.requests();
        assert!(requests[0].attachment.as_ref().unwrap().is_image());
        assert!(requests[0].system.is_none());
    }

    #[tokio::test]
    async fn test_extract_pdf_is_document_attachment() {
        let provider = Arc::new(MockProvider::with_reply(
            json!({ "success": true, "data": "text" }).to_string(),
        ));
        let extractor = TextExtractor::new(provider.clone());

        extractor.extract("file-9", "application/pdf").await.unwrap();
        let requests = provider.requests();
        assert!(!requests[0].attachment.as_ref().unwrap().is_image());
    }

    #[tokio::test]
    async fn test_extract_reports_failure_flag() {
        let provider = Arc::new(MockProvider::with_reply(
            json!({ "success": false, "data": "" }).to_string(),
        ));
        let extractor = TextExtractor::new(provider);

        let extraction = extractor.extract("file-9", "image/webp").await.unwrap();
        assert!(!extraction.success);
        assert!(extraction.data.is_empty());
    }

    #[tokio::test]
    async fn test_extract_malformed_reply_errors() {
        let provider = Arc::new(MockProvider::with_reply("```json\n{broken\n```"));
        let extractor = TextExtractor::new(provider);
        let err = extractor.extract("file-9", "image/png").await.unwrap_err();
        assert!(matches!(err, DocsError::MalformedResponse { .. }));
    }

    #[test]
    fn test_shape_requires_success_and_data() {
        let shape = extraction_shape();
        let required = shape.schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 2);
    }
}
