//! Deep-dive legal document analysis.
//!
//! Sends an uploaded document to the provider under a counsel persona and
//! a declared report shape, then normalizes the reply into a
//! [`DocAnalysis`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use lexway_chat::normalize;
use lexway_core::types::Localization;
use lexway_provider::{Attachment, CompletionRequest, ProviderAdapter, ShapeSpec};

use crate::error::DocsError;

/// MIME type assumed when the caller does not say otherwise.
const DEFAULT_MIME_TYPE: &str = "application/pdf";

/// Instructions for the document review persona.
pub const ANALYSIS_SYSTEM_PROMPT: &str = r#"You are an experienced legal counsel and contract specialist reviewing documents to protect the user's interests.

Analyze the provided legal document and report:
1. A concise executive summary: the document's purpose, the parties, and how favorable the agreement is to the user.
2. The legally significant clauses and the obligations or rights they create (payment terms, duration, termination, confidentiality).
3. Potential risks and red flags: unfavorable terms, ambiguous language, lopsided liabilities, and what is conspicuously missing.
4. Actionable recommendations: what to negotiate, delete, or clarify with the counterparty.

Be professional, objective, and precise; reference specific sections where possible and translate legalese into plain language. Also infer the governing country, legal system, jurisdiction, and legal domain from the document, using "Unknown" where the text gives no indication."#;

/// User-side instruction placed next to the attached document.
const ANALYSIS_USER_PROMPT: &str =
    "Analyze the attached document and return ONLY valid JSON matching the requested schema.";

/// Declared output shape for a document analysis call.
pub fn analysis_shape() -> ShapeSpec {
    ShapeSpec::new(
        "legal_doc_analysis",
        json!({
            "type": "object",
            "properties": {
                "localization": {
                    "type": "object",
                    "properties": {
                        "country": {
                            "type": "string",
                            "description": "Country inferred from the document or 'Unknown'"
                        },
                        "legal_system": {
                            "type": "string",
                            "description": "Legal system (e.g., Common Law, Civil Law) or 'Unknown'"
                        },
                        "jurisdiction": {
                            "type": "string",
                            "description": "Specific jurisdiction or authority or 'Unknown'"
                        },
                        "legal_domain": {
                            "type": "string",
                            "description": "Primary legal domain (e.g., Contract Law, Employment Law)"
                        }
                    },
                    "required": ["country", "legal_system", "jurisdiction", "legal_domain"],
                    "additionalProperties": false
                },
                "potential_risks": {
                    "type": "array",
                    "description": "Identified legal risks",
                    "items": { "type": "string" }
                },
                "key_clauses": {
                    "type": "array",
                    "description": "Legally significant clauses",
                    "items": { "type": "string" }
                },
                "ai_recommendation": {
                    "type": "array",
                    "description": "Actions to mitigate risk or improve the user's position",
                    "items": { "type": "string" }
                },
                "summary": {
                    "type": "string",
                    "description": "Concise counsel-style summary of the situation and exposure"
                }
            },
            "required": [
                "localization",
                "potential_risks",
                "key_clauses",
                "ai_recommendation",
                "summary"
            ],
            "additionalProperties": false
        }),
    )
}

/// Structured report for one analyzed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocAnalysis {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub localization: Localization,
    #[serde(default)]
    pub potential_risks: Vec<String>,
    #[serde(default)]
    pub key_clauses: Vec<String>,
    #[serde(default)]
    pub ai_recommendation: Vec<String>,
}

/// Runs document analysis against the provider boundary.
pub struct DocAnalyzer {
    provider: Arc<dyn ProviderAdapter>,
}

impl DocAnalyzer {
    pub fn new(provider: Arc<dyn ProviderAdapter>) -> Self {
        Self { provider }
    }

    /// Analyze a previously uploaded document.
    pub async fn analyze(
        &self,
        file_id: &str,
        mime_type: Option<&str>,
    ) -> Result<DocAnalysis, DocsError> {
        let mime_type = mime_type.unwrap_or(DEFAULT_MIME_TYPE);
        debug!(file_id, mime_type, "Analyzing document");

        let request = CompletionRequest {
            system: Some(ANALYSIS_SYSTEM_PROMPT.to_string()),
            user_text: ANALYSIS_USER_PROMPT.to_string(),
            attachment: Some(Attachment {
                file_id: file_id.to_string(),
                mime_type: mime_type.to_string(),
            }),
            shape: analysis_shape(),
        };
        let raw = self.provider.complete(request).await?;
        let analysis: DocAnalysis = normalize(&raw)?;

        info!(
            file_id,
            risks = analysis.potential_risks.len(),
            clauses = analysis.key_clauses.len(),
            "Document analyzed"
        );
        Ok(analysis)
    }
}
