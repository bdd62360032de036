//! Document capabilities for Lexway: structured legal analysis and raw
//! text extraction over the shared provider boundary.

pub mod analysis;
pub mod error;
pub mod ocr;

pub use analysis::{analysis_shape, DocAnalysis, DocAnalyzer, ANALYSIS_SYSTEM_PROMPT};
pub use error::DocsError;
pub use ocr::{extraction_shape, OcrExtraction, TextExtractor};
