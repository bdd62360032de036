pub mod config;
pub mod error;
pub mod types;

pub use config::LexwayConfig;
pub use error::{LexwayError, Result};
pub use types::*;
