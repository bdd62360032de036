//! Lexway service binary - composition root.
//!
//! Ties the Lexway crates into a single executable:
//! 1. Load configuration from TOML (path via `LEXWAY_CONFIG`, default
//!    `lexway.toml`)
//! 2. Initialize tracing from the configured log level
//! 3. Select the provider vendor and read its API key from the environment
//! 4. Open the file-backed session store
//! 5. Start the axum REST API server

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use lexway_api::{routes, AppState};
use lexway_core::config::{LexwayConfig, ProviderConfig};
use lexway_core::error::{LexwayError, Result};
use lexway_provider::{AnthropicProvider, OpenAiProvider, ProviderAdapter};
use lexway_store::FileStore;

/// Build the configured provider adapter.
///
/// The API key is read from the environment variable named in the config,
/// never from the config file itself.
fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn ProviderAdapter>> {
    let api_key = std::env::var(&config.api_key_env).map_err(|_| {
        LexwayError::Config(format!(
            "environment variable {} is not set",
            config.api_key_env
        ))
    })?;
    let timeout = Duration::from_secs(config.timeout_secs);

    let provider: Arc<dyn ProviderAdapter> = match config.vendor.as_str() {
        "openai" => {
            let mut provider = OpenAiProvider::new(api_key, config.model.clone(), timeout)
                .map_err(|e| LexwayError::Provider(e.to_string()))?
                .with_max_output_tokens(config.max_output_tokens);
            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            Arc::new(provider)
        }
        "anthropic" => {
            let mut provider = AnthropicProvider::new(api_key, config.model.clone(), timeout)
                .map_err(|e| LexwayError::Provider(e.to_string()))?
                .with_max_output_tokens(config.max_output_tokens);
            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            Arc::new(provider)
        }
        other => {
            return Err(LexwayError::Config(format!(
                "unknown provider vendor '{}'; expected 'openai' or 'anthropic'",
                other
            )))
        }
    };
    Ok(provider)
}

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::var("LEXWAY_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("lexway.toml"));
    let config = LexwayConfig::load_or_default(&config_path);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&config.general.log_level)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!(
        vendor = %config.provider.vendor,
        model = %config.provider.model,
        "Starting Lexway"
    );

    let provider = build_provider(&config.provider)?;
    let store = Arc::new(FileStore::new(&config.store.path));

    let state = AppState::new(config, provider, store);
    routes::start_server(state).await
}
