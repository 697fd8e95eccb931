//! Application state and configuration.

use std::collections::HashSet;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use tessera_core::{SettingsStore, TileRegistry, TileStore};
use tessera_publish::{PageGenerator, PublishConfig, builtin_registry};

/// Application configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080").
    pub bind_addr: String,

    /// Valid API tokens (loaded from TESSERA_API_TOKENS).
    pub api_tokens: HashSet<String>,

    /// Data, output and backup locations.
    pub publish: PublishConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `TESSERA_API_TOKENS`: Comma-separated list of valid API tokens
    ///
    /// Optional environment variables:
    /// - `TESSERA_BIND_ADDR`: Server bind address (default: "0.0.0.0:8080")
    /// - everything read by [`PublishConfig::from_env`]
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("TESSERA_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let tokens_str = std::env::var("TESSERA_API_TOKENS")
            .map_err(|_| anyhow::anyhow!("TESSERA_API_TOKENS environment variable is required"))?;

        let api_tokens: HashSet<String> = tokens_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if api_tokens.is_empty() {
            anyhow::bail!("TESSERA_API_TOKENS must contain at least one token");
        }

        let publish = PublishConfig::from_env()?;

        tracing::info!(
            bind_addr = %bind_addr,
            token_count = api_tokens.len(),
            "configuration loaded"
        );

        Ok(Self {
            bind_addr,
            api_tokens,
            publish,
        })
    }
}

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<Config>,

    /// Publishes and previews the page; owns the tile and settings stores.
    pub generator: Arc<PageGenerator>,

    /// Prometheus handle, when a recorder was installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state from configuration, using the
    /// built-in tile types.
    pub fn new(config: Config) -> Self {
        let registry = Arc::new(builtin_registry());
        let generator = PageGenerator::open(&config.publish, registry);

        tracing::info!(
            data_dir = %config.publish.data_dir.display(),
            output_path = %config.publish.output_path.display(),
            tile_types = generator.tiles().registry().len(),
            "application state initialized"
        );

        Self {
            config: Arc::new(config),
            generator: Arc::new(generator),
            metrics: None,
        }
    }

    /// Attach a Prometheus handle so `/metrics` can render it.
    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }

    /// The tile store.
    pub fn tiles(&self) -> &TileStore {
        self.generator.tiles()
    }

    /// The settings store.
    pub fn settings(&self) -> &SettingsStore {
        self.generator.settings()
    }

    /// The tile type registry.
    pub fn registry(&self) -> &TileRegistry {
        self.generator.tiles().registry()
    }
}
