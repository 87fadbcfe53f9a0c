// Logging setup
// Decision: Console output only; filter from RUST_LOG, then LOG_LEVEL, then the default

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Filter used when neither RUST_LOG nor LOG_LEVEL is set
pub const DEFAULT_LOG_FILTER: &str = "ondas_api=debug,tower_http=debug";

/// Logging configuration
#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    /// Filter directive, e.g. "info" or "ondas_api=trace"
    pub log_filter: Option<String>,
}

impl TelemetryConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_filter = lookup("RUST_LOG")
            .or_else(|| lookup("LOG_LEVEL"))
            .filter(|f| !f.trim().is_empty());
        Self { log_filter }
    }

    /// Resolve the filter, falling back to the default on an invalid directive
    pub fn env_filter(&self) -> EnvFilter {
        self.log_filter
            .as_ref()
            .and_then(|f| EnvFilter::try_new(f).ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
    }
}

/// Install the global subscriber. Call once at startup.
pub fn init_tracing(config: TelemetryConfig) {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_filter(config.env_filter());

    tracing_subscriber::registry().with(console_layer).init();
}
