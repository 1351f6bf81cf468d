use anyhow::{Context, Result};
use guest_lookup::config::DEFAULT_LOG_FILTER;
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

pub struct Logging {
    handle: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

/// Install the subscriber before anything logs: RUST_LOG if set, else the default filter
pub fn init() -> Logging {
    let env_filter = EnvFilter::try_from_default_env().ok();
    let from_env = env_filter.is_some();
    let (filter, handle) =
        reload::Layer::new(env_filter.unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    Logging { handle, from_env }
}

impl Logging {
    /// Switch to the configured filter unless RUST_LOG already picked one
    pub fn apply(&self, configured: &str) -> Result<()> {
        if self.from_env {
            return Ok(());
        }
        let filter = EnvFilter::try_new(configured)
            .with_context(|| format!("Invalid log filter: {configured}"))?;
        self.handle.reload(filter).context("Failed to apply log filter")
    }
}
