use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber as the global default.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` (e.g. `"info"` or
/// `"pokepwa=debug"`) is used.
pub fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
