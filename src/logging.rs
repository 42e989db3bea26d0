use tracing_subscriber::EnvFilter;

/// Console logging for foreground runs. `RUST_LOG` overrides the default
/// `info` level.
pub fn init_console_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
