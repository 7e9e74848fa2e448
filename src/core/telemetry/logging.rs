use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global `fmt` subscriber. `RUST_LOG` wins over the default `info` filter.
pub fn init_logging() {
    init_logging_with("info");
}

pub fn init_logging_with(default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = fmt().with_env_filter(env_filter).try_init();
}
