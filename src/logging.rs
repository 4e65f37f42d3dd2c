use tracing_subscriber::{fmt, EnvFilter};

// Installs a fmt subscriber for the embedding application. RUST_LOG takes
// precedence over `default_filter`. Safe to call more than once.
pub fn init_tracing(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .try_init()
        .is_ok()
}
