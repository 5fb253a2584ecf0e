use tracing_subscriber::EnvFilter;

/// Application-level constants
pub const APP_NAME: &str = "paper-digest";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log filter used when `RUST_LOG` is unset.
/// Our own stages at info, dependencies (reqwest, html5ever) only when they warn.
pub fn default_log_filter() -> String {
    format!("warn,{}=info", env!("CARGO_CRATE_NAME"))
}

/// User agent sent with every document request.
pub fn default_user_agent() -> String {
    format!("{APP_NAME}/{APP_VERSION}")
}

/// Initialize tracing. Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
