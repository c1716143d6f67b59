//! Structured logging initialisation shared by both binaries.

/// Initialise tracing-subscriber using `RUST_LOG` (defaults to `info`).
///
/// Set `PREFLIGHT_LOG_FORMAT=json` to emit newline-delimited JSON logs
/// suitable for log aggregators. User-facing report output still goes
/// through `println!` for UX consistency.
pub fn init() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if std::env::var("PREFLIGHT_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .compact()
            .init();
    }
}
