//! Opt-in JSON trace output, compiled in behind the `trace` feature.
//!
//! Without the feature every `debug!` in the crate compiles to nothing
//! (`max_level_off`), so the selection hot path carries no logging cost in
//! release builds of the game backend.

/// File the JSON subscriber appends to inside the chosen directory.
pub const TRACE_FILE: &str = "kotoba-trace.jsonl";

/// Env var the CLI tools consult: set it to a directory to enable tracing.
pub const TRACE_DIR_VAR: &str = "KOTOBA_TRACE_DIR";

#[cfg(feature = "trace")]
pub fn init_tracing(log_dir: &std::path::Path) {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let file_appender = tracing_appender::rolling::never(log_dir, TRACE_FILE);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard); // the game backend is a long-lived process

        tracing_subscriber::fmt()
            .json()
            .with_writer(non_blocking)
            .with_target(true)
            .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("kotoba_engine=debug")),
            )
            .init();
    });
}

#[cfg(not(feature = "trace"))]
pub fn init_tracing(_log_dir: &std::path::Path) {}

/// Initialize tracing from the environment, if requested. Safe to call from
/// every binary entry point; does nothing unless `KOTOBA_TRACE_DIR` is set.
pub fn init_from_env() {
    if let Some(dir) = std::env::var_os(TRACE_DIR_VAR) {
        init_tracing(std::path::Path::new(&dir));
    }
}
