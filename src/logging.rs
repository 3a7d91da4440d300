use crate::config::LoggingConfig;
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes logging with console output and a daily-rotated JSON file.
///
/// The returned guard flushes the file writer when dropped; keep it alive for
/// the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = || {
        let filter = EnvFilter::from_default_env();
        match config.default_directive.parse() {
            Ok(directive) => filter.add_directive(directive),
            Err(_) => filter,
        }
    };

    if fs::create_dir_all(&config.directory).is_err() {
        tracing_subscriber::registry()
            .with(filter())
            // Console output goes to stderr so CLI listings on stdout stay clean
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
        tracing::warn!(
            "Could not create log directory {}, logging to console only",
            config.directory.display()
        );
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(&config.directory, &config.file_prefix);
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);

    tracing_subscriber::registry()
        .with(filter())
        .with(file_layer)
        // Console output goes to stderr so CLI listings on stdout stay clean
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    Some(guard)
}
