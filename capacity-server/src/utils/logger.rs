//! Logging Infrastructure
//!
//! Structured logging setup with optional daily-rolling file output.

use std::path::Path;

/// Initialize the logger.
///
/// `level` is the maximum level ("trace".."error", defaults to info on parse
/// failure). When `log_dir` points at an existing directory, output goes to a
/// daily-rolling file there instead of stdout.
pub fn init_logger(level: &str, log_dir: Option<&str>) {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level.parse().unwrap_or(tracing::Level::INFO))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "capacity-server");
            subscriber.with_writer(file_appender).init();
            return;
        }
    }

    subscriber.init();
}
