//! Logging and observability helpers.

use std::fs;
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime};

use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_FILE_PREFIX: &str = "sqldesk.log";
const LOG_RETENTION_DAYS: u64 = 14;
const DEFAULT_FILTER: &str = "sqldesk=info,sqldesk_lib=info,sqldesk_core=info";

pub fn init_tracing(log_dir: &Path) {
    let _ = fs::create_dir_all(log_dir);

    let file_appender: RollingFileAppender =
        tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = fmt::layer()
        .json()
        .with_writer(file_appender)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_current_span(true)
        .with_span_list(true)
        .with_ansi(false)
        .with_span_events(FmtSpan::CLOSE);

    let stderr_layer = fmt::layer().with_writer(io::stderr).with_target(false);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init();

    let retention = Duration::from_secs(LOG_RETENTION_DAYS * 24 * 60 * 60);
    match cleanup_old_logs(log_dir, retention) {
        Ok(0) => {}
        Ok(removed) => tracing::info!(removed, "Removed old log files"),
        Err(e) => tracing::warn!("Failed to clean up old logs: {}", e),
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let payload = panic_info.payload();
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());

        let msg = if let Some(s) = payload.downcast_ref::<&str>() {
            format!("PANIC: {}", s)
        } else if let Some(s) = payload.downcast_ref::<String>() {
            format!("PANIC: {}", s)
        } else {
            "PANIC: unknown cause".to_string()
        };

        tracing::error!(target: "panic", location = %location, message = %msg, "Server panicked");

        previous_hook(panic_info);
    }));

    tracing::info!("Tracing initialized. Logs directory: {:?}", log_dir);
}

/// Deletes rolled log files last modified more than `retention` ago.
/// Returns how many files were removed.
fn cleanup_old_logs(log_dir: &Path, retention: Duration) -> io::Result<usize> {
    let now = SystemTime::now();
    let mut removed = 0;

    for entry in fs::read_dir(log_dir)? {
        let path = entry?.path();

        // Rolled files are named `sqldesk.log.YYYY-MM-DD`.
        let is_log = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with(LOG_FILE_PREFIX))
            .unwrap_or(false);
        if !is_log || !path.is_file() {
            continue;
        }

        let age = fs::metadata(&path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| now.duration_since(modified).ok());
        if let Some(age) = age {
            if age > retention {
                match fs::remove_file(&path) {
                    Ok(()) => removed += 1,
                    Err(e) => tracing::warn!("Failed to remove old log file {:?}: {}", path, e),
                }
            }
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleanup_removes_only_expired_log_files() {
        let dir = tempfile::tempdir().unwrap();
        let rolled = dir.path().join("sqldesk.log.2020-01-01");
        let other = dir.path().join("notes.txt");
        fs::write(&rolled, "{}\n").unwrap();
        fs::write(&other, "keep").unwrap();

        std::thread::sleep(Duration::from_millis(20));

        let removed = cleanup_old_logs(dir.path(), Duration::from_millis(1)).unwrap();
        assert_eq!(removed, 1);
        assert!(!rolled.exists());
        assert!(other.exists());
    }

    #[test]
    fn cleanup_keeps_recent_files() {
        let dir = tempfile::tempdir().unwrap();
        let today = dir.path().join("sqldesk.log.2026-01-01");
        fs::write(&today, "{}\n").unwrap();

        let removed =
            cleanup_old_logs(dir.path(), Duration::from_secs(LOG_RETENTION_DAYS * 86_400))
                .unwrap();
        assert_eq!(removed, 0);
        assert!(today.exists());
    }

    #[test]
    fn cleanup_of_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(cleanup_old_logs(&dir.path().join("absent"), Duration::ZERO).is_err());
    }
}
