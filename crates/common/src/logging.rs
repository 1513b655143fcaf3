//! Logging and tracing initialization.

use std::fs::{File, OpenOptions};
use std::path::Path;

use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

type BoxedSubscriber = Box<dyn Subscriber + Send + Sync + 'static>;

/// Initialize the tracing subscriber with the given configuration.
///
/// When logging to a file, the returned guard must be held until exit so
/// buffered events are flushed.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let (subscriber, guard) = build_subscriber(config);
    tracing::subscriber::set_global_default(subscriber).ok();
    guard
}

fn build_subscriber(config: &LoggingConfig) -> (BoxedSubscriber, Option<WorkerGuard>) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file = config
        .file
        .as_deref()
        .and_then(|path| match open_log_file(path) {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!("Failed to open log file {}: {e}", path.display());
                None
            }
        });

    if let Some(file) = file {
        let (writer, guard) = tracing_appender::non_blocking(file);
        let builder = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_ansi(false)
            .with_writer(writer);
        let subscriber: BoxedSubscriber = if config.json {
            Box::new(builder.json().finish())
        } else {
            Box::new(builder.finish())
        };
        return (subscriber, Some(guard));
    }

    let subscriber: BoxedSubscriber = if config.json {
        Box::new(
            fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .json()
                .finish(),
        )
    } else {
        Box::new(
            fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .finish(),
        )
    };
    (subscriber, None)
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_to_file(name: &str, json: bool) -> String {
        let dir = std::env::temp_dir().join(format!("playblast_test_logging_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("logs").join("playblast.log");

        let config = LoggingConfig {
            level: "info".to_string(),
            json,
            file: Some(path.clone()),
        };
        let (subscriber, guard) = build_subscriber(&config);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(answer = 42, "Logged to file");
        });
        drop(guard);

        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_dir_all(&dir).ok();
        content
    }

    #[test]
    fn test_json_file_logging() {
        let content = log_to_file("json", true);
        assert!(content.starts_with('{'), "not JSON: {content}");
        let first = content.lines().next().unwrap();
        let line: serde_json::Value = serde_json::from_str(first).unwrap();
        assert_eq!(line["fields"]["answer"], 42);
    }

    #[test]
    fn test_plain_file_logging_creates_parent_directory() {
        let content = log_to_file("plain", false);
        assert!(content.contains("Logged to file"));
        assert!(content.contains("answer=42"));
        assert!(!content.contains('\u{1b}'));
    }
}
