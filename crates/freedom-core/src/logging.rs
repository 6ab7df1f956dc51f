use std::collections::VecDeque;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use tracing_appender::rolling;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use freedom_config::LoggingConfig;

use crate::console::CONSOLE_CAPACITY;

/// File name prefix of the daily log files.
pub const LOG_FILE_PREFIX: &str = "freedom.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<tracing::Level> for LogLevel {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => LogLevel::Trace,
            tracing::Level::DEBUG => LogLevel::Debug,
            tracing::Level::INFO => LogLevel::Info,
            tracing::Level::WARN => LogLevel::Warn,
            tracing::Level::ERROR => LogLevel::Error,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// One line of the in-app console.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub target: String,
    pub message: String,
}

/// Entries captured by the console layer, waiting for the UI to pick them up.
pub type LogBuffer = Arc<Mutex<VecDeque<LogEntry>>>;

pub fn new_log_buffer(capacity: usize) -> LogBuffer {
    Arc::new(Mutex::new(VecDeque::with_capacity(capacity)))
}

/// Take everything the console layer captured since the last call.
pub fn drain_buffer(buffer: &LogBuffer) -> Vec<LogEntry> {
    match buffer.lock() {
        Ok(mut buf) => buf.drain(..).collect(),
        Err(_) => Vec::new(),
    }
}

/// Where log files go: `FREEDOM_LOG_DIR`, then the configured directory,
/// then the platform data directory.
pub fn log_dir(config: &LoggingConfig) -> PathBuf {
    resolve_log_dir(std::env::var("FREEDOM_LOG_DIR").ok(), config.dir.as_deref())
}

fn resolve_log_dir(env: Option<String>, configured: Option<&Path>) -> PathBuf {
    if let Some(dir) = env.filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    if let Some(dir) = configured {
        return dir.to_path_buf();
    }
    dirs::data_dir()
        .map(|d| d.join("freedom-dashboard").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Delete `freedom.log*` files last modified more than `retention_days` ago.
/// Returns how many were removed.
fn prune_logs(dir: &Path, retention_days: u64) -> usize {
    let window = Duration::from_secs(retention_days.saturating_mul(86_400));
    let Some(cutoff) = SystemTime::now().checked_sub(window) else {
        return 0;
    };
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .flatten()
        .filter(|e| e.file_name().to_string_lossy().starts_with(LOG_FILE_PREFIX))
        .filter(|e| {
            e.metadata()
                .and_then(|m| m.modified())
                .is_ok_and(|modified| modified < cutoff)
        })
        .filter(|e| std::fs::remove_file(e.path()).is_ok())
        .count()
}

/// Tracing layer copying events into the console buffer.
struct ConsoleLayer {
    buffer: LogBuffer,
    capacity: usize,
}

impl<S: tracing::Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let meta = event.metadata();
        let mut visitor = FieldCollector::default();
        event.record(&mut visitor);
        let entry = LogEntry {
            level: LogLevel::from(*meta.level()),
            target: meta.target().to_string(),
            message: visitor.finish(),
        };

        if let Ok(mut buf) = self.buffer.lock() {
            if buf.len() >= self.capacity {
                buf.pop_front();
            }
            buf.push_back(entry);
        }
    }
}

#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    fields: Vec<String>,
}

impl FieldCollector {
    /// `message key=value ...`
    fn finish(self) -> String {
        let mut parts: Vec<String> = self.message.into_iter().collect();
        parts.extend(self.fields);
        parts.join(" ")
    }
}

impl tracing::field::Visit for FieldCollector {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }
}

/// Install the global subscriber and return the console buffer.
///
/// Filter: `FREEDOM_LOG`, else `RUST_LOG`, else `info`. Files roll daily
/// under [`log_dir`]; files older than the configured retention are removed
/// first.
pub fn init(config: &LoggingConfig) -> LogBuffer {
    let buffer = new_log_buffer(CONSOLE_CAPACITY);

    let filter = EnvFilter::try_from_env("FREEDOM_LOG")
        .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let dir = log_dir(config);
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("warning: cannot create log directory {}: {}", dir.display(), e);
    }
    let pruned = prune_logs(&dir, config.retention_days);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(rolling::daily(&dir, LOG_FILE_PREFIX))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(ConsoleLayer {
            buffer: buffer.clone(),
            capacity: CONSOLE_CAPACITY,
        })
        .init();

    tracing::info!(dir = %dir.display(), pruned, "logging initialised");
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_dir_wins() {
        let dir = resolve_log_dir(Some("/tmp/freedom-env".into()), Some(Path::new("/tmp/cfg")));
        assert_eq!(dir, PathBuf::from("/tmp/freedom-env"));
    }

    #[test]
    fn configured_dir_beats_platform_default() {
        assert_eq!(
            resolve_log_dir(None, Some(Path::new("/tmp/cfg"))),
            PathBuf::from("/tmp/cfg")
        );
        assert_eq!(
            resolve_log_dir(Some(String::new()), Some(Path::new("/tmp/cfg"))),
            PathBuf::from("/tmp/cfg")
        );
    }

    #[test]
    fn platform_default_ends_in_logs() {
        let dir = resolve_log_dir(None, None);
        assert!(dir.ends_with("logs"));
    }

    #[test]
    fn level_conversion_and_display() {
        assert_eq!(LogLevel::from(tracing::Level::WARN), LogLevel::Warn);
        assert_eq!(LogLevel::Debug.to_string(), "DEBUG");
        assert_eq!(LogLevel::Error.to_string(), "ERROR");
    }

    #[test]
    fn collector_joins_message_and_fields() {
        let c = FieldCollector {
            message: Some("cycle".into()),
            fields: vec!["station=1".into(), "listeners=85600".into()],
        };
        assert_eq!(c.finish(), "cycle station=1 listeners=85600");

        let only_fields = FieldCollector {
            message: None,
            fields: vec!["a=1".into()],
        };
        assert_eq!(only_fields.finish(), "a=1");
        assert_eq!(FieldCollector::default().finish(), "");
    }

    #[test]
    fn drain_buffer_empties() {
        let buf = new_log_buffer(4);
        buf.lock().unwrap().push_back(LogEntry {
            level: LogLevel::Info,
            target: "freedom_core".into(),
            message: "hello".into(),
        });
        let drained = drain_buffer(&buf);
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].message, "hello");
        assert!(drain_buffer(&buf).is_empty());
    }

    #[test]
    fn prune_only_touches_log_files() {
        let tmp = std::env::temp_dir().join(format!("freedom-prune-{}", std::process::id()));
        std::fs::create_dir_all(&tmp).unwrap();
        let old = tmp.join("freedom.log.2025-01-01");
        let other = tmp.join("notes.txt");
        std::fs::write(&old, "x").unwrap();
        std::fs::write(&other, "y").unwrap();

        // Zero-day retention puts the cutoff at now.
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(prune_logs(&tmp, 0), 1);
        assert!(!old.exists());
        assert!(other.exists());

        assert_eq!(prune_logs(&tmp, 7), 0);
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn huge_retention_keeps_everything() {
        let tmp = std::env::temp_dir().join(format!("freedom-retain-{}", std::process::id()));
        std::fs::create_dir_all(&tmp).unwrap();
        let log = tmp.join("freedom.log.2025-01-01");
        std::fs::write(&log, "x").unwrap();

        assert_eq!(prune_logs(&tmp, 300_000_000_000_000), 0);
        assert_eq!(prune_logs(&tmp, u64::MAX), 0);
        assert!(log.exists());
        let _ = std::fs::remove_dir_all(&tmp);
    }
}
