//! Custom logging module.
//!
//! This module provides a logger that captures formatted log entries into a
//! bounded shared buffer so a view can display them, optionally forwarding
//! each entry to a callback as well.

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Number of entries kept when no capacity is given.
///
pub const DEFAULT_CAPACITY: usize = 200;

type LogCallback = Box<dyn Fn(String) + Send + Sync>;

/// Format a log record into a string for display
///
pub fn format_log(record: &Record) -> String {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let level_str = match record.level() {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    };
    format!("{} {} {}", timestamp, level_str, record.args())
}

/// Handle to the captured entries, cheap to clone.
///
#[derive(Clone)]
pub struct LogBuffer {
    entries: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl Default for LogBuffer {
    fn default() -> Self {
        LogBuffer::new(DEFAULT_CAPACITY)
    }
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        LogBuffer {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    fn push(&self, entry: String) {
        if let Ok(mut entries) = self.entries.lock() {
            while self.capacity > 0 && entries.len() >= self.capacity {
                entries.pop_front();
            }
            entries.push_back(entry);
        }
    }

    /// Copy of the captured entries, oldest first.
    ///
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// The last `count` entries, oldest first.
    ///
    pub fn tail(&self, count: usize) -> Vec<String> {
        let entries = self.entries();
        let skip = entries.len().saturating_sub(count);
        entries.into_iter().skip(skip).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Custom logger that captures logs to a shared buffer
///
pub struct CaptureLogger {
    level: LevelFilter,
    buffer: LogBuffer,
    log_callback: Arc<Mutex<Option<LogCallback>>>,
}

impl CaptureLogger {
    pub fn new(level: LevelFilter) -> Self {
        CaptureLogger {
            level,
            buffer: LogBuffer::new(DEFAULT_CAPACITY),
            log_callback: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.buffer = LogBuffer::new(capacity);
        self
    }

    pub fn buffer(&self) -> LogBuffer {
        self.buffer.clone()
    }

    pub fn set_log_callback(&self, callback: LogCallback) {
        if let Ok(mut guard) = self.log_callback.lock() {
            *guard = Some(callback);
        }
    }

    /// Install as the global logger. Returns the buffer entries land in.
    ///
    pub fn init(self) -> Result<LogBuffer, SetLoggerError> {
        let buffer = self.buffer();
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(buffer)
    }
}

impl Log for CaptureLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let formatted = format_log(record);
            if let Ok(callback) = self.log_callback.lock() {
                if let Some(ref cb) = *callback {
                    cb(formatted.clone());
                }
            }
            self.buffer.push(formatted);
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit(logger: &CaptureLogger, level: Level, message: &str) {
        logger.log(
            &Record::builder()
                .args(format_args!("{}", message))
                .level(level)
                .target("form_state")
                .build(),
        );
    }

    #[test]
    fn test_format_log() {
        let formatted = format_log(
            &Record::builder()
                .args(format_args!("Submitting form"))
                .level(Level::Warn)
                .build(),
        );
        assert!(formatted.ends_with("WARN Submitting form"));
    }

    #[test]
    fn test_level_filter() {
        let logger = CaptureLogger::new(LevelFilter::Info);
        emit(&logger, Level::Debug, "hidden");
        emit(&logger, Level::Info, "shown");
        let entries = logger.buffer().entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].ends_with("INFO shown"));
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let logger = CaptureLogger::new(LevelFilter::Trace).with_capacity(2);
        emit(&logger, Level::Info, "one");
        emit(&logger, Level::Info, "two");
        emit(&logger, Level::Info, "three");
        let buffer = logger.buffer();
        assert_eq!(buffer.len(), 2);
        assert!(buffer.entries()[0].ends_with("two"));
        assert!(buffer.tail(1)[0].ends_with("three"));
        assert_eq!(buffer.tail(10).len(), 2);
    }

    #[test]
    fn test_default_buffer_is_bounded() {
        let buffer = LogBuffer::default();
        for i in 0..DEFAULT_CAPACITY + 5 {
            buffer.push(format!("entry {}", i));
        }
        assert_eq!(buffer.len(), DEFAULT_CAPACITY);
        assert_eq!(buffer.entries()[0], "entry 5");
    }

    #[test]
    fn test_callback_receives_entries() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let logger = CaptureLogger::new(LevelFilter::Trace);
        let sink = Arc::clone(&seen);
        logger.set_log_callback(Box::new(move |entry| sink.lock().unwrap().push(entry)));
        emit(&logger, Level::Error, "boom");
        assert_eq!(seen.lock().unwrap().len(), 1);
        assert!(!logger.buffer().is_empty());
    }
}
