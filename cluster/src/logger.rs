//! Diagnostic output for the cluster codec.
//!
//! Recoverable problems (malformed feature entries, skipped lines) go to a
//! [`Logger`] instead of the output stream. The default implementation forwards
//! to the `tracing` crate.

use std::sync::Arc;

/// Sink for codec diagnostics: warnings about dropped entries, progress
/// notes and skipped lines.
pub trait Logger: Send + Sync {
    fn warn(&self, msg: &str);
    fn info(&self, msg: &str);
    fn debug(&self, msg: &str);
}

/// Logger used when none is supplied: messages become `tracing` events.
pub fn default_logger() -> Arc<dyn Logger> {
    Arc::new(TracingLogger)
}

struct TracingLogger;

impl Logger for TracingLogger {
    fn warn(&self, msg: &str) {
        tracing::warn!("cluster: {}", msg);
    }

    fn info(&self, msg: &str) {
        tracing::info!("cluster: {}", msg);
    }

    fn debug(&self, msg: &str) {
        tracing::debug!("cluster: {}", msg);
    }
}

/// Silences the codec, e.g. in benchmarks.
pub struct NopLogger;

impl Logger for NopLogger {
    fn warn(&self, _msg: &str) {}
    fn info(&self, _msg: &str) {}
    fn debug(&self, _msg: &str) {}
}

/// Formatted warn logging.
#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $logger.warn(&format!($($arg)*))
    };
}

/// Formatted info logging.
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.info(&format!($($arg)*))
    };
}

/// Formatted debug logging.
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debug(&format!($($arg)*))
    };
}

/// Records every message with its level. Shared by the crate's tests.
#[cfg(test)]
pub(crate) struct CapturingLogger {
    messages: std::sync::Mutex<Vec<(String, String)>>,
}

#[cfg(test)]
impl CapturingLogger {
    pub(crate) fn new() -> Self {
        Self {
            messages: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }

    /// Messages logged at `level`.
    pub(crate) fn at(&self, level: &str) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(l, _)| l == level)
            .map(|(_, m)| m)
            .collect()
    }

    fn push(&self, level: &str, msg: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((level.to_string(), msg.to_string()));
    }
}

#[cfg(test)]
impl Logger for CapturingLogger {
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
}
