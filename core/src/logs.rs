//! Activity log entries and the native console logger.
//!
//! [`LogEntry`] is what the browser activity panel renders; the orchestrator
//! observer turns each [`ItemEvent`] into one. On native targets
//! `init_console_logger` installs a `tracing-subscriber` console subscriber
//! that also receives the `log` facade.

use serde::{Deserialize, Serialize};

use crate::upload::{ItemEvent, ItemStage};

/// Log level for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// `HH:MM:SS`, filled by whoever displays the entry.
    #[serde(default)]
    pub timestamp: String,
    /// Nesting depth (item lines sit under their batch line).
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    fn with_level(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: String::new(),
            indent: 0,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::with_level(LogLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::with_level(LogLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_level(LogLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_level(LogLevel::Error, message)
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }
}

impl From<&ItemEvent> for LogEntry {
    fn from(event: &ItemEvent) -> Self {
        let entry = match event.stage {
            ItemStage::Building => LogEntry::info(format!("{}: reading file", event.name)),
            ItemStage::Signing => LogEntry::info(format!("{}: waiting for signature", event.name)),
            ItemStage::Publishing => LogEntry::info(format!("{}: posting to gateway", event.name)),
            ItemStage::Done => LogEntry::success(format!("{}: published", event.name)),
            ItemStage::Failed => match &event.detail {
                Some(detail) => LogEntry::error(format!("{}: {}", event.name, detail)),
                None => LogEntry::error(format!("{}: failed", event.name)),
            },
        };
        entry.with_indent(1)
    }
}

// =============================================================================
// Console logger (native)
// =============================================================================

#[cfg(feature = "native")]
pub use console::init_console_logger;

#[cfg(feature = "native")]
mod console {
    use tracing_subscriber::fmt::time::ChronoLocal;
    use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
    use tracing_subscriber::EnvFilter;

    /// Install the console subscriber for the process.
    ///
    /// `RUST_LOG` selects the filter, defaulting to `info`; `verbose` forces
    /// `debug`. Records from the `log` facade are forwarded to the subscriber.
    pub fn init_console_logger(verbose: bool) -> Result<(), TryInitError> {
        let filter = if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        };

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_timer(ChronoLocal::new("%H:%M:%S".to_string()))
            .with_target(false)
            .finish()
            .try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SignError;
    use crate::upload::ItemFailure;

    #[test]
    fn test_event_levels() {
        let done = LogEntry::from(&ItemEvent::new("a.png", ItemStage::Done));
        assert_eq!(done.level, LogLevel::Success);
        assert_eq!(done.message, "a.png: published");
        assert_eq!(done.indent, 1);

        let failed = LogEntry::from(&ItemEvent::new("a.png", ItemStage::Failed));
        assert_eq!(failed.level, LogLevel::Error);
        assert_eq!(failed.message, "a.png: failed");
    }

    #[test]
    fn test_failed_event_shows_reason() {
        let failure = ItemFailure::new(
            ItemStage::Signing,
            SignError::Rejected("user declined".into()),
        );
        let entry = LogEntry::from(&ItemEvent::failed("a.png", &failure));
        assert_eq!(entry.level, LogLevel::Error);
        assert!(entry.message.starts_with("a.png: failed while signing"));
        assert!(entry.message.contains("user declined"));
    }

    #[test]
    fn test_entry_serializes_lowercase_level() {
        let json = serde_json::to_value(LogEntry::warning("slow gateway")).unwrap();
        assert_eq!(json["level"], "warning");
        assert_eq!(json["indent"], 0);
    }
}
