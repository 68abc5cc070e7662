//! Record formatting: timestamp styles and the output line template

use super::record::LogRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp format options for formatted output
///
/// # Examples
///
/// ```
/// use logpipe::core::TimestampFormat;
/// use chrono::Utc;
///
/// let format = TimestampFormat::Iso8601;
/// let timestamp = format.format(&Utc::now());
/// assert!(timestamp.ends_with('Z'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// RFC 3339 format with timezone offset: `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime format string
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, timestamp: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Rfc3339 => timestamp.to_rfc3339(),
            TimestampFormat::UnixMillis => timestamp.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => timestamp.format(format_str).to_string(),
        }
    }
}

/// Default output line template.
pub const DEFAULT_TEMPLATE: &str = "{timestamp} [{level}] {logger} - {message}";

/// Renders a record into a single output line.
///
/// The template supports `{timestamp}`, `{level}`, `{logger}`, `{thread}` and
/// `{message}` placeholders. The root logger renders as `root`.
#[derive(Debug, Clone)]
pub struct Formatter {
    template: String,
    timestamp: TimestampFormat,
}

impl Formatter {
    pub fn new(template: impl Into<String>, timestamp: TimestampFormat) -> Self {
        Self {
            template: template.into(),
            timestamp,
        }
    }

    #[must_use]
    pub fn format(&self, record: &LogRecord) -> String {
        let logger_name = if record.logger.is_empty() {
            "root"
        } else {
            record.logger.as_str()
        };
        let thread = record
            .thread_name
            .as_deref()
            .unwrap_or(record.thread_id.as_str());

        self.template
            .replace("{timestamp}", &self.timestamp.format(&record.timestamp))
            .replace("{level}", &format!("{:5}", record.level.to_str()))
            .replace("{logger}", logger_name)
            .replace("{thread}", thread)
            .replace("{message}", &record.message)
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE, TimestampFormat::default())
    }
}
