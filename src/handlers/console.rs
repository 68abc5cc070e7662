//! Console handler implementation

use crate::core::{Formatter, Handler, LogLevel, LogRecord, Result};
use colored::Colorize;

pub struct ConsoleHandler {
    use_colors: bool,
    formatter: Formatter,
    level: LogLevel,
}

impl ConsoleHandler {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            formatter: Formatter::default(),
            level: LogLevel::Trace,
        }
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Set the minimum level this sink accepts
    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }
}

impl Default for ConsoleHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for ConsoleHandler {
    fn emit(&mut self, record: &LogRecord) -> Result<()> {
        let line = self.formatter.format(record);
        let line = if self.use_colors {
            line.color(record.level.color_code()).to_string()
        } else {
            line
        };

        // Route Error and Fatal levels to stderr, others to stdout
        match record.level {
            LogLevel::Error | LogLevel::Fatal => eprintln!("{}", line),
            _ => println!("{}", line),
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        use std::io::Write;
        // Flush both stdout and stderr since we write to both
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn level(&self) -> LogLevel {
        self.level
    }

    fn name(&self) -> &str {
        "console"
    }
}
