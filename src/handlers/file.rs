//! File handler implementation

use crate::core::{Formatter, Handler, LogLevel, LogRecord, LoggerError, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

pub struct FileHandler {
    writer: Option<BufWriter<File>>,
    formatter: Formatter,
    level: LogLevel,
}

impl FileHandler {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            formatter: Formatter::default(),
            level: LogLevel::Trace,
        })
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

impl Handler for FileHandler {
    fn emit(&mut self, record: &LogRecord) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("File writer not initialized"))?;

        let mut line = self.formatter.format(record);
        line.push('\n');
        writer.write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn level(&self) -> LogLevel {
        self.level
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileHandler {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.flush();
    }
}
