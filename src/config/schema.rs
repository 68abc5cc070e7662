//! Declarative logging configuration schema
//!
//! The document is a JSON mapping of `version`, `formatters`, `handlers`,
//! `loggers`, and `root`. Handler entries are tagged by `kind` and name the
//! sink's construction parameters; logger entries reference handlers by name.

use crate::core::format::{TimestampFormat, DEFAULT_TEMPLATE};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

fn default_true() -> bool {
    true
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    pub version: u32,
    #[serde(default)]
    pub formatters: HashMap<String, FormatterSpec>,
    #[serde(default)]
    pub handlers: HashMap<String, HandlerSpec>,
    #[serde(default)]
    pub loggers: HashMap<String, LoggerSpec>,
    pub root: Option<LoggerSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatterSpec {
    #[serde(default = "default_template")]
    pub format: String,
    #[serde(default)]
    pub timestamp: TimestampFormat,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum HandlerSpec {
    Console {
        level: Option<String>,
        formatter: Option<String>,
        #[serde(default = "default_true")]
        colors: bool,
    },
    File {
        path: PathBuf,
        level: Option<String>,
        formatter: Option<String>,
    },
    Memory {
        level: Option<String>,
    },
}

impl HandlerSpec {
    pub fn level(&self) -> Option<&str> {
        match self {
            HandlerSpec::Console { level, .. }
            | HandlerSpec::File { level, .. }
            | HandlerSpec::Memory { level } => level.as_deref(),
        }
    }

    pub fn formatter(&self) -> Option<&str> {
        match self {
            HandlerSpec::Console { formatter, .. } | HandlerSpec::File { formatter, .. } => {
                formatter.as_deref()
            }
            HandlerSpec::Memory { .. } => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggerSpec {
    pub level: Option<String>,
    #[serde(default)]
    pub handlers: Vec<String>,
    #[serde(default = "default_true")]
    pub propagate: bool,
}
