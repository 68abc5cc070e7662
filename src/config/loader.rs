//! Configuration loading and application
//!
//! An unreadable file is a recoverable condition and leaves the registry
//! untouched; malformed content is an operator error and surfaces as an
//! `Err`. Application is atomic with respect to the registry: everything is
//! validated and constructed first, then committed under one write lock.

use super::schema::{HandlerSpec, LoggerSpec, LoggingConfig};
use crate::core::error::{LoggerError, Result};
use crate::core::format::Formatter;
use crate::core::handler::Handler;
use crate::core::level::LogLevel;
use crate::core::registry::{LoggerPlan, LoggerRegistry, ROOT_LOGGER};
use crate::handlers::{ConsoleHandler, FileHandler, MemoryHandler};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const SUPPORTED_VERSION: u32 = 1;

/// Outcome of a configuration attempt.
#[derive(Debug)]
pub enum ConfigStatus {
    /// The document was read, validated, and applied.
    Applied,
    /// The file could not be read; the registry was left as it was.
    Unreadable(std::io::Error),
}

/// Read the configuration document at `path` and apply it to `registry`.
pub fn apply_config(registry: &LoggerRegistry, path: &Path) -> Result<ConfigStatus> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => return Ok(ConfigStatus::Unreadable(err)),
    };
    let config: LoggingConfig = serde_json::from_str(&raw)?;
    apply(registry, config)?;
    Ok(ConfigStatus::Applied)
}

/// Apply an already-parsed configuration to `registry`.
pub fn apply(registry: &LoggerRegistry, config: LoggingConfig) -> Result<()> {
    if config.version != SUPPORTED_VERSION {
        return Err(LoggerError::UnsupportedVersion(config.version));
    }

    let formatters = build_formatters(&config);
    let mut handlers = build_handlers(&config, &formatters)?;

    let mut plan = Vec::new();
    if let Some(root) = &config.root {
        plan.push(plan_logger(ROOT_LOGGER, root, &config, &mut handlers)?);
    }
    for (name, spec) in &config.loggers {
        plan.push(plan_logger(name, spec, &config, &mut handlers)?);
    }

    registry.apply_plan(plan);
    Ok(())
}

fn parse_level(raw: &str, component: &str) -> Result<LogLevel> {
    raw.parse()
        .map_err(|message: String| LoggerError::InvalidConfiguration {
            component: component.to_string(),
            message,
        })
}

fn build_formatters(config: &LoggingConfig) -> HashMap<String, Formatter> {
    config
        .formatters
        .iter()
        .map(|(name, spec)| {
            (
                name.clone(),
                Formatter::new(spec.format.clone(), spec.timestamp.clone()),
            )
        })
        .collect()
}

fn build_handlers(
    config: &LoggingConfig,
    formatters: &HashMap<String, Formatter>,
) -> Result<HashMap<String, Box<dyn Handler>>> {
    let mut built: HashMap<String, Box<dyn Handler>> = HashMap::new();

    for (name, spec) in &config.handlers {
        let formatter = match spec.formatter() {
            Some(key) => formatters
                .get(key)
                .cloned()
                .ok_or_else(|| LoggerError::UnknownFormatter {
                    formatter: key.to_string(),
                    handler: name.clone(),
                })?,
            None => Formatter::default(),
        };
        let level = match spec.level() {
            Some(raw) => parse_level(raw, &format!("handler '{}'", name))?,
            None => LogLevel::Trace,
        };

        let handler: Box<dyn Handler> = match spec {
            HandlerSpec::Console { colors, .. } => Box::new(
                ConsoleHandler::new()
                    .with_colors(*colors)
                    .with_formatter(formatter)
                    .with_level(level),
            ),
            HandlerSpec::File { path, .. } => Box::new(
                FileHandler::new(path.clone())?
                    .with_formatter(formatter)
                    .with_level(level),
            ),
            HandlerSpec::Memory { .. } => Box::new(MemoryHandler::new(name).with_level(level)),
        };
        built.insert(name.clone(), handler);
    }

    Ok(built)
}

fn plan_logger(
    name: &str,
    spec: &LoggerSpec,
    config: &LoggingConfig,
    handlers: &mut HashMap<String, Box<dyn Handler>>,
) -> Result<LoggerPlan> {
    let display = if name.is_empty() { "root" } else { name };
    let level = match &spec.level {
        Some(raw) => Some(parse_level(raw, &format!("logger '{}'", display))?),
        None => None,
    };

    let mut attached = Vec::new();
    for key in &spec.handlers {
        // Handlers are singly owned: each configured handler moves into
        // exactly one logger's handler set.
        let handler = handlers.remove(key).ok_or_else(|| {
            if config.handlers.contains_key(key) {
                LoggerError::HandlerReused {
                    handler: key.clone(),
                }
            } else {
                LoggerError::UnknownHandler {
                    handler: key.clone(),
                    logger: display.to_string(),
                }
            }
        })?;
        attached.push(handler);
    }

    Ok(LoggerPlan {
        name: name.to_string(),
        level,
        propagate: spec.propagate,
        handlers: attached,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("logger_config.json");
        let mut file = fs::File::create(&path).expect("Failed to create config file");
        file.write_all(contents.as_bytes())
            .expect("Failed to write config file");
        path
    }

    #[test]
    fn test_missing_file_is_recoverable() {
        let registry = LoggerRegistry::new();
        let status = apply_config(&registry, Path::new("/no/such/config.json")).unwrap();
        assert!(matches!(status, ConfigStatus::Unreadable(_)));
        assert_eq!(registry.handler_count(ROOT_LOGGER), 0);
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "{ not json");
        let registry = LoggerRegistry::new();
        assert!(matches!(
            apply_config(&registry, &path),
            Err(LoggerError::ParseError(_))
        ));
    }

    #[test]
    fn test_wrong_version_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{ "version": 2 }"#);
        let registry = LoggerRegistry::new();
        assert!(matches!(
            apply_config(&registry, &path),
            Err(LoggerError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn test_applies_levels_and_handlers() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{
                "version": 1,
                "handlers": {
                    "loader_applies": { "kind": "memory", "level": "WARNING" }
                },
                "loggers": {
                    "app.db": { "level": "DEBUG" }
                },
                "root": { "level": "DEBUG", "handlers": ["loader_applies"] }
            }"#,
        );
        let registry = LoggerRegistry::new();
        let status = apply_config(&registry, &path).unwrap();
        assert!(matches!(status, ConfigStatus::Applied));

        assert_eq!(registry.effective_level("app.db"), LogLevel::Debug);
        assert_eq!(registry.handler_count(ROOT_LOGGER), 1);
        assert_eq!(registry.handler_names(ROOT_LOGGER), vec!["loader_applies"]);
    }

    #[test]
    fn test_unknown_handler_reference() {
        let registry = LoggerRegistry::new();
        let config: LoggingConfig = serde_json::from_str(
            r#"{ "version": 1, "root": { "handlers": ["ghost"] } }"#,
        )
        .unwrap();
        assert!(matches!(
            apply(&registry, config),
            Err(LoggerError::UnknownHandler { .. })
        ));
    }

    #[test]
    fn test_handler_shared_between_loggers_rejected() {
        let registry = LoggerRegistry::new();
        let config: LoggingConfig = serde_json::from_str(
            r#"{
                "version": 1,
                "handlers": { "shared": { "kind": "memory" } },
                "loggers": { "app": { "handlers": ["shared"] } },
                "root": { "handlers": ["shared"] }
            }"#,
        )
        .unwrap();
        assert!(matches!(
            apply(&registry, config),
            Err(LoggerError::HandlerReused { .. })
        ));
    }

    #[test]
    fn test_unknown_formatter_reference() {
        let registry = LoggerRegistry::new();
        let config: LoggingConfig = serde_json::from_str(
            r#"{
                "version": 1,
                "handlers": { "h": { "kind": "console", "formatter": "ghost" } }
            }"#,
        )
        .unwrap();
        assert!(matches!(
            apply(&registry, config),
            Err(LoggerError::UnknownFormatter { .. })
        ));
    }

    #[test]
    fn test_bad_level_spelling_is_fatal() {
        let registry = LoggerRegistry::new();
        let config: LoggingConfig = serde_json::from_str(
            r#"{ "version": 1, "root": { "level": "verbose" } }"#,
        )
        .unwrap();
        assert!(matches!(
            apply(&registry, config),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }
}
