//! Declarative configuration: schema and loader

pub mod loader;
pub mod schema;

pub use loader::{apply, apply_config, ConfigStatus, SUPPORTED_VERSION};
pub use schema::{FormatterSpec, HandlerSpec, LoggerSpec, LoggingConfig};
