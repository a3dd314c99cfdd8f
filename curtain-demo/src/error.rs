//! Demo error type.

use curtain::RegistryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Unknown log level '{0}'")]
    LogLevel(String),

    #[error("Failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
