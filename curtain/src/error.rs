//! Error types for dialog registration and mounting.

use thiserror::Error;

/// Errors raised by the kind registry.
///
/// These indicate misuse by the calling code and are returned immediately,
/// never through a dialog's result channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A kind with this name is already registered.
    #[error("Dialog kind '{0}' is already registered")]
    DuplicateKind(String),

    /// No kind with this name is registered.
    #[error("Dialog kind '{0}' is not registered")]
    UnknownKind(String),

    /// The kind exists but was registered with a different component type.
    #[error("Dialog kind '{name}' is not a '{expected}'")]
    KindMismatch {
        /// The requested kind name.
        name: String,
        /// Type name of the component the caller asked for.
        expected: &'static str,
    },
}

/// The host substrate could not attach a dialog's node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to mount dialog: {message}")]
pub struct MountError {
    /// Human-readable cause reported by the host.
    pub message: String,
}

impl MountError {
    /// Create a mount error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
