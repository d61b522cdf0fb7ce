//! Shared primitives used across DomKit crates.

use thiserror::Error;

/// Result alias used across the workspace.
pub type KitResult<T> = Result<T, KitError>;

/// Precondition violations raised by the builder and the host document.
///
/// Nothing in DomKit performs I/O, so every error is a programmer-facing
/// failure: the operation is aborted and never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KitError {
    /// Missing or invalid host anchor, bad builder configuration.
    #[error("{code}: {message}")]
    Configuration { code: &'static str, message: String },
    /// A value was used where the contract does not allow it.
    #[error("{code}: {message}")]
    Usage { code: &'static str, message: String },
}

impl KitError {
    pub fn configuration(code: &'static str, message: impl Into<String>) -> Self {
        Self::Configuration {
            code,
            message: message.into(),
        }
    }

    pub fn usage(code: &'static str, message: impl Into<String>) -> Self {
        Self::Usage {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration { code, .. } | Self::Usage { code, .. } => code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Configuration { message, .. } | Self::Usage { message, .. } => message,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage { .. })
    }
}
