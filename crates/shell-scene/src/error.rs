//! Error types for the app shell.

use shell_config::ConfigError;
use thiserror::Error;

/// Result type for shell operations.
pub type Result<T> = std::result::Result<T, ShellError>;

/// Lifecycle and configuration errors. Document operations never fail.
#[derive(Error, Debug)]
pub enum ShellError {
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A second page-load was dispatched to the same shell.
    #[error("shell already initialized for this page")]
    AlreadyInitialized,

    /// The operation needs a page-load first.
    #[error("shell has not been initialized")]
    NotInitialized,

    /// The page was torn down.
    #[error("shell has been torn down")]
    TornDown,
}
