//! Application-level error type.

use crate::auth_client::AuthError;
use crate::config::ConfigError;
use mikecare_core::CareError;
use thiserror::Error;

/// Everything a CLI command or server startup can fail with.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CareError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bad command-line input that clap cannot catch.
    #[error("{0}")]
    Usage(String),
}
