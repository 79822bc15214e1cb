//! # App Error Type
//!
//! Unified error type for the smartcart binary.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  config load ── toml / io ───────────┐                                 │
//! │  script load ── io / serde_json ─────┤                                 │
//! │  session ────── UnknownSession ──────┤                                 │
//! │  quote ──────── CoreError ───────────┼──► AppError ──► stderr + exit   │
//! │  arguments ──── InvalidArgument ─────┘                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rejected intents inside a replay script are *not* errors: they are logged
//! and skipped, like any other rejected storefront click.

use std::path::PathBuf;

use smartcart_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration is present but invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Config file is not valid TOML for `CliConfig`.
    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// A file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A replay script is not valid JSON, or output could not be encoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A session name that no intent ever touched.
    #[error("Unknown session: {0}")]
    UnknownSession(String),

    /// A command-line value could not be interpreted.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Pricing or catalog failure.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl AppError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code: 2 for configuration and usage problems, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) | AppError::Toml(_) | AppError::InvalidArgument(_) => 2,
            AppError::Io { .. }
            | AppError::Json(_)
            | AppError::UnknownSession(_)
            | AppError::Core(_) => 1,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
