// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Schemachange Authors

//! Error handling for schemachange.
//!
//! One aggregate error type wraps the per-module errors so the binary
//! has a single thing to print, with a stable machine-readable code and
//! a JSON rendering for `--output json`.

use serde_json::{json, Value};
use thiserror::Error;

use crate::config::ConfigError;
use crate::session::SessionError;

/// Any error schemachange can exit with.
#[derive(Error, Debug)]
pub enum SchemachangeError {
    /// Configuration could not be resolved
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The session could not be opened
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// A script named on the command line does not exist
    #[error("Script file not found: {}", .0.display())]
    ScriptNotFound(std::path::PathBuf),

    /// IO error outside the config and session layers
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic wrapped error with context
    #[error("Error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl SchemachangeError {
    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            SchemachangeError::Config(_) => "CONFIG_ERROR",
            SchemachangeError::Session(_) => "SESSION_ERROR",
            SchemachangeError::ScriptNotFound(_) => "SCRIPT_NOT_FOUND",
            SchemachangeError::Io(_) => "IO_ERROR",
            SchemachangeError::Json(_) => "JSON_ERROR",
            SchemachangeError::Generic(_) => "GENERIC_ERROR",
        }
    }

    /// JSON rendering for `--output json`.
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "details": self.error_details(),
            }
        })
    }

    /// Structured details, where an error carries any.
    fn error_details(&self) -> Value {
        match self {
            SchemachangeError::ScriptNotFound(path) => json!({
                "script_path": path.display().to_string(),
            }),
            SchemachangeError::Session(
                SessionError::MissingConnectionArgs(missing),
            ) => json!({
                "missing_config_values": missing,
            }),
            _ => Value::Null,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SchemachangeError>;

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Add lazily-evaluated context to an error.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Into<String>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let wrapped = anyhow::Error::new(e).context(f());
            SchemachangeError::Generic(wrapped)
        })
    }

    fn context<C>(self, context: C) -> Result<T>
    where
        C: Into<String>,
    {
        self.map_err(|e| {
            let wrapped = anyhow::Error::new(e).context(context.into());
            SchemachangeError::Generic(wrapped)
        })
    }
}
