// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Schemachange Authors

//! Error types for configuration resolution.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving the runtime configuration.
///
/// All of these are fatal; resolution never degrades a failure to a
/// warning. The folder variants are reported before any file is read.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A folder named in the configuration does not exist or is not a
    /// directory. `kind` says which setting pointed at it.
    #[error("Invalid {kind} folder: {}", path.display())]
    FolderNotFound {
        /// Which folder setting failed ("config", "root", "modules")
        kind: &'static str,
        /// The offending path
        path: PathBuf,
    },

    /// The config file exists but could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    ReadFile {
        /// Path of the file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The config file exists but is not usable YAML.
    #[error("Failed to parse config file {}: {source}", path.display())]
    ParseFile {
        /// Path of the file
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: serde_yaml::Error,
    },

    /// The config file parsed, but its top level is not a mapping.
    #[error("Invalid config file {}: the top level must be a mapping", path.display())]
    NotAMapping {
        /// Path of the file
        path: PathBuf,
    },

    /// A change history table override that cannot be split into
    /// database, schema, and table parts.
    #[error("Invalid change history table name: {0:?}")]
    InvalidChangeHistoryTable(String),

    /// Render was requested without a script to render.
    #[error("The render subcommand requires a script path")]
    MissingScriptPath,
}
