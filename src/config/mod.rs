// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Schemachange Authors

//! Configuration resolution.
//!
//! Options arrive from two places, the command line and an optional YAML
//! config file, and are folded into a single typed [`Config`] in a fixed
//! sequence: locate the file from the config folder, load and normalize
//! it, merge the command line over it, then apply subcommand defaults
//! and folder checks. Connection credentials are deliberately not part
//! of this module; they come from the environment when a session opens.

pub mod change_history;
pub mod cli;
pub mod error;
pub mod file;
pub mod merge;
pub mod types;

pub use change_history::ChangeHistoryTable;
pub use cli::{
    normalize_args, parse_cli_args, Cli, CliCommand, CliOptions, JsonObject,
    SubcommandName,
};
pub use error::ConfigError;
pub use file::FileOptions;
pub use merge::{merge_config_vars, MergedOptions, CONFIG_FILENAME};
pub use types::{BaseConfig, Config, DeployConfig, RenderConfig};

/// Resolve the full configuration for one invocation.
///
/// Command-line values win over file values field by field; template
/// variables merge key by key with the same precedence.
pub fn resolve(cli: CliOptions) -> Result<Config, ConfigError> {
    let config_file_path =
        merge::resolve_config_file_path(cli.config_folder.as_deref())?;
    let file = FileOptions::load(&config_file_path)?;
    let merged = MergedOptions::merge(cli, file, config_file_path);
    Config::from_merged(merged)
}
