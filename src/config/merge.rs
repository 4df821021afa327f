// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Schemachange Authors

//! Merging command-line options with the config file.
//!
//! The merge is field-wise: a value given on the command line wins over
//! the file, and the file wins over nothing. Template variables are the
//! one exception, where both sources contribute and the command line
//! overrides on a per-key basis.

use std::path::{Path, PathBuf};

use log::LevelFilter;

use crate::config::cli::{CliOptions, JsonObject, SubcommandName};
use crate::config::error::ConfigError;
use crate::config::file::FileOptions;

/// Name of the config file inside the config folder.
pub const CONFIG_FILENAME: &str = "schemachange-config.yml";

/// Resolve the full path of the config file.
///
/// The config folder defaults to the current directory and must exist,
/// even though the file inside it is optional.
pub fn resolve_config_file_path(
    config_folder: Option<&Path>,
) -> Result<PathBuf, ConfigError> {
    let folder = config_folder.unwrap_or_else(|| Path::new("."));
    ensure_directory("config", folder)?;
    Ok(folder.join(CONFIG_FILENAME))
}

/// Check that `path` is an existing directory.
pub(crate) fn ensure_directory(
    kind: &'static str,
    path: &Path,
) -> Result<(), ConfigError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(ConfigError::FolderNotFound {
            kind,
            path: path.to_path_buf(),
        })
    }
}

/// The combined option set after the command line and the file have been
/// merged, still untyped with respect to the subcommand.
#[derive(Debug, Default)]
pub struct MergedOptions {
    pub subcommand: SubcommandName,
    pub config_file_path: PathBuf,
    pub config_vars: JsonObject,
    pub root_folder: Option<PathBuf>,
    pub modules_folder: Option<PathBuf>,
    pub log_level: Option<LevelFilter>,
    pub snowflake_account: Option<String>,
    pub snowflake_user: Option<String>,
    pub snowflake_role: Option<String>,
    pub snowflake_warehouse: Option<String>,
    pub snowflake_database: Option<String>,
    pub snowflake_schema: Option<String>,
    pub change_history_table: Option<String>,
    pub create_change_history_table: Option<bool>,
    pub autocommit: Option<bool>,
    pub dry_run: Option<bool>,
    pub query_tag: Option<String>,
    pub oauth_config: Option<JsonObject>,
    pub script_path: Option<PathBuf>,
}

impl MergedOptions {
    /// Merge command-line options over file options.
    ///
    /// The config folder itself never appears in the result; it has
    /// already been consumed to locate the file.
    pub fn merge(
        cli: CliOptions,
        file: FileOptions,
        config_file_path: PathBuf,
    ) -> Self {
        Self {
            subcommand: cli.subcommand,
            config_file_path,
            config_vars: merge_config_vars(file.config_vars, cli.config_vars),
            root_folder: cli.root_folder.or(file.root_folder),
            modules_folder: cli.modules_folder.or(file.modules_folder),
            log_level: cli.log_level.or(file.log_level),
            snowflake_account: cli.snowflake_account.or(file.snowflake_account),
            snowflake_user: cli.snowflake_user.or(file.snowflake_user),
            snowflake_role: cli.snowflake_role.or(file.snowflake_role),
            snowflake_warehouse: cli
                .snowflake_warehouse
                .or(file.snowflake_warehouse),
            snowflake_database: cli
                .snowflake_database
                .or(file.snowflake_database),
            snowflake_schema: cli.snowflake_schema.or(file.snowflake_schema),
            change_history_table: cli
                .change_history_table
                .or(file.change_history_table),
            create_change_history_table: cli
                .create_change_history_table
                .or(file.create_change_history_table),
            autocommit: cli.autocommit.or(file.autocommit),
            dry_run: cli.dry_run.or(file.dry_run),
            query_tag: cli.query_tag.or(file.query_tag),
            oauth_config: cli.oauth_config.or(file.oauth_config),
            script_path: cli.script_path,
        }
    }
}

/// Combine template variables from both sources.
///
/// File variables form the base; command-line variables are laid on top
/// key by key, so a key present in both takes its command-line value.
pub fn merge_config_vars(
    file_vars: Option<JsonObject>,
    cli_vars: Option<JsonObject>,
) -> JsonObject {
    let mut merged = file_vars.unwrap_or_default();
    if let Some(cli_vars) = cli_vars {
        for (key, value) in cli_vars {
            merged.insert(key, value);
        }
    }
    merged
}
