// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Schemachange Authors

//! Typed configuration for each subcommand.
//!
//! [`MergedOptions`] is still a loose bag of optional fields; this module
//! turns it into the per-subcommand shapes the commands actually run on,
//! applying defaults and the folder checks that do not depend on a live
//! session.

use std::mem;
use std::path::PathBuf;

use log::LevelFilter;

use crate::config::change_history::ChangeHistoryTable;
use crate::config::cli::JsonObject;
use crate::config::error::ConfigError;
use crate::config::merge::{ensure_directory, MergedOptions};

/// Settings shared by every subcommand.
#[derive(Debug)]
pub struct BaseConfig {
    /// Root folder containing the change scripts
    pub root_folder: PathBuf,
    /// Folder containing script modules, when one was given
    pub modules_folder: Option<PathBuf>,
    /// Where the config file was looked for, whether or not it existed
    pub config_file_path: PathBuf,
    /// Merged template variables
    pub config_vars: JsonObject,
    /// Effective logging level
    pub log_level: LevelFilter,
}

impl BaseConfig {
    fn from_merged(merged: &mut MergedOptions) -> Result<Self, ConfigError> {
        let root_folder = merged
            .root_folder
            .take()
            .unwrap_or_else(|| PathBuf::from("."));
        ensure_directory("root", &root_folder)?;
        let modules_folder = match merged.modules_folder.take() {
            Some(folder) => {
                ensure_directory("modules", &folder)?;
                Some(folder)
            }
            None => None,
        };
        Ok(Self {
            root_folder,
            modules_folder,
            config_file_path: mem::take(&mut merged.config_file_path),
            config_vars: mem::take(&mut merged.config_vars),
            log_level: merged.log_level.unwrap_or(LevelFilter::Info),
        })
    }
}

/// Configuration for `deploy`.
///
/// The connection fields stay optional here. Whether they are actually
/// required is a session concern, checked when the session is opened so
/// that a config file written for one subcommand keeps working with the
/// others.
#[derive(Debug)]
pub struct DeployConfig {
    pub base: BaseConfig,
    pub snowflake_account: Option<String>,
    pub snowflake_user: Option<String>,
    pub snowflake_role: Option<String>,
    pub snowflake_warehouse: Option<String>,
    pub snowflake_database: Option<String>,
    pub snowflake_schema: Option<String>,
    pub change_history_table: ChangeHistoryTable,
    pub create_change_history_table: bool,
    pub autocommit: bool,
    pub dry_run: bool,
    pub query_tag: Option<String>,
    pub oauth_config: Option<JsonObject>,
}

impl DeployConfig {
    fn from_merged(mut merged: MergedOptions) -> Result<Self, ConfigError> {
        let base = BaseConfig::from_merged(&mut merged)?;
        let change_history_table = match merged.change_history_table {
            Some(raw) => raw.parse()?,
            None => ChangeHistoryTable::default(),
        };
        Ok(Self {
            base,
            snowflake_account: merged.snowflake_account,
            snowflake_user: merged.snowflake_user,
            snowflake_role: merged.snowflake_role,
            snowflake_warehouse: merged.snowflake_warehouse,
            snowflake_database: merged.snowflake_database,
            snowflake_schema: merged.snowflake_schema,
            change_history_table,
            create_change_history_table: merged
                .create_change_history_table
                .unwrap_or(false),
            autocommit: merged.autocommit.unwrap_or(false),
            dry_run: merged.dry_run.unwrap_or(false),
            query_tag: merged.query_tag,
            oauth_config: merged.oauth_config,
        })
    }

    /// Names of the connection settings that are required but unset,
    /// in a fixed order so the report is stable.
    pub fn missing_connection_args(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.snowflake_account.is_none() {
            missing.push("snowflake_account");
        }
        if self.snowflake_user.is_none() {
            missing.push("snowflake_user");
        }
        if self.snowflake_role.is_none() {
            missing.push("snowflake_role");
        }
        if self.snowflake_warehouse.is_none() {
            missing.push("snowflake_warehouse");
        }
        missing
    }
}

/// Configuration for `render`.
#[derive(Debug)]
pub struct RenderConfig {
    pub base: BaseConfig,
    /// Script to render, straight from the command line
    pub script_path: PathBuf,
}

impl RenderConfig {
    fn from_merged(mut merged: MergedOptions) -> Result<Self, ConfigError> {
        let base = BaseConfig::from_merged(&mut merged)?;
        let script_path =
            merged.script_path.ok_or(ConfigError::MissingScriptPath)?;
        Ok(Self { base, script_path })
    }
}

/// Fully resolved configuration, tagged by subcommand.
#[derive(Debug)]
pub enum Config {
    Deploy(DeployConfig),
    Render(RenderConfig),
}

impl Config {
    /// Build the typed config for the subcommand recorded in `merged`.
    pub fn from_merged(merged: MergedOptions) -> Result<Self, ConfigError> {
        use crate::config::cli::SubcommandName;
        match merged.subcommand {
            SubcommandName::Deploy => {
                DeployConfig::from_merged(merged).map(Config::Deploy)
            }
            SubcommandName::Render => {
                RenderConfig::from_merged(merged).map(Config::Render)
            }
        }
    }

    /// Settings shared by every subcommand.
    pub fn base(&self) -> &BaseConfig {
        match self {
            Config::Deploy(config) => &config.base,
            Config::Render(config) => &config.base,
        }
    }

    /// Effective logging level.
    pub fn log_level(&self) -> LevelFilter {
        self.base().log_level
    }

    /// Name of the subcommand this config was resolved for.
    pub fn subcommand_name(&self) -> &'static str {
        match self {
            Config::Deploy(_) => "deploy",
            Config::Render(_) => "render",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cli::SubcommandName;
    use serde_json::json;
    use tempfile::tempdir;

    fn deploy_merged() -> MergedOptions {
        MergedOptions {
            subcommand: SubcommandName::Deploy,
            ..Default::default()
        }
    }

    fn expect_deploy(config: Config) -> DeployConfig {
        match config {
            Config::Deploy(config) => config,
            other => panic!("expected deploy config, got {other:?}"),
        }
    }

    #[test]
    fn test_deploy_defaults() {
        let config = expect_deploy(Config::from_merged(deploy_merged()).unwrap());
        assert_eq!(config.base.root_folder, PathBuf::from("."));
        assert!(config.base.modules_folder.is_none());
        assert_eq!(config.base.log_level, LevelFilter::Info);
        assert!(config.snowflake_account.is_none());
        assert_eq!(
            config.change_history_table.to_string(),
            "METADATA.SCHEMACHANGE.CHANGE_HISTORY"
        );
        assert!(!config.create_change_history_table);
        assert!(!config.autocommit);
        assert!(!config.dry_run);
        assert!(config.oauth_config.is_none());
    }

    #[test]
    fn test_missing_root_folder_is_rejected() {
        let merged = MergedOptions {
            root_folder: Some(PathBuf::from("/nonexistent/scripts")),
            ..deploy_merged()
        };
        let error = Config::from_merged(merged).unwrap_err();
        match error {
            ConfigError::FolderNotFound { kind, .. } => {
                assert_eq!(kind, "root")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_modules_folder_is_rejected() {
        let merged = MergedOptions {
            modules_folder: Some(PathBuf::from("/nonexistent/modules")),
            ..deploy_merged()
        };
        let error = Config::from_merged(merged).unwrap_err();
        match error {
            ConfigError::FolderNotFound { kind, .. } => {
                assert_eq!(kind, "modules")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_existing_modules_folder_is_kept() {
        let dir = tempdir().unwrap();
        let merged = MergedOptions {
            modules_folder: Some(dir.path().to_path_buf()),
            ..deploy_merged()
        };
        let config = expect_deploy(Config::from_merged(merged).unwrap());
        assert_eq!(config.base.modules_folder.as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_change_history_table_override() {
        let merged = MergedOptions {
            change_history_table: Some("DB.SCHEMA.TABLE".into()),
            ..deploy_merged()
        };
        let config = expect_deploy(Config::from_merged(merged).unwrap());
        assert_eq!(config.change_history_table.to_string(), "DB.SCHEMA.TABLE");
    }

    #[test]
    fn test_bad_change_history_table_is_rejected() {
        let merged = MergedOptions {
            change_history_table: Some("a.b.c.d".into()),
            ..deploy_merged()
        };
        let error = Config::from_merged(merged).unwrap_err();
        assert!(matches!(
            error,
            ConfigError::InvalidChangeHistoryTable(_)
        ));
    }

    #[test]
    fn test_config_vars_carry_over() {
        let mut vars = JsonObject::new();
        vars.insert("var1".into(), json!("val"));
        let merged = MergedOptions {
            config_vars: vars,
            ..deploy_merged()
        };
        let config = expect_deploy(Config::from_merged(merged).unwrap());
        assert_eq!(config.base.config_vars.get("var1"), Some(&json!("val")));
    }

    #[test]
    fn test_render_requires_a_script() {
        let merged = MergedOptions {
            subcommand: SubcommandName::Render,
            ..Default::default()
        };
        let error = Config::from_merged(merged).unwrap_err();
        assert!(matches!(error, ConfigError::MissingScriptPath));
    }

    #[test]
    fn test_render_keeps_script_and_ignores_deploy_fields() {
        let merged = MergedOptions {
            subcommand: SubcommandName::Render,
            script_path: Some(PathBuf::from("V1.0.0__init.sql")),
            snowflake_account: Some("unused".into()),
            ..Default::default()
        };
        let config = Config::from_merged(merged).unwrap();
        match &config {
            Config::Render(render) => {
                assert_eq!(
                    render.script_path,
                    PathBuf::from("V1.0.0__init.sql")
                );
            }
            other => panic!("expected render config, got {other:?}"),
        }
        assert_eq!(config.subcommand_name(), "render");
    }

    #[test]
    fn test_missing_connection_args_in_order() {
        let config = expect_deploy(Config::from_merged(deploy_merged()).unwrap());
        assert_eq!(
            config.missing_connection_args(),
            vec![
                "snowflake_account",
                "snowflake_user",
                "snowflake_role",
                "snowflake_warehouse"
            ]
        );

        let merged = MergedOptions {
            snowflake_account: Some("acct".into()),
            snowflake_role: Some("role".into()),
            ..deploy_merged()
        };
        let config = expect_deploy(Config::from_merged(merged).unwrap());
        assert_eq!(
            config.missing_connection_args(),
            vec!["snowflake_user", "snowflake_warehouse"]
        );
    }

    #[test]
    fn test_log_level_from_merged_options() {
        let merged = MergedOptions {
            log_level: Some(LevelFilter::Debug),
            ..deploy_merged()
        };
        let config = Config::from_merged(merged).unwrap();
        assert_eq!(config.log_level(), LevelFilter::Debug);
    }
}
