// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Schemachange Authors

//! Integration tests for the full configuration pipeline: command line
//! plus config file, through normalization and merging, down to typed
//! per-subcommand configs.

use log::LevelFilter;
use schemachange::config::{
    self, parse_cli_args, CliOptions, Config, ConfigError, DeployConfig,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn resolve_args(args: &[&str]) -> Result<Config, ConfigError> {
    let cli =
        parse_cli_args(args.iter().copied()).expect("arguments should parse");
    config::resolve(CliOptions::from(cli.command))
}

fn expect_deploy(config: Config) -> DeployConfig {
    match config {
        Config::Deploy(config) => config,
        other => panic!("expected deploy config, got {other:?}"),
    }
}

/// Write a config file into a fresh folder and return the folder.
fn config_folder_with(contents: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("schemachange-config.yml"), contents)
        .unwrap();
    dir
}

#[test]
fn test_bare_invocation_resolves_to_deploy_defaults() {
    let config = expect_deploy(resolve_args(&["schemachange"]).unwrap());

    assert_eq!(config.base.root_folder, PathBuf::from("."));
    assert!(config.base.modules_folder.is_none());
    assert_eq!(
        config.base.config_file_path,
        Path::new(".").join("schemachange-config.yml")
    );
    assert!(config.base.config_vars.is_empty());
    assert_eq!(config.base.log_level, LevelFilter::Info);
    assert!(config.snowflake_account.is_none());
    assert_eq!(
        config.change_history_table.to_string(),
        "METADATA.SCHEMACHANGE.CHANGE_HISTORY"
    );
    assert!(!config.create_change_history_table);
    assert!(!config.autocommit);
    assert!(!config.dry_run);
    assert!(config.query_tag.is_none());
    assert!(config.oauth_config.is_none());
}

#[test]
fn test_full_command_line_resolves_without_a_config_file() {
    let config = expect_deploy(
        resolve_args(&[
            "schemachange",
            "deploy",
            "-a",
            "acct",
            "-u",
            "user",
            "-r",
            "role",
            "-w",
            "wh",
            "-d",
            "db",
            "-s",
            "schema",
            "-c",
            "DB.SC.HISTORY",
            "--create-change-history-table",
            "--autocommit",
            "--dry-run",
            "--query-tag",
            "rel-42",
            "--vars",
            r#"{"var1": "val"}"#,
        ])
        .unwrap(),
    );

    assert_eq!(config.snowflake_account.as_deref(), Some("acct"));
    assert_eq!(config.snowflake_schema.as_deref(), Some("schema"));
    assert_eq!(config.change_history_table.to_string(), "DB.SC.HISTORY");
    assert!(config.create_change_history_table);
    assert!(config.autocommit);
    assert!(config.dry_run);
    assert_eq!(config.query_tag.as_deref(), Some("rel-42"));
    assert_eq!(config.base.config_vars.get("var1"), Some(&json!("val")));
}

#[test]
fn test_command_line_wins_over_config_file_per_field() {
    let dir = config_folder_with(concat!(
        "snowflake-account: yaml_acct\n",
        "snowflake-role: yaml_role\n",
    ));
    let config = expect_deploy(
        resolve_args(&[
            "schemachange",
            "deploy",
            "--config-folder",
            dir.path().to_str().unwrap(),
            "-a",
            "cli_acct",
        ])
        .unwrap(),
    );

    assert_eq!(config.snowflake_account.as_deref(), Some("cli_acct"));
    assert_eq!(config.snowflake_role.as_deref(), Some("yaml_role"));
    assert_eq!(
        config.base.config_file_path,
        dir.path().join("schemachange-config.yml")
    );
}

#[test]
fn test_vars_merge_key_by_key_with_command_line_priority() {
    let dir = config_folder_with("vars:\n  a: \"0\"\n  b: \"2\"\n");
    let config = expect_deploy(
        resolve_args(&[
            "schemachange",
            "deploy",
            "--config-folder",
            dir.path().to_str().unwrap(),
            "--vars",
            r#"{"a": "1"}"#,
        ])
        .unwrap(),
    );

    assert_eq!(config.base.config_vars.get("a"), Some(&json!("1")));
    assert_eq!(config.base.config_vars.get("b"), Some(&json!("2")));
}

#[test]
fn test_verbose_sources_set_the_log_level() {
    let config =
        resolve_args(&["schemachange", "deploy", "--verbose"]).unwrap();
    assert_eq!(config.log_level(), LevelFilter::Debug);

    let dir = config_folder_with("verbose: true\n");
    let config = resolve_args(&[
        "schemachange",
        "deploy",
        "--config-folder",
        dir.path().to_str().unwrap(),
    ])
    .unwrap();
    assert_eq!(config.log_level(), LevelFilter::Debug);

    let dir = config_folder_with("verbose: false\n");
    let config = resolve_args(&[
        "schemachange",
        "deploy",
        "--config-folder",
        dir.path().to_str().unwrap(),
    ])
    .unwrap();
    assert_eq!(config.log_level(), LevelFilter::Info);
}

#[test]
fn test_change_history_table_flows_from_the_config_file() {
    let dir = config_folder_with("change-history-table: SC.HISTORY\n");
    let config = expect_deploy(
        resolve_args(&[
            "schemachange",
            "deploy",
            "--config-folder",
            dir.path().to_str().unwrap(),
        ])
        .unwrap(),
    );

    // A two-part name fills schema and table; the database defaults.
    assert_eq!(
        config.change_history_table.to_string(),
        "METADATA.SC.HISTORY"
    );
}

#[test]
fn test_invalid_change_history_table_is_rejected() {
    let error = resolve_args(&[
        "schemachange",
        "deploy",
        "-c",
        "too.many.dotted.parts",
    ])
    .unwrap_err();
    assert!(matches!(error, ConfigError::InvalidChangeHistoryTable(_)));
    assert!(
        error.to_string().contains("too.many.dotted.parts"),
        "got: {error}"
    );
}

#[test]
fn test_missing_config_folder_is_rejected() {
    let error = resolve_args(&[
        "schemachange",
        "deploy",
        "--config-folder",
        "/nonexistent/config",
    ])
    .unwrap_err();
    match error {
        ConfigError::FolderNotFound { kind, path } => {
            assert_eq!(kind, "config");
            assert_eq!(path, PathBuf::from("/nonexistent/config"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_modules_folder_is_rejected() {
    let error = resolve_args(&[
        "schemachange",
        "deploy",
        "--modules-folder",
        "/nonexistent/modules",
    ])
    .unwrap_err();
    match error {
        ConfigError::FolderNotFound { kind, .. } => {
            assert_eq!(kind, "modules")
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_existing_modules_folder_resolves() {
    let dir = tempfile::tempdir().unwrap();
    let config = expect_deploy(
        resolve_args(&[
            "schemachange",
            "deploy",
            "--modules-folder",
            dir.path().to_str().unwrap(),
        ])
        .unwrap(),
    );
    assert_eq!(config.base.modules_folder.as_deref(), Some(dir.path()));
}

#[test]
fn test_render_accepts_a_config_file_written_for_deploy() {
    let dir = config_folder_with(concat!(
        "snowflake-account: acct\n",
        "snowflake-warehouse: wh\n",
        "vars:\n  var1: val\n",
    ));
    let config = resolve_args(&[
        "schemachange",
        "render",
        "--config-folder",
        dir.path().to_str().unwrap(),
        "V1.0.0__init.sql",
    ])
    .unwrap();

    match config {
        Config::Render(render) => {
            assert_eq!(render.script_path, PathBuf::from("V1.0.0__init.sql"));
            assert_eq!(
                render.base.config_vars.get("var1"),
                Some(&json!("val"))
            );
        }
        other => panic!("expected render config, got {other:?}"),
    }
}

#[test]
fn test_oauth_config_block_keeps_its_inner_spelling() {
    let dir = config_folder_with(concat!(
        "oauthconfig:\n",
        "  token-provider-url: https://example.test/token\n",
        "  token-request-headers:\n",
        "    Content-Type: application/x-www-form-urlencoded\n",
        "  token-request-payload:\n",
        "    grant_type: client_credentials\n",
        "  token-response-name: access_token\n",
    ));
    let config = expect_deploy(
        resolve_args(&[
            "schemachange",
            "deploy",
            "--config-folder",
            dir.path().to_str().unwrap(),
        ])
        .unwrap(),
    );

    let oauth = config.oauth_config.expect("oauth config should resolve");
    assert_eq!(
        oauth.get("token-provider-url"),
        Some(&json!("https://example.test/token"))
    );
    assert_eq!(
        oauth["token-request-payload"]["grant_type"],
        json!("client_credentials")
    );
}

#[test]
fn test_command_line_oauth_config_wins_over_the_file() {
    let dir = config_folder_with(concat!(
        "oauthconfig:\n",
        "  token-provider-url: https://file.test/token\n",
    ));
    let config = expect_deploy(
        resolve_args(&[
            "schemachange",
            "deploy",
            "--config-folder",
            dir.path().to_str().unwrap(),
            "--oauth-config",
            r#"{"token-provider-url": "https://cli.test/token"}"#,
        ])
        .unwrap(),
    );

    let oauth = config.oauth_config.expect("oauth config should resolve");
    assert_eq!(
        oauth.get("token-provider-url"),
        Some(&json!("https://cli.test/token"))
    );
}
