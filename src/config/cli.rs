// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Schemachange Authors

//! Command-line surface for schemachange.
//!
//! Two subcommands exist, `deploy` and `render`, with `deploy` acting as
//! the implicit default: when the first token on the command line is
//! neither subcommand (nor a help/version flag), `deploy` is inserted
//! before parsing, so `schemachange --snowflake-account x` behaves like
//! `schemachange deploy --snowflake-account x`.
//!
//! Parsed arguments are converted into [`CliOptions`], an all-`Option`
//! record in which `None` means "not supplied on the command line". That
//! distinction drives the merge with the config file: an option the user
//! did not type must never shadow a file value, including boolean flags.

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use serde_json::{Map, Value};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::output::Format;

/// A JSON object as parsed from `--vars` or `--oauth-config`.
pub type JsonObject = Map<String, Value>;

/// Database change management tool for Snowflake
#[derive(Parser, Debug)]
#[command(
    name = "schemachange",
    version,
    about = "Database change management tool for Snowflake",
    long_about = "schemachange applies versioned, repeatable, and always scripts \
                  to a Snowflake account. Configuration values may come from the \
                  command line or from schemachange-config.yml; command-line \
                  values win wherever both are given."
)]
pub struct Cli {
    /// Output format for command results
    #[arg(
        short = 'o',
        long,
        value_enum,
        default_value = "text",
        global = true
    )]
    pub output: Format,

    /// Suppress progress messages
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Apply change scripts (the default when no subcommand is named)
    Deploy(DeployArgs),
    /// Render a single script without applying anything
    Render(RenderArgs),
}

/// Options shared by every subcommand
#[derive(Args, Debug, Default)]
pub struct SharedArgs {
    /// Folder containing schemachange-config.yml [default: .]
    #[arg(long, value_name = "PATH")]
    pub config_folder: Option<PathBuf>,

    /// Root folder containing the change scripts [default: .]
    #[arg(short = 'f', long, value_name = "PATH")]
    pub root_folder: Option<PathBuf>,

    /// Folder containing script modules
    #[arg(short = 'm', long, value_name = "PATH")]
    pub modules_folder: Option<PathBuf>,

    /// Template variables as a JSON object string
    #[arg(long, value_name = "JSON", value_parser = parse_json_object)]
    pub vars: Option<JsonObject>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Options for the deploy subcommand
#[derive(Args, Debug, Default)]
pub struct DeployArgs {
    #[command(flatten)]
    pub shared: SharedArgs,

    /// Snowflake account name
    #[arg(short = 'a', long, value_name = "ACCOUNT")]
    pub snowflake_account: Option<String>,

    /// Snowflake user name
    #[arg(short = 'u', long, value_name = "USER")]
    pub snowflake_user: Option<String>,

    /// Snowflake role
    #[arg(short = 'r', long, value_name = "ROLE")]
    pub snowflake_role: Option<String>,

    /// Snowflake warehouse
    #[arg(short = 'w', long, value_name = "WAREHOUSE")]
    pub snowflake_warehouse: Option<String>,

    /// Default database
    #[arg(short = 'd', long, value_name = "DATABASE")]
    pub snowflake_database: Option<String>,

    /// Default schema
    #[arg(short = 's', long, value_name = "SCHEMA")]
    pub snowflake_schema: Option<String>,

    /// Change history table override (database.schema.table)
    #[arg(short = 'c', long, value_name = "TABLE")]
    pub change_history_table: Option<String>,

    /// Create the change history schema and table if missing
    #[arg(long)]
    pub create_change_history_table: bool,

    /// Enable autocommit for DML commands
    #[arg(long)]
    pub autocommit: bool,

    /// Run the whole deployment without applying any changes
    #[arg(long)]
    pub dry_run: bool,

    /// Query tag attached to every session query
    #[arg(long, value_name = "TAG")]
    pub query_tag: Option<String>,

    /// OAuth token request settings as a JSON object string
    #[arg(long, value_name = "JSON", value_parser = parse_json_object)]
    pub oauth_config: Option<JsonObject>,
}

/// Options for the render subcommand
#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub shared: SharedArgs,

    /// Path of the script to render
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,
}

/// Which subcommand a run was invoked with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubcommandName {
    /// Apply change scripts
    #[default]
    Deploy,
    /// Render a single script
    Render,
}

impl SubcommandName {
    /// Stable lowercase name, as used in output and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubcommandName::Deploy => "deploy",
            SubcommandName::Render => "render",
        }
    }
}

/// Options gathered from the command line, with unset values preserved.
///
/// Boolean flags become `Some(true)` only when actually given; everything
/// else is `None` so the merge can tell "not supplied" apart from any
/// real value. `--verbose` is already translated to its logging level
/// here, the way the resolved configuration carries it.
#[derive(Debug, Default)]
pub struct CliOptions {
    /// Subcommand the options belong to
    pub subcommand: SubcommandName,
    /// Folder to look for the config file in
    pub config_folder: Option<PathBuf>,
    /// Root folder containing change scripts
    pub root_folder: Option<PathBuf>,
    /// Folder containing script modules
    pub modules_folder: Option<PathBuf>,
    /// Template variables from `--vars`
    pub config_vars: Option<JsonObject>,
    /// Logging level implied by `--verbose`
    pub log_level: Option<LevelFilter>,
    /// Snowflake account name
    pub snowflake_account: Option<String>,
    /// Snowflake user name
    pub snowflake_user: Option<String>,
    /// Snowflake role
    pub snowflake_role: Option<String>,
    /// Snowflake warehouse
    pub snowflake_warehouse: Option<String>,
    /// Default database
    pub snowflake_database: Option<String>,
    /// Default schema
    pub snowflake_schema: Option<String>,
    /// Change history table override
    pub change_history_table: Option<String>,
    /// Create the change history table if missing
    pub create_change_history_table: Option<bool>,
    /// Enable autocommit
    pub autocommit: Option<bool>,
    /// Run without applying changes
    pub dry_run: Option<bool>,
    /// Query tag
    pub query_tag: Option<String>,
    /// OAuth token request settings
    pub oauth_config: Option<JsonObject>,
    /// Script path (render only)
    pub script_path: Option<PathBuf>,
}

impl CliOptions {
    fn from_shared(subcommand: SubcommandName, shared: SharedArgs) -> Self {
        Self {
            subcommand,
            config_folder: shared.config_folder,
            root_folder: shared.root_folder,
            modules_folder: shared.modules_folder,
            config_vars: shared.vars,
            log_level: shared.verbose.then_some(LevelFilter::Debug),
            ..Self::default()
        }
    }
}

impl From<CliCommand> for CliOptions {
    fn from(command: CliCommand) -> Self {
        match command {
            CliCommand::Deploy(args) => {
                let mut options =
                    Self::from_shared(SubcommandName::Deploy, args.shared);
                options.snowflake_account = args.snowflake_account;
                options.snowflake_user = args.snowflake_user;
                options.snowflake_role = args.snowflake_role;
                options.snowflake_warehouse = args.snowflake_warehouse;
                options.snowflake_database = args.snowflake_database;
                options.snowflake_schema = args.snowflake_schema;
                options.change_history_table = args.change_history_table;
                options.create_change_history_table =
                    args.create_change_history_table.then_some(true);
                options.autocommit = args.autocommit.then_some(true);
                options.dry_run = args.dry_run.then_some(true);
                options.query_tag = args.query_tag;
                options.oauth_config = args.oauth_config;
                options
            }
            CliCommand::Render(args) => {
                let mut options =
                    Self::from_shared(SubcommandName::Render, args.shared);
                options.script_path = Some(args.script);
                options
            }
        }
    }
}

/// Tokens that must not trigger the implicit default subcommand.
const PASSTHROUGH_TOKENS: [&str; 7] =
    ["deploy", "render", "help", "-h", "--help", "-V", "--version"];

/// Insert the implicit `deploy` subcommand when the first token names
/// neither a subcommand nor a help/version flag.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut argv: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let needs_default = match argv.get(1) {
        None => true,
        Some(first) => match first.to_str() {
            Some(token) => !PASSTHROUGH_TOKENS.contains(&token),
            None => true,
        },
    };
    if needs_default {
        argv.insert(1.min(argv.len()), OsString::from("deploy"));
    }
    argv
}

/// Parse command-line tokens, applying the implicit default subcommand.
pub fn parse_cli_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    Cli::try_parse_from(normalize_args(args))
}

/// Value parser for `--vars` and `--oauth-config`: the value must be a
/// JSON object, and the raw string is echoed back on failure.
fn parse_json_object(raw: &str) -> Result<JsonObject, String> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| format!("invalid JSON ({e}): {raw}"))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(format!("expected a JSON object, got: {raw}")),
    }
}
