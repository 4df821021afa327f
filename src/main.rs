// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Schemachange Authors

//! # schemachange
//!
//! Database change management tool for Snowflake. Configuration values
//! come from the command line and from schemachange-config.yml, with
//! command-line values winning; connection secrets come from the
//! environment when a session opens.

#![deny(
    nonstandard_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_allocation,
    unused_comparisons,
    unused_parens,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]

use log::{debug, error, LevelFilter};
use serde_json::Value;
use std::env;
use std::process;

use schemachange::commands;
use schemachange::config::{self, CliOptions, Config};
use schemachange::error::SchemachangeError;
use schemachange::output::OutputHandler;
use schemachange::session::SessionSecrets;

#[tokio::main]
async fn main() {
    let cli = match config::parse_cli_args(env::args_os()) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    let output = OutputHandler::new(cli.output, cli.quiet);

    // The config file can raise the log level, so logging starts only
    // after resolution; resolution errors go through the output handler.
    let config = match config::resolve(CliOptions::from(cli.command)) {
        Ok(config) => config,
        Err(e) => {
            let error = SchemachangeError::from(e);
            output.error(&error);
            process::exit(1);
        }
    };

    init_logging(config.log_level(), cli.quiet);
    debug!(
        "Resolved {} configuration; config file at {}",
        config.subcommand_name(),
        config.base().config_file_path.display()
    );

    let secrets = SessionSecrets::from_env();

    let result = execute_command(&config, &secrets, &output).await;

    match result {
        Ok(response) => {
            output.success(response);
        }
        Err(e) => {
            error!("Command failed: {e}");
            output.error(&e);
            process::exit(1);
        }
    }
}

/// Initialize logging at the resolved level
fn init_logging(level: LevelFilter, quiet: bool) {
    if quiet {
        return;
    }

    pretty_env_logger::formatted_builder()
        .filter_level(level)
        .target(pretty_env_logger::env_logger::Target::Stderr)
        .init();
}

/// Execute the given command
async fn execute_command(
    config: &Config,
    secrets: &SessionSecrets,
    output: &OutputHandler,
) -> Result<Value, SchemachangeError> {
    match config {
        Config::Deploy(deploy_config) => {
            commands::deploy::execute(deploy_config, secrets, output).await
        }
        Config::Render(render_config) => {
            commands::render::execute(
                render_config,
                &render_config.script_path,
                output,
            )
            .await
        }
    }
}
