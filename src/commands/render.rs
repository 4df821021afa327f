// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Schemachange Authors

//! Render command for schemachange
//!
//! Render inspects a single script without opening a session, so it
//! needs no connection settings or credentials. The summary carries the
//! full set of template variables because seeing them resolved is what
//! the command is for.

use log::debug;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

use crate::config::RenderConfig;
use crate::error::{ErrorContext, SchemachangeError};
use crate::output::OutputHandler;

/// Execute the render command
///
/// The script path is passed explicitly rather than read back off the
/// config; the config contributes the shared fields of the summary.
pub async fn execute(
    config: &RenderConfig,
    script_path: &Path,
    output: &OutputHandler,
) -> Result<Value, SchemachangeError> {
    output.info(format!("Rendering script {}", script_path.display()));

    if !script_path.is_file() {
        return Err(SchemachangeError::ScriptNotFound(
            script_path.to_path_buf(),
        ));
    }
    let contents = fs::read_to_string(script_path).with_context(|| {
        format!("Failed to read script {}", script_path.display())
    })?;
    debug!(
        "Loaded script {}: {} bytes",
        script_path.display(),
        contents.len()
    );

    Ok(json!({
        "status": "success",
        "subcommand": "render",
        "script_path": script_path.display().to_string(),
        "script_bytes": contents.len(),
        "root_folder": config.base.root_folder.display().to_string(),
        "modules_folder": config
            .base
            .modules_folder
            .as_ref()
            .map(|path| path.display().to_string()),
        "config_file_path": config.base.config_file_path.display().to_string(),
        "config_vars": config.base.config_vars,
    }))
}
