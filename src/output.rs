// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Schemachange Authors

//! Output formatting and handling for schemachange
//!
//! Command results go to stdout, in plain text or pretty-printed JSON,
//! so they can be piped and scripted. Progress and informational
//! messages go to stderr and are suppressed in quiet mode.

use crate::error::SchemachangeError;
use log::info;
use serde_json::Value;

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Human-readable key/value lines
    Text,
    /// JSON output - structured data suitable for machine processing
    Json,
}

/// Output handler for formatting and displaying results
///
/// All result output flows through one handler so the stdout/stderr
/// split stays consistent: results on stdout, everything else on
/// stderr, and quiet mode silences the stderr side only.
#[derive(Debug)]
pub struct OutputHandler {
    format: Format,
    quiet: bool,
}

impl OutputHandler {
    /// Create a new output handler
    ///
    /// # Arguments
    ///
    /// * `format` - The output format to use
    /// * `quiet` - Whether to suppress non-essential output
    pub fn new(format: Format, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// Output a successful result to stdout
    pub fn success(&self, value: Value) {
        let output = match self.format {
            Format::Json => self.format_json(value),
            Format::Text => self.format_text(value),
        };

        println!("{output}");
    }

    /// Output an error
    ///
    /// JSON errors go to stdout so scripted callers always read one JSON
    /// document; human-readable errors go to stderr.
    pub fn error(&self, error: &SchemachangeError) {
        let error_json = error.to_json();

        match self.format {
            Format::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&error_json)
                        .unwrap_or_default()
                );
            }
            Format::Text => {
                eprintln!("Error: {error}");
                if let Some(details) =
                    error_json.get("error").and_then(|e| e.get("details"))
                {
                    if !details.is_null() {
                        eprintln!(
                            "Details: {}",
                            serde_json::to_string_pretty(details)
                                .unwrap_or_default()
                        );
                    }
                }
            }
        }
    }

    /// Display an informational message (only if not quiet)
    pub fn info<T: AsRef<str>>(&self, message: T) {
        if !self.quiet {
            info!("{}", message.as_ref());
        }
    }

    /// Display a progress message on stderr
    pub fn progress<T: AsRef<str>>(&self, message: T) {
        if !self.quiet {
            eprintln!("● {}", message.as_ref());
        }
    }

    fn format_json(&self, value: Value) -> String {
        serde_json::to_string_pretty(&value)
            .unwrap_or_else(|_| "{}".to_string())
    }

    /// Format a value as key/value lines, one indentation level deep.
    fn format_text(&self, value: Value) -> String {
        match value {
            Value::Object(map) => {
                let mut output = String::new();
                if map.is_empty() {
                    output.push_str("(empty)\n");
                } else {
                    for (key, value) in map {
                        match &value {
                            Value::Object(inner) if !inner.is_empty() => {
                                output.push_str(&format!("{key}:\n"));
                                for (inner_key, inner_value) in inner {
                                    output.push_str(&format!(
                                        "  {inner_key}: {}\n",
                                        self.format_value_brief(inner_value)
                                    ));
                                }
                            }
                            _ => {
                                output.push_str(&format!(
                                    "{key}: {}\n",
                                    self.format_value_brief(&value)
                                ));
                            }
                        }
                    }
                }
                output
            }
            _ => serde_json::to_string_pretty(&value).unwrap_or_default(),
        }
    }

    /// Format a value briefly for text display
    ///
    /// Complex nested values are summarized rather than displayed in full.
    #[allow(clippy::only_used_in_recursion)]
    fn format_value_brief(&self, value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => "null".to_string(),
            Value::Array(arr) => {
                if arr.is_empty() {
                    "[]".to_string()
                } else if arr.len() == 1 {
                    self.format_value_brief(&arr[0])
                } else {
                    format!("[{} items]", arr.len())
                }
            }
            Value::Object(map) => {
                if map.is_empty() {
                    "{}".to_string()
                } else {
                    format!("{{{} fields}}", map.len())
                }
            }
        }
    }
}
