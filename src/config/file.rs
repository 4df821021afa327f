// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Schemachange Authors

//! Loading and normalizing the YAML config file.
//!
//! The file lives at `<config folder>/schemachange-config.yml` and is
//! optional; a missing file simply contributes nothing. Its keys use the
//! hyphenated spelling documented for the file format and are rewritten
//! to the internal underscore names before deserialization. Keys that do
//! not correspond to a known option are ignored, so a file written for
//! `deploy` can be used unchanged with `render`.

use log::{debug, info, LevelFilter};
use serde::{Deserialize, Deserializer};
use serde_yaml::{Mapping, Value as YamlValue};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::cli::JsonObject;
use crate::config::error::ConfigError;

/// Options read from the config file, with absent keys preserved as
/// `None` so the merge can tell them apart from explicit values.
#[derive(Debug, Default, Deserialize)]
pub struct FileOptions {
    /// Root folder containing the change scripts
    pub root_folder: Option<PathBuf>,
    /// Folder containing script modules
    pub modules_folder: Option<PathBuf>,
    /// Template variables (the file key is `vars`)
    pub config_vars: Option<JsonObject>,
    /// Logging level; `verbose: true` in the file arrives here as debug
    #[serde(default, deserialize_with = "level_filter_from_name")]
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
    /// OAuth token request settings (the file key is `oauthconfig`)
    pub oauth_config: Option<JsonObject>,
}

impl FileOptions {
    /// Load options from the YAML file at `path`.
    ///
    /// A missing file is not an error; it yields the empty option set.
    /// An unreadable or unparsable file is fatal.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            debug!("No config file found at {}", path.display());
            return Ok(Self::default());
        }
        info!("Using config file: {}", path.display());
        let contents =
            fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_yaml_str(&contents, path)
    }

    fn from_yaml_str(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let raw: YamlValue = serde_yaml::from_str(contents).map_err(|source| {
            ConfigError::ParseFile {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let mapping = match raw {
            // An empty file parses as null; treat it like a missing file.
            YamlValue::Null => return Ok(Self::default()),
            YamlValue::Mapping(mapping) => mapping,
            _ => {
                return Err(ConfigError::NotAMapping {
                    path: path.to_path_buf(),
                })
            }
        };
        let normalized = normalize_keys(mapping);
        serde_yaml::from_value(YamlValue::Mapping(normalized)).map_err(
            |source| ConfigError::ParseFile {
                path: path.to_path_buf(),
                source,
            },
        )
    }
}

/// Rewrite top-level keys from the file's hyphenated convention to the
/// internal underscore names and apply the special-case renames.
///
/// The file schema spells one key `oauthconfig` while the internal field
/// is `oauth_config`; the rename does not follow the hyphen rule but is
/// kept exactly as documented. A truthy `verbose` raises the log level
/// and the key itself never survives; `vars` becomes `config_vars`.
/// Nested keys (notably inside the OAuth block) are left untouched.
fn normalize_keys(raw: Mapping) -> Mapping {
    let mut normalized = Mapping::new();
    for (key, value) in raw {
        let name = match key {
            YamlValue::String(name) => name,
            other => {
                normalized.insert(other, value);
                continue;
            }
        };
        let name = name
            .replace('-', "_")
            .replace("oauthconfig", "oauth_config");
        normalized.insert(YamlValue::String(name), value);
    }
    if let Some(verbose) = normalized.remove("verbose") {
        if yaml_truthy(&verbose) {
            normalized.insert("log_level".into(), "DEBUG".into());
        }
    }
    if let Some(vars) = normalized.remove("vars") {
        normalized.insert("config_vars".into(), vars);
    }
    normalized
}

/// Truthiness of a YAML value, for the `verbose` key.
fn yaml_truthy(value: &YamlValue) -> bool {
    match value {
        YamlValue::Null => false,
        YamlValue::Bool(b) => *b,
        YamlValue::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        YamlValue::String(s) => !s.is_empty(),
        YamlValue::Sequence(s) => !s.is_empty(),
        YamlValue::Mapping(m) => !m.is_empty(),
        YamlValue::Tagged(tagged) => yaml_truthy(&tagged.value),
    }
}

/// Deserialize an optional logging level from its name ("DEBUG", "info").
fn level_filter_from_name<'de, D>(
    deserializer: D,
) -> Result<Option<LevelFilter>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(name) => name.parse::<LevelFilter>().map(Some).map_err(|_| {
            serde::de::Error::custom(format!("unknown log level: {name}"))
        }),
    }
}
