// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Schemachange Authors

//! The fully qualified name of the change history table.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::config::error::ConfigError;

/// Three-part name of the table that records applied changes.
///
/// Overrides are written `database.schema.table`; trailing qualifiers may
/// be omitted and pick up the standard defaults. Only the table part is
/// mandatory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChangeHistoryTable {
    /// Database holding the table
    pub database_name: String,
    /// Schema holding the table
    pub schema_name: String,
    /// Name of the table itself
    pub table_name: String,
}

impl ChangeHistoryTable {
    /// Database used when the override does not name one.
    pub const DEFAULT_DATABASE: &'static str = "METADATA";
    /// Schema used when the override does not name one.
    pub const DEFAULT_SCHEMA: &'static str = "SCHEMACHANGE";
    /// Table used when no override is given at all.
    pub const DEFAULT_TABLE: &'static str = "CHANGE_HISTORY";

    /// Build from pre-split parts, defaulting any omitted qualifier.
    pub fn from_parts(
        database_name: Option<String>,
        schema_name: Option<String>,
        table_name: String,
    ) -> Self {
        Self {
            database_name: database_name
                .unwrap_or_else(|| Self::DEFAULT_DATABASE.to_string()),
            schema_name: schema_name
                .unwrap_or_else(|| Self::DEFAULT_SCHEMA.to_string()),
            table_name,
        }
    }
}

impl Default for ChangeHistoryTable {
    fn default() -> Self {
        Self::from_parts(None, None, Self::DEFAULT_TABLE.to_string())
    }
}

impl FromStr for ChangeHistoryTable {
    type Err = ConfigError;

    /// Parse a dotted override. Segments bind from the right: the last is
    /// always the table, then schema, then database.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = value.split('.').collect();
        let (database, schema, table) = match parts.as_slice() {
            [table] => (None, None, *table),
            [schema, table] => (None, Some(*schema), *table),
            [database, schema, table] => {
                (Some(*database), Some(*schema), *table)
            }
            _ => {
                return Err(ConfigError::InvalidChangeHistoryTable(
                    value.to_string(),
                ))
            }
        };
        if table.is_empty() {
            return Err(ConfigError::InvalidChangeHistoryTable(
                value.to_string(),
            ));
        }
        Ok(Self::from_parts(
            database.map(str::to_owned),
            schema.map(str::to_owned),
            table.to_owned(),
        ))
    }
}

impl fmt::Display for ChangeHistoryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            self.database_name, self.schema_name, self.table_name
        )
    }
}
