// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Schemachange Authors

//! Configuration and session-credential resolution for schemachange.
//!
//! The crate turns the command line, an optional YAML config file, and a
//! handful of `SNOWFLAKE_*` environment variables into two things:
//!
//! 1. an immutable [`config::Config`] describing the requested run
//!    (`deploy` or `render`), resolved with command-line values taking
//!    precedence over file values;
//! 2. the credential material a database session needs, via
//!    [`session::resolve_credentials`] (OAuth token, private key bytes, or
//!    password, in that order of preference).
//!
//! Resolution happens once per process; everything it produces is
//! read-only afterwards. The command layer in [`commands`] consumes both
//! and reports through [`output::OutputHandler`].

pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod session;

pub use config::Config;
pub use error::SchemachangeError;
