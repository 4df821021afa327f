// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Schemachange Authors

//! Command implementations for schemachange

pub mod deploy;
pub mod render;
