// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Schemachange Authors

//! Errors raised while opening a session.

use thiserror::Error;

/// Errors from connection checks and credential resolution.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The private key file could not be read
    #[error("Failed to read private key file {path:?}: {source}")]
    KeyRead {
        /// Path the key was read from
        path: std::path::PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The private key could not be decrypted or parsed
    #[error("Failed to decrypt private key: {0}")]
    KeyDecrypt(#[source] openssl::error::ErrorStack),

    /// The decrypted key could not be re-encoded
    #[error("Failed to re-encode private key as PKCS#8: {0}")]
    KeyEncode(#[source] openssl::error::ErrorStack),

    /// The OAuth config is missing one of its required keys
    #[error("Invalid OAuth config: missing or malformed {0:?}")]
    InvalidOauthConfig(&'static str),

    /// The token request itself failed
    #[error("OAuth token request failed: {0}")]
    OauthRequest(#[from] reqwest::Error),

    /// The provider's response body was not JSON
    #[error("OAuth provider response is not valid JSON: {0}")]
    OauthResponseJson(#[source] serde_json::Error),

    /// The provider's response carried no token under the expected key
    #[error("OAuth response contains keys: {available}, but not {field:?}{description}")]
    OauthTokenMissing {
        /// Key the token was expected under
        field: String,
        /// Keys actually present in the response
        available: String,
        /// Provider-supplied error description, when present
        description: String,
    },

    /// Required connection settings are unset
    #[error(
        "Missing config values. The following config values are required: {}",
        .0.join(", ")
    )]
    MissingConnectionArgs(Vec<&'static str>),

    /// No credential source was available at all
    #[error(
        "Unable to find connection credentials: provide an OAuth config, \
         a private key path, or a password"
    )]
    MissingCredentials,
}
