// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Schemachange Authors

//! Session opening: connection checks and credential resolution.
//!
//! Secrets never travel through the config pipeline. They are read from
//! the environment right before a session opens, and the types holding
//! them redact their contents from any debug output.

pub mod credentials;
pub mod error;

use log::debug;
use std::env;
use std::fmt;

use crate::config::DeployConfig;

pub use credentials::{
    fetch_oauth_token, private_key_der_bytes, TOKEN_PROVIDER_URL,
    TOKEN_REQUEST_HEADERS, TOKEN_REQUEST_PAYLOAD, TOKEN_RESPONSE_NAME,
};
pub use error::SessionError;

/// Environment variable holding the connection password.
pub const PASSWORD_VAR: &str = "SNOWFLAKE_PASSWORD";
/// Environment variable holding the private key path.
pub const PRIVATE_KEY_PATH_VAR: &str = "SNOWFLAKE_PRIVATE_KEY_PATH";
/// Environment variable holding the private key passphrase.
pub const PRIVATE_KEY_PASSPHRASE_VAR: &str = "SNOWFLAKE_PRIVATE_KEY_PASSPHRASE";

/// Secrets read from the environment.
///
/// An unset or empty variable is recorded as absent; empty strings never
/// count as a credential.
#[derive(Clone, Default)]
pub struct SessionSecrets {
    /// Connection password
    pub password: Option<String>,
    /// Path of a PEM private key file
    pub private_key_path: Option<String>,
    /// Passphrase for the private key
    pub private_key_passphrase: Option<String>,
}

impl SessionSecrets {
    /// Read all secret variables from the environment.
    pub fn from_env() -> Self {
        let secrets = Self {
            password: non_empty_var(PASSWORD_VAR),
            private_key_path: non_empty_var(PRIVATE_KEY_PATH_VAR),
            private_key_passphrase: non_empty_var(PRIVATE_KEY_PASSPHRASE_VAR),
        };
        if secrets.private_key_passphrase.is_none() {
            debug!(
                "No private key passphrase provided. Assuming the key is \
                 not encrypted."
            );
        }
        secrets
    }
}

// Secrets must never reach logs or error output.
impl fmt::Debug for SessionSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSecrets")
            .field("password", &redacted(&self.password))
            .field("private_key_path", &self.private_key_path)
            .field(
                "private_key_passphrase",
                &redacted(&self.private_key_passphrase),
            )
            .finish()
    }
}

fn redacted(secret: &Option<String>) -> &'static str {
    match secret {
        Some(_) => "<redacted>",
        None => "<unset>",
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

/// Credential material handed to the connector, by method.
pub enum Credentials {
    /// OAuth access token
    OauthToken(String),
    /// Unencrypted PKCS#8 DER private key
    PrivateKey(Vec<u8>),
    /// Plain password
    Password(String),
}

impl Credentials {
    /// Name of the authentication method, for output and logs.
    pub fn method(&self) -> &'static str {
        match self {
            Credentials::OauthToken(_) => "oauth",
            Credentials::PrivateKey(_) => "private_key",
            Credentials::Password(_) => "password",
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credentials({})", self.method())
    }
}

/// Check that every connection setting a session needs is present.
///
/// The names of all missing settings are reported together so one run
/// surfaces the full list.
pub fn check_connection_args(
    config: &DeployConfig,
) -> Result<(), SessionError> {
    let missing = config.missing_connection_args();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SessionError::MissingConnectionArgs(missing))
    }
}

/// Pick and materialize the credential for a session.
///
/// Sources are tried in a fixed order: an OAuth config wins over a
/// private key, which wins over a password. Having none of the three is
/// an error that names all of them.
pub async fn resolve_credentials(
    config: &DeployConfig,
    secrets: &SessionSecrets,
) -> Result<Credentials, SessionError> {
    if let Some(oauth_config) = &config.oauth_config {
        debug!("Using OAuth token authentication");
        let token = fetch_oauth_token(oauth_config).await?;
        return Ok(Credentials::OauthToken(token));
    }
    if let Some(path) = &secrets.private_key_path {
        debug!("Using private key authentication");
        let der = private_key_der_bytes(
            std::path::Path::new(path),
            secrets.private_key_passphrase.as_deref(),
        )?;
        return Ok(Credentials::PrivateKey(der));
    }
    if let Some(password) = &secrets.password {
        debug!("Using password authentication");
        return Ok(Credentials::Password(password.clone()));
    }
    Err(SessionError::MissingCredentials)
}
