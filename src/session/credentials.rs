// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Schemachange Authors

//! Credential material: private key loading and OAuth token fetching.

use log::debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde_json::Value;
use std::path::Path;

use crate::config::JsonObject;
use crate::session::error::SessionError;

/// OAuth config key holding the token endpoint URL.
pub const TOKEN_PROVIDER_URL: &str = "token-provider-url";
/// OAuth config key holding the request headers object.
pub const TOKEN_REQUEST_HEADERS: &str = "token-request-headers";
/// OAuth config key holding the form payload object.
pub const TOKEN_REQUEST_PAYLOAD: &str = "token-request-payload";
/// OAuth config key naming the response field that carries the token.
pub const TOKEN_RESPONSE_NAME: &str = "token-response-name";

/// Read a PEM private key and return it as unencrypted PKCS#8 DER.
///
/// An empty passphrase means the key is not encrypted; the connector
/// always receives the key in decrypted form.
pub fn private_key_der_bytes(
    path: &Path,
    passphrase: Option<&str>,
) -> Result<Vec<u8>, SessionError> {
    let contents =
        std::fs::read(path).map_err(|source| SessionError::KeyRead {
            path: path.to_path_buf(),
            source,
        })?;
    let pkey = match passphrase {
        Some(passphrase) if !passphrase.is_empty() => {
            openssl::pkey::PKey::private_key_from_pem_passphrase(
                &contents,
                passphrase.as_bytes(),
            )
        }
        _ => openssl::pkey::PKey::private_key_from_pem(&contents),
    }
    .map_err(SessionError::KeyDecrypt)?;
    pkey.private_key_to_pkcs8().map_err(SessionError::KeyEncode)
}

/// Request an access token from the provider described by `oauth_config`.
///
/// The config's inner keys keep the hyphenated spelling used in the
/// config file; only top-level file keys are ever renamed. One POST is
/// made with the payload form-encoded, the response body is parsed as
/// JSON whatever the status code, and the token is read from the field
/// named by `token-response-name`.
pub async fn fetch_oauth_token(
    oauth_config: &JsonObject,
) -> Result<String, SessionError> {
    let url = require_str(oauth_config, TOKEN_PROVIDER_URL)?;
    let headers = require_map(oauth_config, TOKEN_REQUEST_HEADERS)?;
    let payload = require_map(oauth_config, TOKEN_REQUEST_PAYLOAD)?;
    let token_name = require_str(oauth_config, TOKEN_RESPONSE_NAME)?;

    let form: Vec<(String, String)> = payload
        .iter()
        .map(|(key, value)| (key.clone(), string_form(value)))
        .collect();
    let header_map = build_header_map(headers)?;

    debug!("Requesting OAuth token from {url}");
    // Headers go on after the form body so a Content-Type given in the
    // config replaces the form-urlencoded default instead of duplicating.
    let response = Client::new()
        .post(url)
        .form(&form)
        .headers(header_map)
        .send()
        .await?;
    let body = response.text().await?;
    let parsed: Value = serde_json::from_str(&body)
        .map_err(SessionError::OauthResponseJson)?;

    match parsed.get(token_name) {
        Some(Value::String(token)) => Ok(token.clone()),
        Some(other) => Ok(other.to_string()),
        None => Err(token_missing_error(&parsed, token_name)),
    }
}

fn require_str<'a>(
    oauth_config: &'a JsonObject,
    key: &'static str,
) -> Result<&'a str, SessionError> {
    oauth_config
        .get(key)
        .and_then(Value::as_str)
        .ok_or(SessionError::InvalidOauthConfig(key))
}

fn require_map<'a>(
    oauth_config: &'a JsonObject,
    key: &'static str,
) -> Result<&'a JsonObject, SessionError> {
    oauth_config
        .get(key)
        .and_then(Value::as_object)
        .ok_or(SessionError::InvalidOauthConfig(key))
}

fn build_header_map(headers: &JsonObject) -> Result<HeaderMap, SessionError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::try_from(name.as_str()).map_err(|_| {
            SessionError::InvalidOauthConfig(TOKEN_REQUEST_HEADERS)
        })?;
        let value = HeaderValue::try_from(string_form(value)).map_err(|_| {
            SessionError::InvalidOauthConfig(TOKEN_REQUEST_HEADERS)
        })?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Form or header representation of a JSON value: strings unquoted,
/// everything else in its JSON rendering.
fn string_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn token_missing_error(parsed: &Value, token_name: &str) -> SessionError {
    let available = match parsed.as_object() {
        Some(object) if !object.is_empty() => object
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        _ => "(none)".to_string(),
    };
    let description = parsed
        .get("error_description")
        .and_then(Value::as_str)
        .map(|d| format!(" (error description: {d})"))
        .unwrap_or_default();
    SessionError::OauthTokenMissing {
        field: token_name.to_string(),
        available,
        description,
    }
}
