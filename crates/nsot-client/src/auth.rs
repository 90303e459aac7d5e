//! Token exchange against `POST {base}/authenticate/`.
//!
//! A token is requested for every outgoing API call and dropped right after
//! the request is built. Nothing here caches or refreshes tokens.

use crate::client::endpoint;
use nsot_core::envelope::STATUS_OK;
use nsot_core::{AuthFailure, NsotConfig, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Resource path of the authentication endpoint.
pub const AUTH_PATH: &str = "authenticate/";

#[derive(Serialize)]
struct AuthRequest<'a> {
    email: &'a str,
    secret_key: &'a str,
}

/// Short-lived bearer token issued by NSoT.
///
/// The value is only reachable through [`AuthToken::expose`]; `Debug` output
/// is redacted.
pub struct AuthToken(SecretString);

impl AuthToken {
    /// The raw token string.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// `Authorization` header value for `email`.
    pub(crate) fn header_value(&self, email: &str) -> String {
        format!("AuthToken {email}:{}", self.expose())
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken([REDACTED])")
    }
}

/// Exchange the configured email and secret key for a fresh token.
///
/// # Errors
///
/// Transport failures come back as [`nsot_core::Error::Transport`] or
/// [`nsot_core::Error::Timeout`]. Anything else that keeps a token from being
/// read is an [`nsot_core::Error::Auth`].
pub fn authenticate(http: &Client, config: &NsotConfig) -> Result<AuthToken> {
    let url = endpoint(config.base_url(), AUTH_PATH)?;
    let body = AuthRequest {
        email: config.email(),
        secret_key: config.secret_key().expose_secret(),
    };

    debug!(email = config.email(), "requesting NSoT auth token");
    let response = http.post(url).json(&body).send()?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(AuthFailure::UnexpectedStatus(status.to_string()).into());
    }

    let bytes = response
        .bytes()
        .map_err(|err| AuthFailure::Decode(format!("failed to read body: {err}")))?;
    parse_token(&bytes)
}

fn parse_token(bytes: &[u8]) -> Result<AuthToken> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|err| AuthFailure::Decode(err.to_string()))?;
    let body = value
        .as_object()
        .ok_or_else(|| AuthFailure::MalformedResponse("body is not a JSON object".to_string()))?;

    match body.get("status").and_then(Value::as_str) {
        Some(STATUS_OK) => {}
        other => {
            return Err(AuthFailure::Rejected(other.unwrap_or("<missing>").to_string()).into());
        }
    }

    let data = body
        .get("data")
        .and_then(Value::as_object)
        .ok_or_else(|| AuthFailure::MalformedResponse("missing `data` object".to_string()))?;
    let token = data
        .get("auth_token")
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AuthFailure::MalformedResponse("missing `auth_token` string".to_string()))?;

    Ok(AuthToken(SecretString::from(token.to_string())))
}
