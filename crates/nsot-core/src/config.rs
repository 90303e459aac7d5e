//! Configuration for connecting to an NSoT server.
//!
//! [`NsotConfig`] carries the base URL and the credentials used to obtain
//! auth tokens. Values are normally passed explicitly; the environment is
//! consulted only through [`NsotConfig::from_env`] and [`NsotConfig::resolve`].

use crate::Error;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use validator::Validate;

/// Environment variable holding the NSoT base URL.
pub const ENV_URL: &str = "NSOT_URL";

/// Environment variable holding the account email.
pub const ENV_EMAIL: &str = "NSOT_EMAIL";

/// Environment variable holding the account secret key.
pub const ENV_SECRET: &str = "NSOT_SECRET";

/// Connection settings and credentials for an NSoT client.
///
/// Immutable once handed to a client. The secret key never appears in
/// `Debug` output.
#[derive(Clone, Validate)]
pub struct NsotConfig {
    /// NSoT API base URL (e.g. "https://nsot.example.com/api")
    #[validate(url)]
    url: String,

    /// Account email, sent with every auth token
    #[validate(email)]
    email: String,

    secret_key: SecretString,
}

impl NsotConfig {
    /// Create a configuration from explicit values.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or email is invalid or the secret key is empty.
    pub fn new(
        url: impl Into<String>,
        email: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<Self, Error> {
        let config = Self {
            url: url.into(),
            email: email.into(),
            secret_key: SecretString::from(secret_key.into()),
        };

        config.validate()?;

        if config.secret_key.expose_secret().is_empty() {
            return Err(Error::Config(
                "Invalid configuration: secret key is empty".to_string(),
            ));
        }

        Ok(config)
    }

    /// Build a configuration entirely from `NSOT_URL`, `NSOT_EMAIL` and `NSOT_SECRET`.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is missing or the values are invalid.
    pub fn from_env() -> Result<Self, Error> {
        Self::resolve(None, None, None)
    }

    /// Combine explicit values with the process environment.
    ///
    /// Explicit values win; empty strings count as absent, matching the
    /// behavior of leaving the argument out.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is missing from both sources or is invalid.
    pub fn resolve(
        url: Option<&str>,
        email: Option<&str>,
        secret_key: Option<&str>,
    ) -> Result<Self, Error> {
        Self::resolve_with(url, email, secret_key, |key| std::env::var(key).ok())
    }

    /// Like [`NsotConfig::resolve`], reading fallbacks through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is missing from both sources or is invalid.
    pub fn resolve_with<F>(
        url: Option<&str>,
        email: Option<&str>,
        secret_key: Option<&str>,
        lookup: F,
    ) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |explicit: Option<&str>, key: &str| -> Result<String, Error> {
            explicit
                .filter(|value| !value.is_empty())
                .map(str::to_string)
                .or_else(|| lookup(key).filter(|value| !value.is_empty()))
                .ok_or_else(|| Error::Config(format!("Missing value: set {key} or pass it explicitly")))
        };

        Self::new(
            pick(url, ENV_URL)?,
            pick(email, ENV_EMAIL)?,
            pick(secret_key, ENV_SECRET)?,
        )
    }

    /// The configured base URL, as given.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The account email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The account secret key.
    #[must_use]
    pub fn secret_key(&self) -> &SecretString {
        &self.secret_key
    }

    /// Base URL without trailing slashes, ready for `{base}/{path}` joins.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

impl fmt::Debug for NsotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NsotConfig")
            .field("url", &self.url)
            .field("email", &self.email)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}
