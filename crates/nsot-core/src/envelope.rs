//! The `{status, data}` envelope wrapping every NSoT response.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Envelope status marking a successful operation.
pub const STATUS_OK: &str = "ok";

/// Generic NSoT response body.
///
/// `data` stays untyped until `status` has been checked: error replies carry
/// an `error` object and usually no `data` at all, so decoding the payload
/// first would hide the reported status behind a decode failure.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope {
    /// Application-level status, `"ok"` on success
    pub status: String,
    /// Endpoint-specific payload, absent or null on most error replies
    #[serde(default)]
    pub data: Option<Value>,
}

impl Envelope {
    /// Returns true when the envelope reports success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Check the status, then decode the payload into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Domain`] carrying the reported status when it is not
    /// `ok`, and [`Error::Decode`] when an `ok` reply has no payload or the
    /// payload does not fit `T`.
    pub fn into_data<T>(self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        if !self.is_ok() {
            return Err(Error::Domain(self.status));
        }
        let data = self
            .data
            .ok_or_else(|| Error::Decode("envelope has no `data`".to_string()))?;
        Ok(serde_json::from_value(data)?)
    }
}
