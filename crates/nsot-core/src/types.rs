//! Value types shared by NSoT records.
//!
//! Network attributes are a free-form map on the server. Here they are typed
//! as [`Attributes`], a map whose values are limited to the [`AttributeValue`]
//! variants, so decoding and encoding either succeed completely or fail.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Attribute map attached to a network, keyed by attribute name.
pub type Attributes = BTreeMap<String, AttributeValue>;

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// JSON `null`
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer or floating point value
    Number(serde_json::Number),
    /// String value
    String(String),
}

impl AttributeValue {
    /// Returns the string value, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value as `i64`, if this is an integral number.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(value) => value.as_i64(),
            _ => None,
        }
    }

    /// Returns true for `null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for AttributeValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::String(value) => write!(f, "{value}"),
        }
    }
}

/// IP version of a network, serialized the way NSoT reports it (`"4"`/`"6"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IpVersion {
    /// IPv4
    #[serde(rename = "4")]
    V4,
    /// IPv6
    #[serde(rename = "6")]
    V6,
}

impl IpVersion {
    /// Returns the version as NSoT spells it.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::V4 => "4",
            Self::V6 => "6",
        }
    }
}

impl FromStr for IpVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "4" | "v4" | "ipv4" => Ok(Self::V4),
            "6" | "v6" | "ipv6" => Ok(Self::V6),
            _ => Err(Error::Validation(format!("Unknown IP version: {s}"))),
        }
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attributes_decode_every_variant() {
        let attrs: Attributes = serde_json::from_value(json!({
            "owner": "netops",
            "vlan": 42,
            "ratio": 0.5,
            "managed": true,
            "retired": null
        }))
        .unwrap();

        assert_eq!(attrs["owner"].as_str(), Some("netops"));
        assert_eq!(attrs["vlan"].as_i64(), Some(42));
        assert!(matches!(attrs["ratio"], AttributeValue::Number(_)));
        assert_eq!(attrs["managed"].as_bool(), Some(true));
        assert!(attrs["retired"].is_null());
    }

    #[test]
    fn test_attributes_reject_nested_values() {
        let result: std::result::Result<Attributes, _> =
            serde_json::from_value(json!({ "tags": ["a", "b"] }));
        assert!(result.is_err());
    }

    #[test]
    fn test_attribute_value_serializes_bare() {
        let mut attrs = Attributes::new();
        attrs.insert("owner".to_string(), "netops".into());
        attrs.insert("vlan".to_string(), 42_i64.into());
        attrs.insert("managed".to_string(), false.into());
        attrs.insert("retired".to_string(), AttributeValue::Null);

        assert_eq!(
            serde_json::to_value(&attrs).unwrap(),
            json!({ "managed": false, "owner": "netops", "retired": null, "vlan": 42 })
        );
    }

    #[test]
    fn test_attribute_value_display() {
        assert_eq!(AttributeValue::from("x").to_string(), "x");
        assert_eq!(AttributeValue::from(7_u64).to_string(), "7");
        assert_eq!(AttributeValue::Null.to_string(), "null");
    }

    #[test]
    fn test_ip_version_serde() {
        assert_eq!(serde_json::to_string(&IpVersion::V4).unwrap(), "\"4\"");
        let version: IpVersion = serde_json::from_str("\"6\"").unwrap();
        assert_eq!(version, IpVersion::V6);
    }

    #[test]
    fn test_ip_version_from_str() {
        assert_eq!("4".parse::<IpVersion>().unwrap(), IpVersion::V4);
        assert_eq!("IPv6".parse::<IpVersion>().unwrap(), IpVersion::V6);
        assert!("5".parse::<IpVersion>().is_err());
    }
}
