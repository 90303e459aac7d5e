//! # nsot-core
//!
//! Core types for working with an NSoT (network source of truth) server.
//!
//! This crate provides the error taxonomy, configuration, transport settings
//! and shared value types used by the `nsot-client` crate.
//!
//! ## Modules
//!
//! - [`error`] - Error types shared by every operation
//! - [`config`] - Base URL and credentials, with an environment adapter
//! - [`client`] - HTTP transport settings
//! - [`envelope`] - The `{status, data}` response envelope
//! - [`id`] - Strongly-typed site and network ids
//! - [`types`] - Attribute values and IP versions

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod id;
pub mod types;

// Re-export commonly used types
pub use config::NsotConfig;
pub use envelope::Envelope;
pub use error::{AuthFailure, Error, Result};
pub use id::{NetworkId, SiteId};
pub use types::{AttributeValue, Attributes, IpVersion};
