//! Blocking client for the NSoT sites and networks API.
//!
//! Every operation authenticates afresh, sends one request (or a lookup
//! followed by one request) and decodes the `{status, data}` envelope into
//! typed records.
//!
//! ```no_run
//! use nsot_client::{NsotClient, SiteOpts};
//! use nsot_core::NsotConfig;
//!
//! # fn main() -> nsot_core::Result<()> {
//! let config = NsotConfig::new("https://nsot.example.com/api", "admin@example.com", "s3cret")?;
//! let client = NsotClient::new(config)?;
//! let site = client.create_site(&SiteOpts::new("site1"))?;
//! let same = client.retrieve_site_by_name(&site.name)?;
//! assert_eq!(site.id, same.id);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod auth;
pub mod client;
pub mod models;
mod networks;
mod sites;

pub use auth::{authenticate, AuthToken};
pub use client::{NsotClient, NsotClientBuilder};
pub use models::{Network, NetworkOpts, Site, SiteOpts};

/// Convenient result alias sharing the `nsot-core` error type.
pub type Result<T> = nsot_core::Result<T>;
