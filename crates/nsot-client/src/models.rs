//! NSoT data models for sites and networks.
//!
//! Records (`Site`, `Network`) are only ever produced by decoding server
//! responses. The `*Opts` structs are what callers fill in for create and
//! update calls; unset fields are left out of the request body entirely.

use nsot_core::{Attributes, Error, IpVersion, NetworkId, Result, SiteId};
use serde::{Deserialize, Serialize};

// Empty strings count as unset, so `""` never overwrites a server value.
fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// Site representation returned by NSoT.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Site {
    /// Server-assigned id.
    pub id: SiteId,
    /// Unique site name.
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Fields for creating or updating a site.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct SiteOpts {
    /// Site name. Required on create.
    #[serde(skip_serializing_if = "is_blank")]
    pub name: Option<String>,
    /// Site description.
    #[serde(skip_serializing_if = "is_blank")]
    pub description: Option<String>,
}

impl SiteOpts {
    /// Options naming a site, as needed for creation.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub(crate) fn require_name(&self) -> Result<()> {
        if is_blank(&self.name) {
            return Err(Error::Validation("site name is required".to_string()));
        }
        Ok(())
    }
}

/// Network representation returned by NSoT.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Network {
    /// Server-assigned id.
    pub id: NetworkId,
    /// Network address without the prefix length (e.g. `10.0.0.0`).
    pub network_address: String,
    /// Prefix length of the CIDR.
    pub prefix_length: u8,
    /// Address family.
    pub ip_version: IpVersion,
    /// True for single host addresses.
    #[serde(default)]
    pub is_ip: bool,
    /// Allocation state (`allocated`, `assigned`, `reserved`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Owning site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<SiteId>,
    /// Attribute values keyed by attribute name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
}

impl Network {
    /// The network in CIDR notation.
    #[must_use]
    pub fn cidr(&self) -> String {
        format!("{}/{}", self.network_address, self.prefix_length)
    }
}

/// Fields for creating a network.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct NetworkOpts {
    /// Network in CIDR notation. Required on create.
    #[serde(skip_serializing_if = "is_blank")]
    pub cidr: Option<String>,
    /// Site the network belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<SiteId>,
    /// Allocation state.
    #[serde(skip_serializing_if = "is_blank")]
    pub state: Option<String>,
    /// Attribute values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
}

impl NetworkOpts {
    /// Options for the given CIDR, as needed for creation.
    #[must_use]
    pub fn new(cidr: impl Into<String>) -> Self {
        Self {
            cidr: Some(cidr.into()),
            ..Self::default()
        }
    }

    /// Set the owning site.
    #[must_use]
    pub fn with_site_id(mut self, site_id: SiteId) -> Self {
        self.site_id = Some(site_id);
        self
    }

    /// Set the allocation state.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Set the attributes.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub(crate) fn require_cidr(&self) -> Result<()> {
        if is_blank(&self.cidr) {
            return Err(Error::Validation("network cidr is required".to_string()));
        }
        Ok(())
    }
}

/// `data` of a single-site envelope.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SitePayload {
    pub site: Site,
}

/// `data` of a site list envelope.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SitesPayload {
    pub sites: Vec<Site>,
}

/// `data` of a single-network envelope.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NetworkPayload {
    pub network: Network,
}

/// `data` of a network list envelope.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NetworksPayload {
    pub networks: Vec<Network>,
}

/// Only the id of a list entry; the rest of the record is ignored.
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct IdRef<I> {
    pub id: I,
}

/// `data` of a site list envelope decoded for id lookups.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SiteRefs {
    pub sites: Vec<IdRef<SiteId>>,
}

/// `data` of a network list envelope decoded for id lookups.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NetworkRefs {
    pub networks: Vec<IdRef<NetworkId>>,
}

/// Id of the first entry, or [`Error::NotFound`] when the list is empty.
///
/// Only index 0 is consulted; further matches are ignored.
pub(crate) fn first_id<I: Copy>(refs: &[IdRef<I>], what: &str) -> Result<I> {
    refs.first()
        .map(|entry| entry.id)
        .ok_or_else(|| Error::NotFound(what.to_string()))
}
