//! Network operations.
//!
//! CIDR lookups go through `networks/?network_address=<cidr>` with the CIDR
//! interpolated as given; it is not percent-encoded.

use crate::client::NsotClient;
use crate::models::{
    first_id, Network, NetworkOpts, NetworkPayload, NetworkRefs, NetworksPayload,
};
use nsot_core::{NetworkId, Result};
use reqwest::Method;
use tracing::debug;

const NETWORKS_PATH: &str = "networks/";

fn network_path(id: NetworkId) -> String {
    format!("{NETWORKS_PATH}{id}/")
}

fn lookup_path(cidr: &str) -> String {
    format!("{NETWORKS_PATH}?network_address={cidr}")
}

impl NsotClient {
    /// Create a network. `opts.cidr` must be set.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the CIDR is missing, otherwise any
    /// pipeline error annotated with the operation.
    pub fn create_network(&self, opts: &NetworkOpts) -> Result<Network> {
        opts.require_cidr()?;
        let payload: NetworkPayload = self
            .send_data(Method::POST, NETWORKS_PATH, Some(opts))
            .map_err(|err| err.context("creating network"))?;
        Ok(payload.network)
    }

    /// List networks, optionally filtered by network address.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error annotated with the operation.
    pub fn list_networks(&self, cidr: Option<&str>) -> Result<Vec<Network>> {
        let path = cidr.map_or_else(|| NETWORKS_PATH.to_string(), lookup_path);
        let payload: NetworksPayload = self
            .get_data(&path)
            .map_err(|err| err.context("listing networks"))?;
        Ok(payload.networks)
    }

    /// Look up the id of the network at `cidr`.
    ///
    /// Only the first match is used.
    ///
    /// # Errors
    ///
    /// Returns [`nsot_core::Error::NotFound`] when nothing matches.
    pub fn retrieve_network_id_by_cidr(&self, cidr: &str) -> Result<NetworkId> {
        debug!(cidr, "resolving network id");
        let refs: NetworkRefs = self
            .get_data(&lookup_path(cidr))
            .map_err(|err| err.context(format!("resolving network `{cidr}`")))?;
        first_id(&refs.networks, &format!("network `{cidr}`"))
    }

    /// Fetch a network by id.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error annotated with the operation.
    pub fn retrieve_network_by_id(&self, id: NetworkId) -> Result<Network> {
        let payload: NetworkPayload = self
            .get_data(&network_path(id))
            .map_err(|err| err.context(format!("retrieving network {id}")))?;
        Ok(payload.network)
    }

    /// Fetch a network by CIDR: one lookup, then a fetch by id.
    ///
    /// # Errors
    ///
    /// Fails without the second call if the lookup fails.
    pub fn retrieve_network_by_cidr(&self, cidr: &str) -> Result<Network> {
        let id = self.retrieve_network_id_by_cidr(cidr)?;
        self.retrieve_network_by_id(id)
    }

    /// Delete a network by id.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error annotated with the operation.
    pub fn destroy_network_by_id(&self, id: NetworkId) -> Result<()> {
        self.send_empty(Method::DELETE, &network_path(id))
            .map_err(|err| err.context(format!("deleting network {id}")))
    }

    /// Delete a network by CIDR: one lookup, then a delete by id.
    ///
    /// # Errors
    ///
    /// Fails without the second call if the lookup fails.
    pub fn destroy_network_by_cidr(&self, cidr: &str) -> Result<()> {
        let id = self.retrieve_network_id_by_cidr(cidr)?;
        self.destroy_network_by_id(id)
    }
}
