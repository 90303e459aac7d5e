//! Site operations.

use crate::client::NsotClient;
use crate::models::{first_id, Site, SiteOpts, SitePayload, SiteRefs, SitesPayload};
use nsot_core::{Result, SiteId};
use reqwest::Method;
use tracing::debug;

const SITES_PATH: &str = "sites/";

fn site_path(id: SiteId) -> String {
    format!("{SITES_PATH}{id}/")
}

impl NsotClient {
    /// Create a site. `opts.name` must be set.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the name is missing, otherwise any
    /// pipeline error annotated with the operation.
    pub fn create_site(&self, opts: &SiteOpts) -> Result<Site> {
        opts.require_name()?;
        let payload: SitePayload = self
            .send_data(Method::POST, SITES_PATH, Some(opts))
            .map_err(|err| err.context("creating site"))?;
        Ok(payload.site)
    }

    /// List sites, optionally filtered by exact name.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error annotated with the operation.
    pub fn list_sites(&self, name: Option<&str>) -> Result<Vec<Site>> {
        let path = match name {
            Some(name) => format!("{SITES_PATH}?name={name}"),
            None => SITES_PATH.to_string(),
        };
        let payload: SitesPayload = self
            .get_data(&path)
            .map_err(|err| err.context("listing sites"))?;
        Ok(payload.sites)
    }

    /// Look up the id of the site called `name`.
    ///
    /// Only the first match is used.
    ///
    /// # Errors
    ///
    /// Returns [`nsot_core::Error::NotFound`] when no site has that name.
    pub fn retrieve_site_id_by_name(&self, name: &str) -> Result<SiteId> {
        debug!(name, "resolving site id");
        let refs: SiteRefs = self
            .get_data(&format!("{SITES_PATH}?name={name}"))
            .map_err(|err| err.context(format!("resolving site `{name}`")))?;
        first_id(&refs.sites, &format!("site named `{name}`"))
    }

    /// Fetch a site by id.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error annotated with the operation.
    pub fn retrieve_site_by_id(&self, id: SiteId) -> Result<Site> {
        let payload: SitePayload = self
            .get_data(&site_path(id))
            .map_err(|err| err.context(format!("retrieving site {id}")))?;
        Ok(payload.site)
    }

    /// Fetch a site by name: one lookup, then a fetch by id.
    ///
    /// # Errors
    ///
    /// Fails without the second call if the lookup fails.
    pub fn retrieve_site_by_name(&self, name: &str) -> Result<Site> {
        let id = self.retrieve_site_id_by_name(name)?;
        self.retrieve_site_by_id(id)
    }

    /// Patch a site. Only fields set in `opts` are sent.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error annotated with the operation.
    pub fn update_site_by_id(&self, id: SiteId, opts: &SiteOpts) -> Result<Site> {
        let payload: SitePayload = self
            .send_data(Method::PATCH, &site_path(id), Some(opts))
            .map_err(|err| err.context(format!("updating site {id}")))?;
        Ok(payload.site)
    }

    /// Delete a site by id.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error annotated with the operation.
    pub fn destroy_site_by_id(&self, id: SiteId) -> Result<()> {
        self.send_empty(Method::DELETE, &site_path(id))
            .map_err(|err| err.context(format!("deleting site {id}")))
    }

    /// Delete a site by name: one lookup, then a delete by id.
    ///
    /// # Errors
    ///
    /// Fails without the second call if the lookup fails.
    pub fn destroy_site_by_name(&self, name: &str) -> Result<()> {
        let id = self.retrieve_site_id_by_name(name)?;
        self.destroy_site_by_id(id)
    }
}
