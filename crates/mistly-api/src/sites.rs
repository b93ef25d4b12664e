// Site endpoints
//
// Sites are organization-scoped for listing and creation, but addressed
// directly by id (`/sites/{id}`) for everything else.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::client::MistClient;
use crate::error::Error;
use crate::models::SiteRecord;

impl MistClient {
    /// List all sites of an organization.
    ///
    /// `GET /api/v1/orgs/{org}/sites`
    pub async fn list_sites(&self, org_id: &str) -> Result<Option<Vec<SiteRecord>>, Error> {
        debug!(org_id, "listing sites");
        self.get(format!("orgs/{org_id}/sites")).await
    }

    /// Create a site.
    ///
    /// `POST /api/v1/orgs/{org}/sites`
    pub async fn create_site<B: Serialize + ?Sized>(
        &self,
        org_id: &str,
        body: &B,
    ) -> Result<Option<SiteRecord>, Error> {
        debug!(org_id, "creating site");
        self.post(format!("orgs/{org_id}/sites"), body).await
    }

    /// Update top-level site attributes (RF template, site groups, ...).
    ///
    /// `PUT /api/v1/sites/{site}`
    pub async fn update_site<B: Serialize + ?Sized>(
        &self,
        site_id: &str,
        body: &B,
    ) -> Result<Option<SiteRecord>, Error> {
        debug!(site_id, "updating site");
        self.put(format!("sites/{site_id}"), body).await
    }

    /// Update site settings (the separate `setting` document).
    ///
    /// `PUT /api/v1/sites/{site}/setting`
    pub async fn update_site_setting<B: Serialize + ?Sized>(
        &self,
        site_id: &str,
        body: &B,
    ) -> Result<Option<Value>, Error> {
        debug!(site_id, "updating site setting");
        self.put(format!("sites/{site_id}/setting"), body).await
    }

    /// Delete a site.
    ///
    /// `DELETE /api/v1/sites/{site}`
    pub async fn delete_site(&self, site_id: &str) -> Result<bool, Error> {
        debug!(site_id, "deleting site");
        self.delete(format!("sites/{site_id}")).await
    }
}
