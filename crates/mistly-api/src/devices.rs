// Device endpoints
//
// Site-scoped device listing and updates under `/api/v1/sites/{site}/devices`,
// plus the installer-tree listing and provisioning calls that address
// devices by MAC within an organization.

use serde::Serialize;
use tracing::debug;

use crate::client::MistClient;
use crate::cloud::ApiPath;
use crate::error::Error;
use crate::models::{InventoryDevice, SiteDevice};

impl MistClient {
    /// List the devices assigned to a site.
    ///
    /// `GET /api/v1/sites/{site}/devices`
    pub async fn list_site_devices(
        &self,
        site_id: &str,
    ) -> Result<Option<Vec<SiteDevice>>, Error> {
        debug!(site_id, "listing site devices");
        self.get(format!("sites/{site_id}/devices")).await
    }

    /// Update a device's configuration (radio settings, name, ...).
    ///
    /// `PUT /api/v1/sites/{site}/devices/{device}`
    pub async fn update_site_device<B: Serialize + ?Sized>(
        &self,
        site_id: &str,
        device_id: &str,
        body: &B,
    ) -> Result<Option<SiteDevice>, Error> {
        debug!(site_id, device_id, "updating site device");
        self.put(format!("sites/{site_id}/devices/{device_id}"), body)
            .await
    }

    /// List the devices the installer API sees in an organization.
    ///
    /// `GET /installer/orgs/{org}/devices`
    pub async fn list_installer_devices(
        &self,
        org_id: &str,
    ) -> Result<Option<Vec<InventoryDevice>>, Error> {
        debug!(org_id, "listing organization devices");
        self.get(ApiPath::installer(format!("orgs/{org_id}/devices")))
            .await
    }

    /// Assign a claimed device to a site with its placement attributes.
    ///
    /// `PUT /installer/orgs/{org}/devices/{mac}`
    pub async fn provision_device<B: Serialize + ?Sized>(
        &self,
        org_id: &str,
        mac: &str,
        body: &B,
    ) -> Result<Option<SiteDevice>, Error> {
        debug!(org_id, mac, "provisioning device");
        self.put(ApiPath::installer(format!("orgs/{org_id}/devices/{mac}")), body)
            .await
    }
}
