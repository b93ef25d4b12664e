// Site-level WLAN endpoints

use serde::Serialize;
use tracing::debug;

use crate::client::MistClient;
use crate::error::Error;
use crate::models::WlanRecord;

impl MistClient {
    /// List the WLANs defined on a site.
    ///
    /// `GET /api/v1/sites/{site}/wlans`
    pub async fn list_wlans(&self, site_id: &str) -> Result<Option<Vec<WlanRecord>>, Error> {
        debug!(site_id, "listing wlans");
        self.get(format!("sites/{site_id}/wlans")).await
    }

    /// Create a WLAN on a site.
    ///
    /// `POST /api/v1/sites/{site}/wlans`
    pub async fn create_wlan<B: Serialize + ?Sized>(
        &self,
        site_id: &str,
        body: &B,
    ) -> Result<Option<WlanRecord>, Error> {
        debug!(site_id, "creating wlan");
        self.post(format!("sites/{site_id}/wlans"), body).await
    }

    /// Delete a WLAN.
    ///
    /// `DELETE /api/v1/sites/{site}/wlans/{wlan}`
    pub async fn delete_wlan(&self, site_id: &str, wlan_id: &str) -> Result<bool, Error> {
        debug!(site_id, wlan_id, "deleting wlan");
        self.delete(format!("sites/{site_id}/wlans/{wlan_id}")).await
    }
}
