// Organization inventory endpoints
//
// Claiming adds devices by claim code; unassign/delete are bulk operations
// keyed by MAC on the same resource.

use tracing::debug;

use crate::client::MistClient;
use crate::error::Error;
use crate::models::{ClaimResponse, InventoryOp, InventoryOpRequest, InventoryOpResponse};

impl MistClient {
    /// Claim devices into the organization inventory.
    ///
    /// `POST /api/v1/orgs/{org}/inventory` with `["<claim code>", ...]`
    pub async fn claim_inventory(
        &self,
        org_id: &str,
        claim_codes: &[&str],
    ) -> Result<Option<ClaimResponse>, Error> {
        debug!(org_id, count = claim_codes.len(), "claiming devices");
        self.post(format!("orgs/{org_id}/inventory"), claim_codes)
            .await
    }

    /// Run a bulk inventory operation.
    ///
    /// `PUT /api/v1/orgs/{org}/inventory` with `{"op": "...", "macs": [...]}`
    pub async fn inventory_op(
        &self,
        org_id: &str,
        op: InventoryOp,
        macs: &[&str],
    ) -> Result<Option<InventoryOpResponse>, Error> {
        debug!(org_id, %op, ?macs, "inventory operation");
        self.put(
            format!("orgs/{org_id}/inventory"),
            &InventoryOpRequest { op, macs },
        )
        .await
    }
}
