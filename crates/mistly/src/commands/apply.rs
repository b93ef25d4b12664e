//! `mistly apply`: converge the whole deployment document in one pass.
//!
//! Order: site, then every WLAN on it, then the AP (claim, provision,
//! radios) when `--ap` names one. Each step is idempotent, so re-running
//! after a partial failure picks up where it stopped.

use mistly_api::MistClient;
use mistly_core::{CoreError, DeploymentConfig, Site, Wlan};
use tracing::info;

use crate::cli::{ApplyArgs, GlobalOpts};
use crate::error::CliError;

use super::{ap, util};

pub async fn handle(
    client: &MistClient,
    doc: &DeploymentConfig,
    args: ApplyArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    // ── Site ─────────────────────────────────────────────────────────
    let mut site = Site::from_config(client, doc).await?;
    let site_name = site.name().to_owned();
    let outcome = site.create().await?;
    util::report_create(global, "Site", &site_name, &outcome, util::site_id)?;
    let site_id = site
        .remote_id()
        .map(str::to_owned)
        .ok_or_else(|| CliError::NotFound {
            kind: "Site".into(),
            key: site_name.clone(),
        })?;

    // ── WLANs ────────────────────────────────────────────────────────
    for settings in &doc.wlans {
        let mut wlan = Wlan::lookup_or_build_pending(client, site_id.as_str(), settings).await?;
        let outcome = wlan.create().await?;
        util::report_create(global, "WLAN", &settings.ssid, &outcome, |r| r.id.as_str())?;
    }

    // ── AP ───────────────────────────────────────────────────────────
    let Some(mac) = args.ap else {
        info!(site = %site_name, "no AP given, skipping AP lifecycle");
        return Ok(());
    };
    let settings = doc.ap.clone().unwrap_or_default();
    let name = settings
        .name
        .clone()
        .ok_or_else(|| CoreError::MissingField {
            field: "ap.name".into(),
        })?;

    let mut handle = ap::build(client, doc, &mac, Some(site_id)).await?;
    let org_id = client.org_id().to_owned();
    let claimed = handle.claim(&org_id).await?;
    ap::report_claim(global, &handle, claimed)?;
    let provisioned = handle.provision(&name).await?;
    ap::report_provision(global, &handle, provisioned)?;

    if settings.band_24.is_some() && settings.band_5.is_some() {
        if handle.configure_radios().await?.is_none() {
            return Err(CliError::rejected("configure radios on", format!("AP {}", handle.mac())));
        }
        util::status(global, &format!("AP {} radios configured", handle.mac()));
    }
    Ok(())
}
