//! WLAN command handlers.

use mistly_api::MistClient;
use mistly_core::{CoreError, DeploymentConfig, Wlan, WlanSettings};

use crate::cli::{GlobalOpts, WlanArgs, WlanCommand};
use crate::error::CliError;

use super::util;

pub async fn handle(
    client: &MistClient,
    doc: &DeploymentConfig,
    args: WlanArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let site = util::existing_site(client, doc).await?;
    let site_id = site.remote_id().unwrap_or_default().to_owned();

    match args.command {
        WlanCommand::Create { ssid } => {
            let settings = doc
                .wlan(&ssid)
                .ok_or_else(|| CoreError::MissingField {
                    field: format!("wlans[{ssid}]"),
                })?;
            let mut wlan = Wlan::lookup_or_build_pending(client, site_id, settings).await?;
            let outcome = wlan.create().await?;
            util::report_create(global, "WLAN", &ssid, &outcome, |r| r.id.as_str())
        }

        WlanCommand::Delete { ssid } => {
            let settings = WlanSettings {
                ssid: ssid.clone(),
                ..WlanSettings::default()
            };
            let mut wlan = Wlan::lookup_or_build_pending(client, site_id, &settings).await?;
            if !wlan.delete().await? {
                return Err(CliError::rejected("delete", format!("WLAN '{ssid}'")));
            }
            util::status(global, &format!("WLAN '{ssid}' deleted"));
            Ok(())
        }
    }
}
