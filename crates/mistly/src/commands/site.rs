//! Site command handlers.

use mistly_api::MistClient;
use mistly_core::{DeploymentConfig, Site};

use crate::cli::{GlobalOpts, SiteArgs, SiteCommand};
use crate::error::CliError;

use super::util;

pub async fn handle(
    client: &MistClient,
    doc: &DeploymentConfig,
    args: SiteArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut site = Site::from_config(client, doc).await?;
    let name = site.name().to_owned();

    match args.command {
        SiteCommand::Create => {
            let outcome = site.create().await?;
            util::report_create(global, "Site", &name, &outcome, util::site_id)
        }

        SiteCommand::Delete => {
            if !site.delete().await? {
                return Err(CliError::rejected("delete", format!("Site '{name}'")));
            }
            util::status(global, &format!("Site '{name}' deleted"));
            Ok(())
        }

        SiteCommand::Persist { state } => {
            if site.configure_persistence(state.is_on()).await?.is_none() {
                return Err(CliError::rejected(
                    "update configuration persistence on",
                    format!("Site '{name}'"),
                ));
            }
            let word = if state.is_on() { "enabled" } else { "disabled" };
            util::status(global, &format!("Configuration persistence {word} on site '{name}'"));
            Ok(())
        }

        SiteCommand::RfTemplate { id } => {
            if site.assign_rf_template(&id).await?.is_none() {
                return Err(CliError::rejected("assign RF template to", format!("Site '{name}'")));
            }
            util::status(global, &format!("RF template {id} assigned to site '{name}'"));
            Ok(())
        }

        SiteCommand::Sitegroups { ids } => {
            if site.assign_sitegroups(&ids).await?.is_none() {
                return Err(CliError::rejected("assign site groups to", format!("Site '{name}'")));
            }
            util::status(global, &format!("Site '{name}' now in groups {}", ids.join(", ")));
            Ok(())
        }
    }
}
