//! AP lifecycle command handlers.

use mistly_api::MistClient;
use mistly_core::{
    Ap, ClaimOutcome, CoreError, DeploymentConfig, MacAddress, ProvisionOutcome, Site,
};

use crate::cli::{ApArgs, ApCommand, GlobalOpts};
use crate::error::CliError;

use super::util;

/// Remote id of the configured site, when the document names one that exists.
async fn resolve_site_id(
    client: &MistClient,
    doc: &DeploymentConfig,
) -> Result<Option<String>, CliError> {
    if doc.site.is_none() {
        return Ok(None);
    }
    let site = Site::from_config(client, doc).await?;
    Ok(site.remote_id().map(str::to_owned))
}

pub(super) async fn build<'c>(
    client: &'c MistClient,
    doc: &DeploymentConfig,
    mac: &str,
    site_id: Option<String>,
) -> Result<Ap<'c>, CliError> {
    let settings = doc.ap.clone().unwrap_or_default();
    Ok(Ap::lookup_or_build_pending(client, MacAddress::new(mac), site_id, settings).await?)
}

pub(super) fn report_claim(
    global: &GlobalOpts,
    ap: &Ap<'_>,
    outcome: ClaimOutcome,
) -> Result<(), CliError> {
    match outcome {
        ClaimOutcome::Claimed => util::status(global, &format!("AP {} claimed", ap.mac())),
        ClaimOutcome::AlreadyClaimed => {
            util::status(global, &format!("AP {} already claimed", ap.mac()));
        }
        ClaimOutcome::Rejected => {
            return Err(CliError::rejected("claim", format!("AP {}", ap.mac())));
        }
    }
    Ok(())
}

pub(super) fn report_provision(
    global: &GlobalOpts,
    ap: &Ap<'_>,
    outcome: ProvisionOutcome,
) -> Result<(), CliError> {
    match outcome {
        ProvisionOutcome::Provisioned => {
            util::status(global, &format!("AP {} provisioned", ap.mac()));
        }
        ProvisionOutcome::AlreadyAssigned => {
            util::status(global, &format!("AP {} already on its site", ap.mac()));
        }
        ProvisionOutcome::Rejected => {
            return Err(CliError::rejected("provision", format!("AP {}", ap.mac())));
        }
    }
    Ok(())
}

pub async fn handle(
    client: &MistClient,
    doc: &DeploymentConfig,
    args: ApArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let org_id = client.org_id().to_owned();
    let site_id = resolve_site_id(client, doc).await?;

    match args.command {
        ApCommand::Claim { mac } => {
            let mut ap = build(client, doc, &mac, site_id).await?;
            let outcome = ap.claim(&org_id).await?;
            report_claim(global, &ap, outcome)
        }

        ApCommand::Provision { mac, name } => {
            let name = name
                .or_else(|| doc.ap.as_ref().and_then(|a| a.name.clone()))
                .ok_or_else(|| CoreError::MissingField {
                    field: "ap.name".into(),
                })?;
            let mut ap = build(client, doc, &mac, site_id).await?;
            let outcome = ap.provision(&name).await?;
            report_provision(global, &ap, outcome)
        }

        ApCommand::Radios { mac } => {
            let mut ap = build(client, doc, &mac, site_id).await?;
            if ap.configure_radios().await?.is_none() {
                return Err(CliError::rejected("configure radios on", format!("AP {}", ap.mac())));
            }
            util::status(global, &format!("AP {} radios configured", ap.mac()));
            Ok(())
        }

        ApCommand::Unassign { mac } => {
            let mut ap = build(client, doc, &mac, site_id).await?;
            if ap.unassign(&org_id).await? {
                util::status(global, &format!("AP {} unassigned", ap.mac()));
            } else if ap.state().assigned {
                return Err(CliError::rejected("unassign", format!("AP {}", ap.mac())));
            } else {
                util::status(global, &format!("AP {} is not assigned to a site", ap.mac()));
            }
            Ok(())
        }

        ApCommand::Release { mac } => {
            let mut ap = build(client, doc, &mac, site_id).await?;
            if ap.release(&org_id).await? {
                util::status(global, &format!("AP {} released", ap.mac()));
            } else if ap.state().claimed {
                return Err(CliError::rejected("release", format!("AP {}", ap.mac())));
            } else {
                util::status(global, &format!("AP {} is not in the inventory", ap.mac()));
            }
            Ok(())
        }
    }
}
