//! Shared helpers for command handlers.

use mistly_api::MistClient;
use mistly_api::models::SiteRecord;
use mistly_core::{CreateOutcome, DeploymentConfig, Site};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Print a status line to stderr unless `--quiet`.
pub fn status(global: &GlobalOpts, message: &str) {
    if !global.quiet {
        eprintln!("{message}");
    }
}

/// The configured site, which must already exist on the cloud.
pub async fn existing_site<'c>(
    client: &'c MistClient,
    doc: &DeploymentConfig,
) -> Result<Site<'c>, CliError> {
    let site = Site::from_config(client, doc).await?;
    if site.remote_id().is_none() {
        return Err(CliError::NotFound {
            kind: "Site".into(),
            key: site.name().into(),
        });
    }
    Ok(site)
}

/// Report a site/WLAN create outcome; a rejected create is an error.
pub fn report_create<R>(
    global: &GlobalOpts,
    kind: &str,
    key: &str,
    outcome: &CreateOutcome<R>,
    id_of: impl Fn(&R) -> &str,
) -> Result<(), CliError> {
    match outcome {
        CreateOutcome::Created(record) => {
            status(global, &format!("{kind} '{key}' created ({})", id_of(record)));
            Ok(())
        }
        CreateOutcome::AlreadyExists { id } => {
            status(global, &format!("{kind} '{key}' already exists ({id})"));
            Ok(())
        }
        CreateOutcome::Rejected => Err(CliError::rejected("create", format!("{kind} '{key}'"))),
    }
}

pub fn site_id(record: &SiteRecord) -> &str {
    &record.id
}
