//! Command dispatch: bridges CLI args -> core reconcilers -> status output.

pub mod ap;
pub mod apply;
pub mod site;
pub mod util;
pub mod wlan;

use mistly_api::MistClient;
use mistly_core::DeploymentConfig;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a cloud-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &MistClient,
    doc: &DeploymentConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Apply(args) => apply::handle(client, doc, args, global).await,
        Command::Site(args) => site::handle(client, doc, args, global).await,
        Command::Wlan(args) => wlan::handle(client, doc, args, global).await,
        Command::Ap(args) => ap::handle(client, doc, args, global).await,
        // Completions are handled before a session is opened
        Command::Completions(_) => unreachable!(),
    }
}
