mod cli;
mod commands;
mod error;
mod session;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Shell completions need neither a document nor a session
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "mistly", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let doc = session::load_document(&cli.global)?;
            let client = session::connect(&cli.global, &doc).await?;

            tracing::debug!(command = ?cmd, "dispatching command");
            let result = commands::dispatch(cmd, &client, &doc, &cli.global).await;

            // The ephemeral token is revoked even when the command failed
            let closed = client.close().await;
            match result {
                Ok(()) => Ok(closed?),
                Err(err) => {
                    if let Err(close_err) = closed {
                        tracing::warn!(error = %close_err, "could not revoke the session token");
                    }
                    Err(err)
                }
            }
        }
    }
}
