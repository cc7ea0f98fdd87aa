use clap::Parser;
use log::warn;

use crate::core::{
    accounts::{parse_accounts, print_usage, read_accounts_from_env},
    cli::{Cli, Command},
    configuration::{get_configuration, Configuration},
    logger,
};

mod core;
mod notifiers;
mod report;
mod workflow;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let conf = match &cli.configuration_file {
        Some(path) => get_configuration(path.to_owned()).await?,
        None => Configuration::default(),
    };

    let _logger = logger::init(&conf.log, cli.verbosity)?;

    if let Err(e) = conf.assert_api_urls_are_valid() {
        warn!("{e}");
    }

    if let Err(e) = conf.assert_webhook_is_valid() {
        warn!("{e}");
    }

    let raw = match read_accounts_from_env() {
        Some(r) => r,
        None => {
            print_usage();
            std::process::exit(1);
        }
    };

    let accounts = parse_accounts(&raw);

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            crate::core::core::run(conf, accounts).await;
        }
        Command::SessionDiagnostic { show_token } => {
            crate::core::core::session_diagnostic(conf, accounts, show_token.unwrap_or(false))
                .await?;
        }
    }

    Ok(())
}
