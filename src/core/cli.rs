use clap::{arg, command, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
    #[arg(short, long)]
    pub configuration_file: Option<String>,
    #[arg(short, long)]
    pub verbosity: Option<log::LevelFilter>,
}

#[derive(Subcommand)]
pub enum Command {
    /// runs tasks, raffle and prize claiming for every account then sends the report (default)
    Run,
    /// checks that every account can obtain a market session
    SessionDiagnostic {
        /// show the tokens
        show_token: Option<bool>,
    },
}
