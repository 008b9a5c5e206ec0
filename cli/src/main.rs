mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
  let cli_args = Cli::parse();

  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli_args.log));
  tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_thread_names(true)
    .with_writer(std::io::stderr)
    .init();

  tracing::debug!(command = ?cli_args.command, "rlaunch starting");
  match cli_args.command {
    Commands::Race(args) => commands::race::run(args),
    Commands::Delay(args) => commands::delay::run(args),
    Commands::Burst(args) => commands::burst::run(args),
  }
}
