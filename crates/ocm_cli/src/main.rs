use std::io;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ocm_cli::commands::config_cmd::{self, ConfigCommands};
use ocm_cli::config::{load_effective, GlobalArgs};
use ocm_cli::logging::init_logging;
use ocm_config::ConfigurationDocument;
use tracing::debug;

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

/// OCM CLI: work with the Open Component Model configuration
#[derive(Parser)]
#[command(name = "ocm")]
#[command(about = "Open Component Model command line tool", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the effective configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Show the CLI version
    Version,
}

fn run(cli: &Cli, out: &mut impl io::Write) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Config(cmd) => {
            let effective = prepare(&cli.global)?;
            config_cmd::execute(cmd, &effective, out)?;
        }
        Commands::Version => {
            writeln!(out, "ocm version {}", env!("CARGO_PKG_VERSION"))?;
        }
    }
    Ok(())
}

/// Builds the effective configuration and starts logging from it.
fn prepare(global: &GlobalArgs) -> anyhow::Result<ConfigurationDocument> {
    let effective =
        load_effective(global).context("could not build the effective configuration")?;
    let settings = init_logging(&effective)?;
    debug!(
        level = settings.level.as_str(),
        format = settings.format.as_str(),
        "Logging initialized"
    );
    Ok(effective)
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli, &mut io::stdout().lock()) {
        // Logging is not up yet when the configuration itself failed.
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
