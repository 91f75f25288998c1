//! Bassboost CLI
//!
//! Command-line interface for the stereo bass-boost processor.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use bassboost::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    info!("Bassboost v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd),
        None => {
            println!("Bassboost v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::Process {
            input,
            output,
            effect,
            preset,
            block_frames,
            filter,
        } => {
            let mut config = filter.resolve().context("invalid filter settings")?;
            if let Some(effect) = effect {
                config.effect = effect;
            }
            let frames = commands::process_file(
                &input,
                &output,
                &config,
                preset.map(Into::into),
                block_frames,
            )
            .with_context(|| format!("failed to process {}", input.display()))?;
            println!("Processed {} frames -> {}", frames, output.display());
            Ok(())
        }
        Commands::Coefficients { filter } => {
            let config = filter.resolve().context("invalid filter settings")?;
            commands::print_coefficients(&config)?;
            Ok(())
        }
        Commands::Response {
            frequencies,
            filter,
        } => {
            let config = filter.resolve().context("invalid filter settings")?;
            commands::print_response(&config, &frequencies)?;
            Ok(())
        }
    }
}
