mod cli;
mod commands;
mod config;
mod terminal_progress_reporter;

use std::{io, process};

use clap::Parser;
use overlay::{
    config::{AppConfigBuilder, ApplyToConfig, ConfigLoadError, ConfigLoader, YamlLoader},
    fs::RealFileSystem,
    manager::YamlOverlayRegistry,
};
use terminal_progress_reporter::TerminalProgressReporter;
use tracing::{Level, debug};

use crate::{cli::ClapCli, commands::dispatch_command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Usage errors exit with 1, help and version with 0
    let args = match ClapCli::try_parse() {
        Ok(args) => args,
        Err(e) => {
            e.print()?;
            process::exit(i32::from(e.use_stderr()));
        }
    };

    let fs = RealFileSystem;

    let config = {
        // 1. Load config.yaml; an explicit --state-file makes it optional
        let config = match YamlLoader::new(&fs).load_config() {
            Ok(config) => config,
            Err(ConfigLoadError::NotFound { .. }) if args.state_file.is_some() => {
                AppConfigBuilder::default().build()
            }
            Err(e) => return Err(e.into()),
        };

        // 2. Apply CLI args to config (overriding)
        args.apply_to_config(config)
    };

    init_tracing(config.debug());
    debug!("CLI arguments: {:#?}", &args);
    debug!("Final config: {:#?}", &config);

    let reporter = TerminalProgressReporter::new(config.use_colors());
    let manager = YamlOverlayRegistry::new(fs, config.state_file().clone());

    // 3. Dispatch and execute the requested command
    let exit_code = dispatch_command(
        &args.command,
        &manager,
        &config,
        reporter,
        &mut io::stdout().lock(),
    )
    .await;

    process::exit(exit_code)
}

fn init_tracing(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::WARN };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
