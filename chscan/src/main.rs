//! chscan: build a mirakc/Mirakurun style channel list by scanning tuners.

use std::process::ExitCode;

use clap::{CommandFactory, FromArgMatches};
use log::{error, info};

use chscan::config::{ConfigFile, ScanConfig, DEFAULT_RETENTION_DAYS};
use chscan::context::{requested_bands, Cli};
use chscan::logging::{init_logging, LogOptions};
use chscan::{output, Orchestrator};

#[tokio::main]
async fn main() -> ExitCode {
    let mut command = Cli::command();
    let matches = command.clone().get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    let bands = requested_bands(&matches);
    if bands.is_empty() {
        eprintln!("Nothing to do");
        eprintln!("{}", command.render_help());
        return ExitCode::from(1);
    }

    let (file_config, config_path) = match ConfigFile::discover(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(1);
        }
    };

    // Command line takes precedence over the config file
    let log_dir = cli.log_dir.clone().or_else(|| file_config.logging.log_dir.clone());
    let log_options = LogOptions {
        verbose: cli.verbose,
        level: file_config.logging.level.as_deref(),
        log_dir: log_dir.as_deref(),
        retention_days: file_config
            .logging
            .retention_days
            .unwrap_or(DEFAULT_RETENTION_DAYS),
    };
    let _log_guard = match init_logging(&log_options) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(1);
        }
    };

    if let Some(path) = &config_path {
        info!("Loaded config from: {}", path.display());
    }

    let config = match ScanConfig::resolve(&cli, &bands, &file_config) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(1);
        }
    };

    info!("chscan starting...");
    info!("  recpt1: {}", config.recpt1.display());
    info!("  epgdump: {}", config.epgdump.display());
    info!("  Tuners: {}", config.tuners);
    info!("  Seconds per channel: {}", config.seconds);
    for channel_type in &config.channel_types {
        info!("  {}: {} channel(s)", channel_type.name(), channel_type.channels.len());
    }

    let channels = match Orchestrator::new(config).run().await {
        Ok(channels) => channels,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(1);
        }
    };

    if let Err(e) = output::emit_channels(&channels, cli.output.as_deref()) {
        error!("{}", e);
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}
