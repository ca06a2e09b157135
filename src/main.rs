//! osd-audio-monitor - volume OSD trigger for PipeWire
//!
//! Follows the default audio sink and runs an on-screen display client
//! whenever its volume or mute state changes.

mod cli;
mod config;
mod error;
mod launcher;
mod mapping;
mod monitor;
mod session;
mod volume;

use std::process::ExitCode;

use clap::Parser;

use cli::Args;
use config::{Config, Settings};
use error::MonitorError;
use launcher::ClientLauncher;
use mapping::DeviceMappingTable;
use monitor::Monitor;
use session::SessionLink;

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), MonitorError> {
    let config = Config::load(args.config.as_deref())?;
    let settings = Settings::resolve(args, config);

    let client_path = launcher::resolve_client_path(&settings.client)?;
    launcher::validate_client(&client_path)?;

    let mappings = match settings.device_map {
        Some(ref path) => {
            log::info!("Loading device mappings from: {}", path.display());
            DeviceMappingTable::load(path)?
        }
        None => DeviceMappingTable::default(),
    };

    log::info!("Using client path: {}", client_path.display());
    if settings.show_device_name {
        log::info!("Device name display enabled");
    }
    if !mappings.is_empty() {
        log::info!("Loaded {} device name mappings", mappings.len());
    }

    log::info!("Connecting to PipeWire...");
    let link = SessionLink::connect()?;

    log::info!("Starting osd-audio-monitor");
    let monitor = Monitor::new(
        ClientLauncher::new(client_path),
        mappings,
        settings.show_device_name,
    );
    link.run(monitor)
}
