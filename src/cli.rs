use std::path::PathBuf;

use clap::Parser;

/// Watches the default PipeWire sink and shows volume changes through an
/// on-screen display client.
#[derive(Parser, Debug, Default)]
#[command(name = "osd-audio-monitor", version, about)]
pub struct Args {
    /// OSD client to run on every volume change [default: wayland-osd-client]
    #[arg(value_name = "CLIENT_PATH")]
    pub client_path: Option<String>,

    /// Show the audio device name in the OSD
    #[arg(short = 'd', long)]
    pub show_device_name: bool,

    /// File containing device name mappings (`pattern=Display Name` per line)
    #[arg(short = 'm', long, value_name = "FILE")]
    pub device_map: Option<PathBuf>,

    /// Settings file to use instead of the default location
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log debug messages
    #[arg(short, long)]
    pub verbose: bool,
}
