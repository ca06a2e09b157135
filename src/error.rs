use std::path::PathBuf;

use crate::session::{Component, ObjectId};

/// Everything that stops the monitor.
///
/// Transient conditions (an event for a vanished sink, an out-of-range
/// default id, a default change that changes nothing) are not errors and
/// never show up here.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("Client not found at '{}'", .0.display())]
    ClientNotFound(PathBuf),

    #[error("Client at '{}' is not executable", .0.display())]
    ClientNotExecutable(PathBuf),

    #[error("Client '{name}' not found in PATH: {source}")]
    ClientNotInPath {
        name: String,
        #[source]
        source: which::Error,
    },

    #[error("Failed to read device mapping file {}: {source}", .path.display())]
    MappingFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to connect to PipeWire daemon: {0}")]
    Connect(#[from] pipewire::Error),

    #[error("Failed to load {component}: {reason}")]
    ComponentLoad { component: Component, reason: String },

    #[error("Error activating {component}: {reason}")]
    Activation { component: Component, reason: String },

    #[error("{0} not loaded")]
    CapabilityMissing(Component),

    #[error("Failed to install sink registry: {0}")]
    Install(String),

    #[error("Node {0} doesn't support volume")]
    VolumeUnsupported(ObjectId),

    #[error("PipeWire connection lost: {0}")]
    Disconnected(String),
}
