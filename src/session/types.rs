use std::fmt;

/// Unique identifier for PipeWire objects
pub type ObjectId = u32;

/// Reserved id PipeWire uses for "no object".
pub const INVALID_ID: ObjectId = u32::MAX;

/// Media class of the devices the monitor cares about.
pub const AUDIO_SINK_CLASS: &str = "Audio/Sink";

/// Ids 0 (the core) and `u32::MAX` never name a sink.
pub fn is_valid_node_id(id: ObjectId) -> bool {
    id > 0 && id < INVALID_ID
}

/// An audio output device announced by the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkRecord {
    pub id: ObjectId,
    /// `node.name`, the stable identifier used by the default metadata
    pub name: String,
    /// `node.description`, falling back to `node.nick`
    pub description: String,
}

impl SinkRecord {
    pub fn display_name(&self) -> &str {
        if !self.description.is_empty() {
            &self.description
        } else if !self.name.is_empty() {
            &self.name
        } else {
            "Unknown"
        }
    }
}

/// Session manager extensions the monitor depends on.
///
/// Each one is loaded once, activated once, and then used for the lifetime
/// of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// Resolves which sink is the default output
    DefaultNodes,
    /// Exposes per-sink volume and mute state
    Mixer,
}

impl Component {
    pub fn name(&self) -> &'static str {
        match self {
            Component::DefaultNodes => "default-nodes-api",
            Component::Mixer => "mixer-api",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Notifications delivered to the monitor once the registry is installed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Volume or mute of some sink changed (not necessarily the default one)
    MixerChanged(ObjectId),
    /// The default output device changed
    DefaultChanged,
}
