use std::collections::{HashMap, HashSet};

use super::SessionApi;
use super::props::{self, PropsUpdate};
use super::types::*;
use crate::volume::VolumeSample;

/// Live view of the audio sinks announced by the registry.
#[derive(Debug, Default)]
pub struct SinkRegistry {
    sinks: HashMap<ObjectId, SinkRecord>,
    installed: bool,
}

impl SinkRegistry {
    pub fn insert(&mut self, sink: SinkRecord) {
        self.sinks.insert(sink.id, sink);
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<SinkRecord> {
        self.sinks.remove(&id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&SinkRecord> {
        self.sinks.get(&id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&SinkRecord> {
        self.sinks.values().find(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn mark_installed(&mut self) {
        self.installed = true;
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }
}

/// Everything the monitor can query, as cached from PipeWire events.
///
/// Queries against a capability that is not active yet answer as if the
/// object did not exist.
#[derive(Debug, Default)]
pub struct SessionStore {
    pub sinks: SinkRegistry,
    volumes: HashMap<ObjectId, VolumeSample>,
    default_sink_name: Option<String>,
    configured_sink_name: Option<String>,
    active: HashSet<Component>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activate(&mut self, component: Component) {
        self.active.insert(component);
    }

    pub fn is_active(&self, component: Component) -> bool {
        self.active.contains(&component)
    }

    pub fn remove_sink(&mut self, id: ObjectId) -> Option<SinkRecord> {
        self.volumes.remove(&id);
        self.sinks.remove(id)
    }

    /// Apply one property of the `default` metadata. A `None` key clears all
    /// of them. Returns true if the current default sink name changed.
    pub fn set_default_metadata(&mut self, key: Option<&str>, value: Option<&str>) -> bool {
        let name = value.and_then(props::parse_metadata_name);
        match key {
            Some(props::DEFAULT_SINK_KEY) => {
                let changed = self.default_sink_name != name;
                self.default_sink_name = name;
                changed
            }
            Some(props::CONFIGURED_SINK_KEY) => {
                self.configured_sink_name = name;
                false
            }
            Some(_) => false,
            None => {
                self.configured_sink_name = None;
                self.default_sink_name.take().is_some()
            }
        }
    }

    /// Merge a `Props` update into the cached sample for `id`. Returns true
    /// if a previously known volume or mute state changed.
    pub fn update_volume(&mut self, id: ObjectId, update: PropsUpdate) -> bool {
        let previous = self.volumes.get(&id).copied();
        let mute = update
            .mute
            .or(previous.map(|p| p.mute))
            .unwrap_or(false);

        let next = match update.channel_volumes {
            Some(ref volumes) => VolumeSample::from_channel_volumes(volumes, mute).or(previous),
            None => previous.map(|p| VolumeSample { mute, ..p }),
        };

        let Some(next) = next else {
            return false;
        };
        self.volumes.insert(id, next);
        previous.is_some_and(|p| p != next)
    }
}

impl SessionApi for SessionStore {
    fn lookup_sink(&self, id: ObjectId) -> Option<SinkRecord> {
        self.sinks.get(id).cloned()
    }

    fn default_sink_id(&self) -> ObjectId {
        if !self.is_active(Component::DefaultNodes) {
            return INVALID_ID;
        }
        self.default_sink_name
            .as_deref()
            .and_then(|name| self.sinks.find_by_name(name))
            .map(|s| s.id)
            .unwrap_or(INVALID_ID)
    }

    fn default_configured_sink_name(&self) -> Option<String> {
        if !self.is_active(Component::DefaultNodes) {
            return None;
        }
        self.configured_sink_name.clone()
    }

    fn volume(&self, id: ObjectId) -> Option<VolumeSample> {
        if !self.is_active(Component::Mixer) {
            return None;
        }
        self.volumes.get(&id).copied()
    }

    fn has_capability(&self, component: Component) -> bool {
        self.is_active(component)
    }
}
