//! In-memory stand-ins for the session manager and the OSD client.

use std::collections::HashMap;

use crate::launcher::{Launch, OsdRequest};
use crate::session::{Component, INVALID_ID, ObjectId, SessionApi, SinkRecord};
use crate::volume::{MIN_VOLUME_STEP, VolumeSample};

pub struct FakeSession {
    pub sinks: HashMap<ObjectId, SinkRecord>,
    pub default_id: ObjectId,
    pub configured_name: Option<String>,
    pub volumes: HashMap<ObjectId, VolumeSample>,
    pub capabilities: Vec<Component>,
}

impl FakeSession {
    pub fn new() -> Self {
        Self {
            sinks: HashMap::new(),
            default_id: INVALID_ID,
            configured_name: None,
            volumes: HashMap::new(),
            capabilities: vec![Component::DefaultNodes, Component::Mixer],
        }
    }

    pub fn with_sink(mut self, id: ObjectId, name: &str) -> Self {
        self.sinks.insert(
            id,
            SinkRecord {
                id,
                name: name.into(),
                description: String::new(),
            },
        );
        self
    }

    pub fn set_volume(&mut self, id: ObjectId, volume: f64, mute: bool) {
        self.volumes.insert(
            id,
            VolumeSample {
                volume,
                step: MIN_VOLUME_STEP,
                mute,
            },
        );
    }
}

impl SessionApi for FakeSession {
    fn lookup_sink(&self, id: ObjectId) -> Option<SinkRecord> {
        self.sinks.get(&id).cloned()
    }

    fn default_sink_id(&self) -> ObjectId {
        self.default_id
    }

    fn default_configured_sink_name(&self) -> Option<String> {
        self.configured_name.clone()
    }

    fn volume(&self, id: ObjectId) -> Option<VolumeSample> {
        self.volumes.get(&id).copied()
    }

    fn has_capability(&self, component: Component) -> bool {
        self.capabilities.contains(&component)
    }
}

#[derive(Default)]
pub struct RecordingLauncher {
    pub requests: Vec<OsdRequest>,
}

impl Launch for RecordingLauncher {
    fn launch(&mut self, request: &OsdRequest) {
        self.requests.push(request.clone());
    }
}
