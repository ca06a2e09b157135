//! Decoding of the two PipeWire payloads the monitor reads: node `Props`
//! params (volume and mute) and `default` metadata values.

use libspa::pod::deserialize::PodDeserializer;
use libspa::pod::{Object, Pod, Value, ValueArray};
use serde::Deserialize;

/// Metadata key holding the current default sink.
pub const DEFAULT_SINK_KEY: &str = "default.audio.sink";

/// Metadata key holding the user's configured default sink.
pub const CONFIGURED_SINK_KEY: &str = "default.configured.audio.sink";

/// Fields of interest from one `Props` param. Either may be missing when
/// the node only reported part of its properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropsUpdate {
    pub channel_volumes: Option<Vec<f32>>,
    pub mute: Option<bool>,
}

pub fn parse_props(pod: &Pod) -> Option<PropsUpdate> {
    let (_, value) = PodDeserializer::deserialize_any_from(pod.as_bytes()).ok()?;
    props_from_value(value)
}

pub fn props_from_value(value: Value) -> Option<PropsUpdate> {
    let Value::Object(Object { properties, .. }) = value else {
        return None;
    };

    let mut update = PropsUpdate::default();
    for prop in properties {
        match (prop.key, prop.value) {
            (libspa::sys::SPA_PROP_channelVolumes, Value::ValueArray(ValueArray::Float(v))) => {
                update.channel_volumes = Some(v);
            }
            (libspa::sys::SPA_PROP_mute, Value::Bool(mute)) => {
                update.mute = Some(mute);
            }
            _ => {}
        }
    }

    if update == PropsUpdate::default() {
        None
    } else {
        Some(update)
    }
}

#[derive(Deserialize)]
struct MetadataName {
    name: String,
}

/// Extract the node name from a `{"name": "..."}` metadata value.
pub fn parse_metadata_name(value: &str) -> Option<String> {
    match serde_json::from_str::<MetadataName>(value) {
        Ok(m) => Some(m.name),
        Err(e) => {
            log::warn!("Unparseable default metadata value {:?}: {}", value, e);
            None
        }
    }
}
