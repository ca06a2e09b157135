//! Mixer events fire for every sink with a controllable volume. Only the
//! default sink's volume is shown, so everything else is dropped here.

use super::tracker::DefaultSinkState;
use crate::session::{ObjectId, SessionApi, SinkRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterDecision {
    /// Event belongs to the default sink
    Forward(SinkRecord),
    /// Sink exists but is not the default one
    NotDefault,
    /// Sink vanished before the event was handled
    UnknownDevice,
}

pub fn filter_mixer_event(
    api: &impl SessionApi,
    current: &DefaultSinkState,
    id: ObjectId,
) -> FilterDecision {
    let Some(sink) = api.lookup_sink(id) else {
        log::warn!("Failed to find node with id {}", id);
        return FilterDecision::UnknownDevice;
    };

    if current.id != Some(id) {
        log::debug!(
            "Ignoring mixer update for node: id: {}, name: {} as it is not the default node: {} with id: {:?}",
            id,
            sink.name,
            current.name.as_deref().unwrap_or("<none>"),
            current.id
        );
        return FilterDecision::NotDefault;
    }

    FilterDecision::Forward(sink)
}
