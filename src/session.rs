mod barrier;
mod loader;
mod manager;
mod props;
mod startup;
mod state;
mod types;

pub use manager::SessionLink;
pub use types::*;

use crate::volume::VolumeSample;

/// Queries the monitor can make against the session manager.
///
/// Implemented by the PipeWire-backed `SessionStore`; the monitor only
/// ever sees this trait.
pub trait SessionApi {
    /// Sink registered under `id`, if it is still present.
    fn lookup_sink(&self, id: ObjectId) -> Option<SinkRecord>;

    /// Id of the current default sink, [`INVALID_ID`] when unknown.
    fn default_sink_id(&self) -> ObjectId;

    /// Node name of the sink the user configured as default.
    fn default_configured_sink_name(&self) -> Option<String>;

    /// Volume state of a sink, `None` if it has no queryable volume.
    fn volume(&self, id: ObjectId) -> Option<VolumeSample>;

    fn has_capability(&self, component: Component) -> bool;
}
