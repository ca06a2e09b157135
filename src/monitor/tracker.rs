//! Default sink tracking
//!
//! The tracker starts out unresolved. Registry installation resolves it
//! from the configured default name and the current default id. After that
//! every default-changed notification re-reads the id, looks the sink up,
//! and replaces the stored identity if either the name or the id differ.
//! PipeWire may hand the same device a new id after a reconnect, and a new
//! device may inherit an old id, so both are compared.

use crate::session::{ObjectId, SessionApi, is_valid_node_id};

/// Identity of the current default sink.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultSinkState {
    pub id: Option<ObjectId>,
    pub name: Option<String>,
}

/// Outcome of a default-changed notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultChange {
    Replaced,
    Unchanged,
    /// Reported id is 0 or `u32::MAX`
    InvalidId,
    /// Reported id is not in the sink registry
    UnknownSink,
    /// Notification arrived before the tracker was resolved
    Unresolved,
}

#[derive(Debug, Default)]
pub struct DefaultSinkTracker {
    state: DefaultSinkState,
    resolved: bool,
}

impl DefaultSinkTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DefaultSinkState {
        &self.state
    }

    #[cfg(test)]
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Initial resolution right after the registry is installed.
    pub fn resolve(&mut self, api: &impl SessionApi) {
        let id = api.default_sink_id();
        self.state = DefaultSinkState {
            id: is_valid_node_id(id).then_some(id),
            name: api.default_configured_sink_name(),
        };
        self.resolved = true;

        log::info!(
            "Default sink: {} with id {:?}",
            self.state.name.as_deref().unwrap_or("<none>"),
            self.state.id
        );
    }

    pub fn on_default_changed(&mut self, api: &impl SessionApi) -> DefaultChange {
        if !self.resolved {
            log::debug!("Default sink changed before resolution, ignoring");
            return DefaultChange::Unresolved;
        }

        let id = api.default_sink_id();
        if !is_valid_node_id(id) {
            log::warn!("Invalid default node id: {}", id);
            return DefaultChange::InvalidId;
        }

        let Some(sink) = api.lookup_sink(id) else {
            log::warn!("Failed to find node with id {}", id);
            return DefaultChange::UnknownSink;
        };

        if self.state.id == Some(id) && self.state.name.as_deref() == Some(sink.name.as_str()) {
            log::debug!("Default node name and id match, ignoring");
            return DefaultChange::Unchanged;
        }

        log::info!(
            "Default node changed to {} ({}) with id {}",
            sink.name,
            sink.display_name(),
            id
        );
        self.state = DefaultSinkState {
            id: Some(id),
            name: Some(sink.name),
        };
        DefaultChange::Replaced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::fake::FakeSession;
    use crate::session::INVALID_ID;

    fn resolved(session: &FakeSession) -> DefaultSinkTracker {
        let mut tracker = DefaultSinkTracker::new();
        tracker.resolve(session);
        tracker
    }

    #[test]
    fn test_resolve_from_configured_name_and_id() {
        let mut session = FakeSession::new().with_sink(40, "alsa_output.pci");
        session.default_id = 40;
        session.configured_name = Some("alsa_output.pci".into());

        let tracker = resolved(&session);
        assert!(tracker.is_resolved());
        assert_eq!(
            tracker.state(),
            &DefaultSinkState {
                id: Some(40),
                name: Some("alsa_output.pci".into()),
            }
        );
    }

    #[test]
    fn test_resolve_without_default() {
        let session = FakeSession::new();
        let tracker = resolved(&session);
        assert_eq!(tracker.state(), &DefaultSinkState::default());
    }

    #[test]
    fn test_identical_notifications_mutate_once() {
        let mut session = FakeSession::new()
            .with_sink(40, "alsa_output.pci")
            .with_sink(41, "alsa_output.usb");
        session.default_id = 40;
        session.configured_name = Some("alsa_output.pci".into());
        let mut tracker = resolved(&session);

        session.default_id = 41;
        assert_eq!(tracker.on_default_changed(&session), DefaultChange::Replaced);
        assert_eq!(tracker.on_default_changed(&session), DefaultChange::Unchanged);
        assert_eq!(tracker.state().id, Some(41));
        assert_eq!(tracker.state().name.as_deref(), Some("alsa_output.usb"));
    }

    #[test]
    fn test_same_name_new_id_is_a_change() {
        let mut session = FakeSession::new().with_sink(40, "alsa_output.usb");
        session.default_id = 40;
        session.configured_name = Some("alsa_output.usb".into());
        let mut tracker = resolved(&session);

        // Device reconnected under a new id
        session.sinks.clear();
        session = session.with_sink(57, "alsa_output.usb");
        session.default_id = 57;
        assert_eq!(tracker.on_default_changed(&session), DefaultChange::Replaced);
        assert_eq!(tracker.state().id, Some(57));
    }

    #[test]
    fn test_same_id_new_name_is_a_change() {
        let mut session = FakeSession::new().with_sink(40, "alsa_output.usb");
        session.default_id = 40;
        session.configured_name = Some("alsa_output.usb".into());
        let mut tracker = resolved(&session);

        session.sinks.clear();
        session = session.with_sink(40, "bluez_output.headset");
        assert_eq!(tracker.on_default_changed(&session), DefaultChange::Replaced);
        assert_eq!(tracker.state().name.as_deref(), Some("bluez_output.headset"));
    }

    #[test]
    fn test_invalid_and_unknown_ids_leave_state_alone() {
        let mut session = FakeSession::new().with_sink(40, "alsa_output.pci");
        session.default_id = 40;
        session.configured_name = Some("alsa_output.pci".into());
        let mut tracker = resolved(&session);
        let before = tracker.state().clone();

        session.default_id = INVALID_ID;
        assert_eq!(tracker.on_default_changed(&session), DefaultChange::InvalidId);
        session.default_id = 0;
        assert_eq!(tracker.on_default_changed(&session), DefaultChange::InvalidId);
        session.default_id = 99;
        assert_eq!(tracker.on_default_changed(&session), DefaultChange::UnknownSink);

        assert_eq!(tracker.state(), &before);
    }

    #[test]
    fn test_unresolved_ignores_changes() {
        let mut session = FakeSession::new().with_sink(40, "alsa_output.pci");
        session.default_id = 40;
        let mut tracker = DefaultSinkTracker::new();
        assert_eq!(tracker.on_default_changed(&session), DefaultChange::Unresolved);
        assert_eq!(tracker.state().id, None);
    }
}
