//! Monitor core
//!
//! Owns the default sink tracker, the device name table and the launcher,
//! and turns session events into OSD invocations. Independent of PipeWire:
//! everything it needs goes through [`SessionApi`].

pub mod filter;
pub mod tracker;

#[cfg(test)]
pub mod fake;

pub use filter::{FilterDecision, filter_mixer_event};
pub use tracker::DefaultSinkTracker;

use crate::error::MonitorError;
use crate::launcher::{Launch, OsdRequest};
use crate::mapping::DeviceMappingTable;
use crate::session::{Component, ObjectId, SessionApi, SessionEvent};

pub struct Monitor<L> {
    tracker: DefaultSinkTracker,
    mappings: DeviceMappingTable,
    show_device_name: bool,
    launcher: L,
}

impl<L: Launch> Monitor<L> {
    pub fn new(launcher: L, mappings: DeviceMappingTable, show_device_name: bool) -> Self {
        Self {
            tracker: DefaultSinkTracker::new(),
            mappings,
            show_device_name,
            launcher,
        }
    }

    /// Called once, when the sink registry finished its initial population.
    pub fn on_installed(&mut self, api: &impl SessionApi) -> Result<(), MonitorError> {
        log::debug!("Object manager installed");

        for component in [Component::DefaultNodes, Component::Mixer] {
            if !api.has_capability(component) {
                return Err(MonitorError::CapabilityMissing(component));
            }
        }

        self.tracker.resolve(api);
        Ok(())
    }

    #[cfg(test)]
    pub fn tracker(&self) -> &DefaultSinkTracker {
        &self.tracker
    }

    #[cfg(test)]
    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    pub fn handle_event(
        &mut self,
        api: &impl SessionApi,
        event: SessionEvent,
    ) -> Result<(), MonitorError> {
        match event {
            SessionEvent::MixerChanged(id) => self.on_mixer_changed(api, id),
            SessionEvent::DefaultChanged => {
                self.tracker.on_default_changed(api);
                Ok(())
            }
        }
    }

    fn on_mixer_changed(&mut self, api: &impl SessionApi, id: ObjectId) -> Result<(), MonitorError> {
        log::debug!("on_mixer_changed: {}", id);

        let sink = match filter_mixer_event(api, self.tracker.state(), id) {
            FilterDecision::Forward(sink) => sink,
            FilterDecision::NotDefault | FilterDecision::UnknownDevice => return Ok(()),
        };

        let sample = api.volume(id).ok_or(MonitorError::VolumeUnsupported(id))?;
        let volume_percent = sample.percent().ok_or(MonitorError::VolumeUnsupported(id))?;

        log::info!(
            "Volume of {}: {}, min_step: {}, muted: {}",
            sink.display_name(),
            volume_percent,
            sample.step,
            sample.mute
        );

        let device = if self.show_device_name {
            self.tracker
                .state()
                .name
                .as_deref()
                .map(|name| self.mappings.map(name).to_string())
        } else {
            None
        };

        let request = OsdRequest {
            volume_percent,
            muted: sample.mute,
            device,
        };
        log::info!(
            "Running client with volume: {}%, muted: {}, device: {}",
            request.volume_percent,
            request.muted,
            request.device.as_deref().unwrap_or("-")
        );
        self.launcher.launch(&request);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::DeviceMapping;
    use super::fake::{FakeSession, RecordingLauncher};

    fn two_sinks() -> FakeSession {
        let mut session = FakeSession::new()
            .with_sink(40, "alsa_output.pci")
            .with_sink(41, "alsa_output.usb-Headset");
        session.default_id = 40;
        session.configured_name = Some("alsa_output.pci".into());
        session.set_volume(40, 0.421875, false);
        session.set_volume(41, 1.0, true);
        session
    }

    fn installed(
        session: &FakeSession,
        mappings: DeviceMappingTable,
        show_device_name: bool,
    ) -> Monitor<RecordingLauncher> {
        let mut monitor = Monitor::new(RecordingLauncher::default(), mappings, show_device_name);
        monitor.on_installed(session).unwrap();
        monitor
    }

    #[test]
    fn test_default_sink_volume_launches_client() {
        let session = two_sinks();
        let mut monitor = installed(&session, DeviceMappingTable::default(), false);

        monitor
            .handle_event(&session, SessionEvent::MixerChanged(40))
            .unwrap();

        assert_eq!(
            monitor.launcher.requests,
            vec![OsdRequest {
                volume_percent: 75,
                muted: false,
                device: None,
            }]
        );
        assert_eq!(monitor.launcher.requests[0].args(), ["audio", "75"]);
    }

    #[test]
    fn test_other_sink_is_ignored() {
        let session = two_sinks();
        let mut monitor = installed(&session, DeviceMappingTable::default(), false);

        monitor
            .handle_event(&session, SessionEvent::MixerChanged(41))
            .unwrap();
        monitor
            .handle_event(&session, SessionEvent::MixerChanged(99))
            .unwrap();

        assert!(monitor.launcher.requests.is_empty());
    }

    #[test]
    fn test_follows_default_change() {
        let mut session = two_sinks();
        let mut monitor = installed(&session, DeviceMappingTable::default(), true);

        session.default_id = 41;
        monitor
            .handle_event(&session, SessionEvent::DefaultChanged)
            .unwrap();
        monitor
            .handle_event(&session, SessionEvent::MixerChanged(40))
            .unwrap();
        monitor
            .handle_event(&session, SessionEvent::MixerChanged(41))
            .unwrap();

        assert_eq!(
            monitor.launcher.requests[0].args(),
            ["audio", "100", "--mute", "--device", "alsa_output.usb-Headset"]
        );
        assert_eq!(monitor.launcher.requests.len(), 1);
    }

    #[test]
    fn test_device_name_mapping_applied() {
        let session = two_sinks();
        let mappings = DeviceMappingTable::new(vec![
            DeviceMapping {
                pattern: "usb".into(),
                display_name: "Headset".into(),
            },
            DeviceMapping {
                pattern: "pci".into(),
                display_name: "Speakers".into(),
            },
        ]);
        let mut monitor = installed(&session, mappings, true);

        monitor
            .handle_event(&session, SessionEvent::MixerChanged(40))
            .unwrap();

        assert_eq!(
            monitor.launcher.requests[0].device.as_deref(),
            Some("Speakers")
        );
    }

    #[test]
    fn test_missing_volume_is_fatal() {
        let mut session = two_sinks();
        session.volumes.clear();
        let mut monitor = installed(&session, DeviceMappingTable::default(), false);

        let err = monitor
            .handle_event(&session, SessionEvent::MixerChanged(40))
            .unwrap_err();
        assert!(matches!(err, MonitorError::VolumeUnsupported(40)));
        assert!(monitor.launcher.requests.is_empty());
    }

    #[test]
    fn test_missing_capability_is_fatal() {
        let mut session = two_sinks();
        session.capabilities = vec![Component::DefaultNodes];

        let mut monitor = Monitor::new(
            RecordingLauncher::default(),
            DeviceMappingTable::default(),
            false,
        );
        let err = monitor.on_installed(&session).unwrap_err();
        assert!(matches!(
            err,
            MonitorError::CapabilityMissing(Component::Mixer)
        ));
        assert!(!monitor.tracker.is_resolved());
    }
}
