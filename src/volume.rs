//! Perceptual volume scaling.
//!
//! PipeWire stores linear channel volumes. The OSD shows the cube root of
//! that value as a percentage, the same curve `wpctl` and desktop mixers use.

/// Smallest volume increment the mixer reports.
pub const MIN_VOLUME_STEP: f64 = 1.0 / 65536.0;

/// Volume and mute state of one sink as reported by the mixer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeSample {
    /// Linear volume, averaged over channels
    pub volume: f64,
    /// Only used for diagnostics
    pub step: f64,
    pub mute: bool,
}

impl VolumeSample {
    /// Build a sample from the per-channel volumes of a `Props` param.
    /// Returns `None` when the sink reported no channels.
    pub fn from_channel_volumes(channel_volumes: &[f32], mute: bool) -> Option<Self> {
        if channel_volumes.is_empty() {
            return None;
        }
        let sum: f64 = channel_volumes.iter().map(|&v| v as f64).sum();
        Some(Self {
            volume: sum / channel_volumes.len() as f64,
            step: MIN_VOLUME_STEP,
            mute,
        })
    }

    /// Displayed percentage, or `None` if the sample cannot be displayed.
    pub fn percent(&self) -> Option<i32> {
        if !self.volume.is_finite() || self.volume < 0.0 {
            return None;
        }
        Some(volume_percent(self.volume))
    }
}

/// `round(cbrt(volume) * 100)`, rounding halves away from zero.
pub fn volume_percent(volume: f64) -> i32 {
    (volume.cbrt() * 100.0).round() as i32
}
