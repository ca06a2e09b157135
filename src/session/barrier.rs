//! Fan-out/join over capability activations.
//!
//! The pending count is raised before each activation request goes out, so
//! it can never be observed at zero while requests are still outstanding.
//! The join (registry installation) fires exactly once, when the count
//! drops back to zero.

use super::types::Component;
use crate::error::MonitorError;

#[derive(Debug, Default)]
pub struct ActivationBarrier {
    pending: u32,
    fired: bool,
}

impl ActivationBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue one activation per component through `issue`, counting each
    /// one before it is issued.
    pub fn activate_all(&mut self, components: &[Component], mut issue: impl FnMut(Component)) {
        for &component in components {
            self.pending += 1;
            log::debug!("Activating {} ({} pending)", component, self.pending);
            issue(component);
        }
    }

    #[cfg(test)]
    pub fn pending(&self) -> u32 {
        self.pending
    }

    /// Record a completed activation. Returns `Ok(true)` exactly once, when
    /// the last outstanding activation has succeeded.
    pub fn complete(
        &mut self,
        component: Component,
        result: Result<(), String>,
    ) -> Result<bool, MonitorError> {
        if let Err(reason) = result {
            return Err(MonitorError::Activation { component, reason });
        }

        log::info!("Capability activated: {}", component);

        if self.pending == 0 {
            log::warn!("Unexpected activation completion for {}", component);
            return Ok(false);
        }

        self.pending -= 1;
        if self.pending == 0 && !self.fired {
            self.fired = true;
            return Ok(true);
        }
        Ok(false)
    }
}
