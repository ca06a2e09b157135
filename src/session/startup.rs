//! Startup sequencing: load → activate → install, then event delivery.
//!
//! Every step is a core round-trip. Loading a component is a bare
//! round-trip with no further check: neither the default-nodes nor the
//! mixer load looks at what the daemon has published, and the only way
//! either can fail is a core error on its sync. A `default` metadata object
//! that shows up late is bound whenever it appears; until then the default
//! sink id reads as invalid and the tracker stays at "no default".
//!
//! [`StartupSequence::complete`] is a pure transition: it consumes one
//! finished step and returns the steps to issue next. The session link
//! only turns those into round-trips.

use super::barrier::ActivationBarrier;
use super::loader::{ComponentLoader, LoadStep};
use super::state::SessionStore;
use super::types::*;
use crate::error::MonitorError;
use crate::launcher::Launch;
use crate::monitor::Monitor;

/// Asynchronous startup steps, each completed by a core round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingOp {
    Load(Component),
    Activate(Component),
    Install,
}

impl PendingOp {
    pub fn failure(self, reason: String) -> MonitorError {
        match self {
            PendingOp::Load(component) => MonitorError::ComponentLoad { component, reason },
            PendingOp::Activate(component) => MonitorError::Activation { component, reason },
            PendingOp::Install => MonitorError::Install(reason),
        }
    }
}

#[derive(Debug, Default)]
pub struct StartupSequence {
    loader: ComponentLoader,
    barrier: ActivationBarrier,
}

impl StartupSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first(&self) -> PendingOp {
        PendingOp::Load(self.loader.first())
    }

    /// Feed the result of a finished step and get the steps to issue next.
    pub fn complete<L: Launch>(
        &mut self,
        op: PendingOp,
        result: Result<(), String>,
        store: &mut SessionStore,
        monitor: &mut Monitor<L>,
    ) -> Result<Vec<PendingOp>, MonitorError> {
        match op {
            PendingOp::Load(component) => match self.loader.on_loaded(component, result)? {
                LoadStep::Load(next) => Ok(vec![PendingOp::Load(next)]),
                LoadStep::Activate(components) => {
                    let mut next = Vec::with_capacity(components.len());
                    self.barrier
                        .activate_all(&components, |c| next.push(PendingOp::Activate(c)));
                    Ok(next)
                }
            },
            PendingOp::Activate(component) => {
                let ready = self.barrier.complete(component, result)?;
                store.activate(component);
                Ok(if ready { vec![PendingOp::Install] } else { Vec::new() })
            }
            PendingOp::Install => {
                result.map_err(MonitorError::Install)?;
                store.sinks.mark_installed();
                log::info!("Sink registry installed with {} sinks", store.sinks.len());
                monitor.on_installed(&*store)?;
                Ok(Vec::new())
            }
        }
    }
}

/// Hand an event to the monitor. Events before installation are dropped.
pub fn deliver<L: Launch>(
    store: &SessionStore,
    monitor: &mut Monitor<L>,
    event: SessionEvent,
) -> Result<(), MonitorError> {
    if !store.sinks.is_installed() {
        log::debug!("Dropping {:?} before installation", event);
        return Ok(());
    }
    monitor.handle_event(store, event)
}
