//! Sequenced loading of the session manager components.
//!
//! The default-nodes component is loaded first; the mixer is requested only
//! once that succeeded. When the last load completes, every loaded component
//! is handed over for activation. Any failure is fatal, there is no retry.

use super::types::Component;
use crate::error::MonitorError;

/// Components in the order they must be loaded.
const LOAD_ORDER: [Component; 2] = [Component::DefaultNodes, Component::Mixer];

/// What the session link should do after a load completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStep {
    /// Request loading of the next component
    Load(Component),
    /// All components are loaded; activate these capability handles
    Activate(Vec<Component>),
}

#[derive(Debug, Default)]
pub struct ComponentLoader {
    loaded: Vec<Component>,
}

impl ComponentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// The component to request first.
    pub fn first(&self) -> Component {
        LOAD_ORDER[0]
    }

    /// Feed the result of loading `component`.
    pub fn on_loaded(
        &mut self,
        component: Component,
        result: Result<(), String>,
    ) -> Result<LoadStep, MonitorError> {
        if let Err(reason) = result {
            return Err(MonitorError::ComponentLoad { component, reason });
        }

        let expected = LOAD_ORDER.get(self.loaded.len()).copied();
        if expected != Some(component) {
            return Err(MonitorError::ComponentLoad {
                component,
                reason: format!("loaded out of order, expected {:?}", expected),
            });
        }

        log::info!("Component {} loaded", component);
        self.loaded.push(component);

        match LOAD_ORDER.get(self.loaded.len()) {
            Some(&next) => Ok(LoadStep::Load(next)),
            None => Ok(LoadStep::Activate(self.loaded.clone())),
        }
    }
}
