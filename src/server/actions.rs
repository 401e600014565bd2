//! Named device actions.

use std::collections::HashMap;

use crate::device::DeviceState;

/// Name of the built-in action that restarts the device.
pub const REBOOT: &str = "reboot";

/// What invoking an action asks the server to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEffect {
    /// The action ran to completion.
    Completed,
    /// Acknowledge, close the connection and restart the device.
    Restart,
}

type ActionFn = Box<dyn FnMut(&mut dyn DeviceState) -> ActionEffect>;

/// Action handlers keyed by their exact (case-sensitive) name.
pub struct ActionRegistry {
    actions: HashMap<String, ActionFn>,
}

impl Default for ActionRegistry {
    /// A registry holding only [`REBOOT`].
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(REBOOT, |_| ActionEffect::Restart);
        registry
    }
}

impl ActionRegistry {
    pub fn empty() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Add an action, replacing any previous one with the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, action: F)
    where
        F: FnMut(&mut dyn DeviceState) -> ActionEffect + 'static,
    {
        self.actions.insert(name.into(), Box::new(action));
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    /// Run the action called `name`, or return `None` if there is none.
    pub fn invoke(&mut self, name: &str, device: &mut dyn DeviceState) -> Option<ActionEffect> {
        self.actions.get_mut(name).map(|action| action(device))
    }
}
