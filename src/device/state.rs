//! Device state: named boolean properties backed by digital pins.

use log::{debug, warn};

/// Read and write named boolean properties of the device.
///
/// The server never caches a property value: every read goes through
/// [`DeviceState::read_property`] and every write is applied immediately.
pub trait DeviceState {
    fn read_property(&self, name: &str) -> bool;
    fn write_property(&mut self, name: &str, value: bool);
}

#[derive(Debug, Clone)]
struct Pin {
    property: String,
    number: u8,
    level: bool,
}

/// An in-memory bank of digital output pins, one per property.
///
/// This stands in for GPIO on hosts without one; levels live for the lifetime
/// of the process.
#[derive(Debug, Clone, Default)]
pub struct PinBank {
    pins: Vec<Pin>,
}

impl PinBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `property` to pin `number` with an initial level.
    pub fn with_pin(mut self, property: impl Into<String>, number: u8, level: bool) -> Self {
        self.pins.push(Pin {
            property: property.into(),
            number,
            level,
        });
        self
    }

    fn pin(&self, name: &str) -> Option<&Pin> {
        self.pins.iter().find(|pin| pin.property == name)
    }
}

impl DeviceState for PinBank {
    fn read_property(&self, name: &str) -> bool {
        match self.pin(name) {
            Some(pin) => pin.level,
            None => {
                warn!("read of unbound property {name}");
                false
            }
        }
    }

    fn write_property(&mut self, name: &str, value: bool) {
        match self.pins.iter_mut().find(|pin| pin.property == name) {
            Some(pin) => {
                pin.level = value;
                debug!(
                    "pin {} ({name}) -> {}",
                    pin.number,
                    if value { "HIGH" } else { "LOW" }
                );
            }
            None => warn!("write to unbound property {name}"),
        }
    }
}
