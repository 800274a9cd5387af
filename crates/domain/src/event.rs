//! Event — the payload broadcast on the engine's bus.

use serde::{Deserialize, Serialize};

use crate::device::{DeviceId, DeviceKind, DeviceState};

/// Something observable that happened inside the engine.
///
/// Events are cheap to clone; every subscriber receives its own copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Event {
    /// A synthetic aggregate power reading from the sampler.
    PowerSample { watts: f64 },
    /// A device's state changed through the registry.
    DeviceChanged {
        device_id: DeviceId,
        kind: DeviceKind,
        state: DeviceState,
    },
}

impl Event {
    /// Human summary of the event, suitable for live views.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::PowerSample { watts } => format!("power sample: {watts:.0} W"),
            Self::DeviceChanged {
                device_id, state, ..
            } => format!("{device_id} is now {state}"),
        }
    }
}
