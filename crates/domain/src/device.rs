//! Device — a simulated controllable entity with a kind-specific state value.
//!
//! Devices are created once at process start from [`Device::seed_home`] and
//! are never destroyed during a run. Their `kind` is immutable after
//! creation; state values are constrained to their domain by the clamping
//! helpers here.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Lowest accepted thermostat setpoint, in °C.
pub const SETPOINT_MIN: f64 = 16.0;
/// Highest accepted thermostat setpoint, in °C.
pub const SETPOINT_MAX: f64 = 30.0;
/// Highest fan speed step (0 = off).
pub const FAN_SPEED_MAX: u8 = 3;

/// Power draw of a light that is on, in watts.
pub const LIGHT_WATTS: u32 = 60;
/// Power draw of the thermostat, in watts.
pub const THERMOSTAT_WATTS: u32 = 120;
/// Power draw per fan speed step, in watts.
pub const FAN_UNIT_WATTS: u32 = 20;

/// Seeded id of the living room light.
pub const SEED_LIGHT: &str = "light1";
/// Seeded id of the front door.
pub const SEED_DOOR: &str = "door1";
/// Seeded id of the thermostat.
pub const SEED_THERMOSTAT: &str = "thermo1";
/// Seeded id of the ceiling fan.
pub const SEED_FAN: &str = "fan1";

/// How many action summaries each device retains, most-recent-last.
pub const RECENT_ACTIONS_CAP: usize = 20;

/// Unique string key identifying a device (e.g. `light1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Wrap a string key.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Access the inner key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl std::str::FromStr for DeviceId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

/// Closed set of device kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Light,
    Door,
    Thermostat,
    Fan,
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light => f.write_str("light"),
            Self::Door => f.write_str("door"),
            Self::Thermostat => f.write_str("thermostat"),
            Self::Fan => f.write_str("fan"),
        }
    }
}

/// Kind-specific device state.
///
/// The variant always matches the owning device's [`DeviceKind`]; the
/// registry enforces this by only transitioning within a variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum DeviceState {
    Light { on: bool },
    Door { locked: bool },
    Thermostat { setpoint: f64 },
    Fan { speed: u8 },
}

impl DeviceState {
    /// The kind this state belongs to.
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        match self {
            Self::Light { .. } => DeviceKind::Light,
            Self::Door { .. } => DeviceKind::Door,
            Self::Thermostat { .. } => DeviceKind::Thermostat,
            Self::Fan { .. } => DeviceKind::Fan,
        }
    }
}

impl std::fmt::Display for DeviceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light { on: true } => f.write_str("ON"),
            Self::Light { on: false } => f.write_str("OFF"),
            Self::Door { locked: true } => f.write_str("LOCKED"),
            Self::Door { locked: false } => f.write_str("UNLOCKED"),
            Self::Thermostat { setpoint } => write!(f, "{setpoint:.1} °C"),
            Self::Fan { speed } => write!(f, "speed {speed}"),
        }
    }
}

/// Clamp a requested setpoint into [[`SETPOINT_MIN`], [`SETPOINT_MAX`]]
/// and round it to the nearest 0.1 °C.
#[must_use]
pub fn clamp_setpoint(value: f64) -> f64 {
    let rounded = (value * 10.0).round() / 10.0;
    rounded.clamp(SETPOINT_MIN, SETPOINT_MAX)
}

/// Clamp a requested fan speed into 0..=[`FAN_SPEED_MAX`].
#[must_use]
pub fn clamp_speed(value: i64) -> u8 {
    // Range fits in u8 after clamping.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        value.clamp(0, i64::from(FAN_SPEED_MAX)) as u8
    }
}

/// A simulated home device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub kind: DeviceKind,
    pub state: DeviceState,
    /// Recent action summaries, bounded at [`RECENT_ACTIONS_CAP`],
    /// most-recent-last.
    pub recent_actions: VecDeque<String>,
}

impl Device {
    /// Current power draw in watts, derived from kind and state.
    #[must_use]
    pub fn power_draw_watts(&self) -> u32 {
        match self.state {
            DeviceState::Light { on } => {
                if on {
                    LIGHT_WATTS
                } else {
                    0
                }
            }
            DeviceState::Door { .. } => 0,
            DeviceState::Thermostat { .. } => THERMOSTAT_WATTS,
            DeviceState::Fan { speed } => u32::from(speed) * FAN_UNIT_WATTS,
        }
    }

    /// Append an action summary, evicting the oldest beyond
    /// [`RECENT_ACTIONS_CAP`].
    pub fn push_action(&mut self, summary: String) {
        if self.recent_actions.len() == RECENT_ACTIONS_CAP {
            self.recent_actions.pop_front();
        }
        self.recent_actions.push_back(summary);
    }

    /// The fixed catalog every process starts with.
    #[must_use]
    pub fn seed_home() -> Vec<Self> {
        vec![
            Self::seeded(SEED_LIGHT, "Living Room Light", DeviceState::Light { on: false }),
            Self::seeded(SEED_DOOR, "Front Door", DeviceState::Door { locked: true }),
            Self::seeded(
                SEED_THERMOSTAT,
                "Thermostat",
                DeviceState::Thermostat { setpoint: 22.0 },
            ),
            Self::seeded(SEED_FAN, "Ceiling Fan", DeviceState::Fan { speed: 0 }),
        ]
    }

    fn seeded(id: &str, name: &str, state: DeviceState) -> Self {
        Self {
            id: DeviceId::new(id),
            name: name.to_string(),
            kind: state.kind(),
            state,
            recent_actions: VecDeque::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_seed_four_devices_in_catalog_order() {
        let devices = Device::seed_home();
        let ids: Vec<&str> = devices.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, [SEED_LIGHT, SEED_DOOR, SEED_THERMOSTAT, SEED_FAN]);
    }

    #[test]
    fn should_seed_expected_initial_states() {
        let devices = Device::seed_home();
        assert_eq!(devices[0].state, DeviceState::Light { on: false });
        assert_eq!(devices[1].state, DeviceState::Door { locked: true });
        assert_eq!(devices[2].state, DeviceState::Thermostat { setpoint: 22.0 });
        assert_eq!(devices[3].state, DeviceState::Fan { speed: 0 });
    }

    #[test]
    fn should_match_kind_to_state_variant() {
        for device in Device::seed_home() {
            assert_eq!(device.kind, device.state.kind());
        }
    }

    #[test]
    fn should_clamp_setpoint_into_bounds() {
        assert_eq!(clamp_setpoint(10.0), SETPOINT_MIN);
        assert_eq!(clamp_setpoint(99.0), SETPOINT_MAX);
        assert_eq!(clamp_setpoint(21.5), 21.5);
    }

    #[test]
    fn should_round_setpoint_to_tenths() {
        assert_eq!(clamp_setpoint(21.44), 21.4);
        assert_eq!(clamp_setpoint(21.45), 21.5);
        assert_eq!(clamp_setpoint(29.99), 30.0);
    }

    #[test]
    fn should_clamp_fan_speed_into_steps() {
        assert_eq!(clamp_speed(-5), 0);
        assert_eq!(clamp_speed(0), 0);
        assert_eq!(clamp_speed(2), 2);
        assert_eq!(clamp_speed(12), FAN_SPEED_MAX);
    }

    #[test]
    fn should_derive_power_from_state() {
        let mut devices = Device::seed_home();
        assert_eq!(devices[0].power_draw_watts(), 0);
        devices[0].state = DeviceState::Light { on: true };
        assert_eq!(devices[0].power_draw_watts(), LIGHT_WATTS);

        assert_eq!(devices[1].power_draw_watts(), 0);
        assert_eq!(devices[2].power_draw_watts(), THERMOSTAT_WATTS);

        devices[3].state = DeviceState::Fan { speed: 3 };
        assert_eq!(devices[3].power_draw_watts(), 3 * FAN_UNIT_WATTS);
    }

    #[test]
    fn should_bound_recent_actions() {
        let mut device = Device::seed_home().remove(0);
        for i in 0..(RECENT_ACTIONS_CAP + 5) {
            device.push_action(format!("action {i}"));
        }
        assert_eq!(device.recent_actions.len(), RECENT_ACTIONS_CAP);
        assert_eq!(device.recent_actions.front().unwrap(), "action 5");
        assert_eq!(
            device.recent_actions.back().unwrap(),
            &format!("action {}", RECENT_ACTIONS_CAP + 4)
        );
    }

    #[test]
    fn should_display_human_state_summaries() {
        assert_eq!(DeviceState::Light { on: true }.to_string(), "ON");
        assert_eq!(DeviceState::Door { locked: false }.to_string(), "UNLOCKED");
        assert_eq!(
            DeviceState::Thermostat { setpoint: 21.5 }.to_string(),
            "21.5 °C"
        );
        assert_eq!(DeviceState::Fan { speed: 2 }.to_string(), "speed 2");
    }

    #[test]
    fn should_roundtrip_device_through_serde_json() {
        let device = Device::seed_home().remove(2);
        let json = serde_json::to_string(&device).unwrap();
        let parsed: Device = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, device.id);
        assert_eq!(parsed.state, device.state);
    }

    #[test]
    fn should_serialize_kind_lowercase() {
        let json = serde_json::to_string(&DeviceKind::Thermostat).unwrap();
        assert_eq!(json, "\"thermostat\"");
    }
}
