//! Device registry — the owned catalog of device records and the only
//! mutation path for device state.
//!
//! Devices and the event log live behind a single coarse lock, so the
//! "mutate state, append log entry, publish event" sequence for one
//! device appears atomic to concurrent readers. No raw map access
//! escapes this module.
//!
//! Mutations that do not change the value succeed but neither log nor
//! publish; user edits and simulator drift follow the same rule.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use domo_domain::device::{Device, DeviceId, DeviceState, clamp_setpoint, clamp_speed};
use domo_domain::error::{DomoError, NotFoundError, WrongKindError};
use domo_domain::event::Event;
use domo_domain::log::LogEntry;

use crate::event_bus::EventBus;
use crate::event_log::EventLog;

/// In-memory catalog of typed device records.
///
/// Cheap to share behind an `Arc`; every operation takes `&self`.
pub struct Registry {
    inner: Mutex<Inner>,
    bus: EventBus,
}

struct Inner {
    devices: HashMap<DeviceId, Device>,
    /// Catalog order for [`Registry::list`].
    order: Vec<DeviceId>,
    log: EventLog,
}

impl Registry {
    /// Create a registry holding the given devices, in order.
    #[must_use]
    pub fn new(devices: Vec<Device>, bus: EventBus, log_capacity: usize) -> Self {
        let order: Vec<DeviceId> = devices.iter().map(|d| d.id.clone()).collect();
        let devices = devices.into_iter().map(|d| (d.id.clone(), d)).collect();
        Self {
            inner: Mutex::new(Inner {
                devices,
                order,
                log: EventLog::new(log_capacity),
            }),
            bus,
        }
    }

    /// Create a registry seeded with the fixed home catalog.
    #[must_use]
    pub fn with_seed_devices(bus: EventBus, log_capacity: usize) -> Self {
        Self::new(Device::seed_home(), bus, log_capacity)
    }

    /// Read-only copy of one device, safe to hand across tasks.
    ///
    /// # Errors
    ///
    /// Returns [`DomoError::NotFound`] when no device with `id` exists.
    pub fn get(&self, id: &DeviceId) -> Result<Device, DomoError> {
        let inner = self.lock();
        inner
            .devices
            .get(id)
            .cloned()
            .ok_or_else(|| NotFoundError { id: id.clone() }.into())
    }

    /// Snapshots of every device, in catalog order.
    #[must_use]
    pub fn list(&self) -> Vec<Device> {
        let inner = self.lock();
        inner
            .order
            .iter()
            .filter_map(|id| inner.devices.get(id).cloned())
            .collect()
    }

    /// Flip an on/off device.
    ///
    /// # Errors
    ///
    /// [`DomoError::NotFound`] for an unknown id, [`DomoError::WrongKind`]
    /// when the device is not a light or a door.
    #[tracing::instrument(skip(self), fields(device = %id))]
    pub fn toggle(&self, id: &DeviceId) -> Result<Device, DomoError> {
        let mut inner = self.lock();
        let device = inner.device_mut(id)?;

        let (new_state, details) = match device.state {
            DeviceState::Light { on } => {
                let on = !on;
                (
                    DeviceState::Light { on },
                    format!("Light turned {}", if on { "ON" } else { "OFF" }),
                )
            }
            DeviceState::Door { locked } => {
                let locked = !locked;
                (
                    DeviceState::Door { locked },
                    format!("Door {}", if locked { "LOCKED" } else { "UNLOCKED" }),
                )
            }
            _ => {
                return Err(WrongKindError {
                    id: id.clone(),
                    kind: device.kind,
                    operation: "toggle",
                }
                .into());
            }
        };

        inner.commit(id, new_state, "Toggle", details, &self.bus)
    }

    /// Set the thermostat setpoint, clamped into its domain and rounded
    /// to the nearest 0.1 °C.
    ///
    /// # Errors
    ///
    /// [`DomoError::NotFound`] for an unknown id, [`DomoError::WrongKind`]
    /// when the device is not a thermostat.
    #[tracing::instrument(skip(self), fields(device = %id))]
    pub fn set_thermostat(&self, id: &DeviceId, value: f64) -> Result<Device, DomoError> {
        let mut inner = self.lock();
        let device = inner.device_mut(id)?;

        let DeviceState::Thermostat { setpoint } = device.state else {
            return Err(WrongKindError {
                id: id.clone(),
                kind: device.kind,
                operation: "set_thermostat",
            }
            .into());
        };

        let new_setpoint = clamp_setpoint(value);
        if (new_setpoint - setpoint).abs() < 1e-9 {
            return Ok(device.clone());
        }

        inner.commit(
            id,
            DeviceState::Thermostat {
                setpoint: new_setpoint,
            },
            "Set temperature",
            format!("New setpoint: {new_setpoint:.1} °C"),
            &self.bus,
        )
    }

    /// Set the fan speed, clamped into its 0..=3 domain.
    ///
    /// # Errors
    ///
    /// [`DomoError::NotFound`] for an unknown id, [`DomoError::WrongKind`]
    /// when the device is not a fan.
    #[tracing::instrument(skip(self), fields(device = %id))]
    pub fn set_fan_speed(&self, id: &DeviceId, value: i64) -> Result<Device, DomoError> {
        let mut inner = self.lock();
        let device = inner.device_mut(id)?;

        let DeviceState::Fan { speed } = device.state else {
            return Err(WrongKindError {
                id: id.clone(),
                kind: device.kind,
                operation: "set_fan_speed",
            }
            .into());
        };

        let new_speed = clamp_speed(value);
        if new_speed == speed {
            return Ok(device.clone());
        }

        inner.commit(
            id,
            DeviceState::Fan { speed: new_speed },
            "Set speed",
            format!("New fan speed: {new_speed}"),
            &self.bus,
        )
    }

    /// Up to `limit` log entries, newest first.
    #[must_use]
    pub fn recent_log(&self, limit: usize) -> Vec<LogEntry> {
        self.lock().log.recent(limit)
    }

    /// Up to `limit` log entries for one device, newest first.
    #[must_use]
    pub fn recent_log_for(&self, id: &DeviceId, limit: usize) -> Vec<LogEntry> {
        self.lock().log.recent_for_device(id, limit)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Inner {
    fn device_mut(&mut self, id: &DeviceId) -> Result<&mut Device, DomoError> {
        self.devices
            .get_mut(id)
            .ok_or_else(|| NotFoundError { id: id.clone() }.into())
    }

    /// Apply a state change that is known to differ from the current
    /// value: update the record, append exactly one log entry, then
    /// publish exactly one event, in that order.
    fn commit(
        &mut self,
        id: &DeviceId,
        new_state: DeviceState,
        action: &str,
        details: String,
        bus: &EventBus,
    ) -> Result<Device, DomoError> {
        let device = self.device_mut(id)?;

        device.state = new_state;
        let entry = LogEntry::new(id.clone(), device.name.clone(), action, details);
        device.push_action(entry.summary());
        let snapshot = device.clone();
        let kind = device.kind;

        tracing::debug!(device = %id, action, details = %entry.details, "device changed");
        self.log.append(entry);
        bus.publish(Event::DeviceChanged {
            device_id: id.clone(),
            kind,
            state: new_state,
        });

        Ok(snapshot)
    }
}
