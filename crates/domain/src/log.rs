//! Log entries — immutable records of device actions.
//!
//! A [`LogEntry`] captures the device name at write time so the log stays
//! readable even if the id stops resolving later.

use serde::{Deserialize, Serialize};

use crate::device::DeviceId;
use crate::time::{self, Timestamp};

/// A unique identifier for a [`LogEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogEntryId(uuid::Uuid);

impl Default for LogEntryId {
    fn default() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl LogEntryId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Access the inner UUID.
    #[must_use]
    pub fn as_uuid(self) -> uuid::Uuid {
        self.0
    }
}

impl std::fmt::Display for LogEntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for LogEntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s).map(Self)
    }
}

/// An immutable record of one device action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: LogEntryId,
    pub timestamp: Timestamp,
    /// May reference an id that no longer resolves; the name below is
    /// authoritative for display.
    pub device_id: DeviceId,
    /// Device name resolved when the entry was written.
    pub device_name: String,
    /// Short verb phrase (e.g. `Toggle`, `Set temperature`).
    pub action: String,
    /// Free-text description of the transition.
    pub details: String,
}

impl LogEntry {
    /// Create an entry stamped with the current time.
    #[must_use]
    pub fn new(
        device_id: DeviceId,
        device_name: impl Into<String>,
        action: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            id: LogEntryId::new(),
            timestamp: time::now(),
            device_id,
            device_name: device_name.into(),
            action: action.into(),
            details: details.into(),
        }
    }

    /// One-line rendering used for device action histories:
    /// `[2026-03-01 08:15:30] Toggle: Light turned ON`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "[{}] {}: {}",
            time::format_seconds(&self.timestamp),
            self.action,
            self.details
        )
    }
}
