//! Typed errors shared across the workspace.
//!
//! Out-of-range setpoints and speeds are not errors: the registry clamps
//! them silently, matching the slider-bounded inputs the devices model.

use crate::device::{DeviceId, DeviceKind};

/// No device with the given id exists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no device with id `{id}`")]
pub struct NotFoundError {
    pub id: DeviceId,
}

/// The operation is not applicable to the device's kind
/// (e.g. toggling a thermostat).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("device `{id}` ({kind}) does not support {operation}")]
pub struct WrongKindError {
    pub id: DeviceId,
    pub kind: DeviceKind,
    pub operation: &'static str,
}

/// Top-level error for registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomoError {
    #[error("device not found")]
    NotFound(#[from] NotFoundError),

    #[error("operation not supported")]
    WrongKind(#[from] WrongKindError),
}
