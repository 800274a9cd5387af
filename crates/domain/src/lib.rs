//! # domo-domain
//!
//! Pure domain model for the domo home device simulation engine.
//!
//! ## Responsibilities
//! - Foundational types: device identifiers, error conventions, timestamps
//! - Define **Devices** (simulated state holders: lights, doors, thermostats, fans)
//!   and their kind-specific state domains
//! - Define **`LogEntry`** (immutable action records)
//! - Define **Events** (the bus payload: power samples and device changes)
//! - Contain all invariant enforcement (clamping, bounded action history)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies** and performs no IO.
//! It must never import anything from `core` or the binary crate.

pub mod device;
pub mod error;
pub mod event;
pub mod log;
pub mod time;
