//! # domo-core
//!
//! The device state & telemetry engine.
//!
//! ## Responsibilities
//! - [`registry`] — the owned device catalog and its mutation contract
//! - [`event_log`] — append-only, capacity-bounded action history
//! - [`telemetry`] — fixed-capacity ring of recent power samples
//! - [`event_bus`] — publish/subscribe hub decoupling producers from
//!   consumers
//! - [`sim`] — periodic background tasks generating synthetic telemetry
//!   and drifting device state
//!
//! Control flow: a user action or a simulator tick calls a registry
//! mutation; the mutation updates device state, appends a log entry, and
//! publishes an event; subscribers (the chart feed, any live view) react.
//!
//! ## Dependency rule
//! Depends on `domo-domain` only (plus `tokio` for channels and timers).
//! Never imports the binary crate.

pub mod event_bus;
pub mod event_log;
pub mod registry;
pub mod sim;
pub mod telemetry;
