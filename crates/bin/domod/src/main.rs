//! # domod — domo daemon
//!
//! Composition root that wires the engine together and runs it.
//!
//! ## Responsibilities
//! - Parse configuration (TOML file, env vars)
//! - Initialise tracing
//! - Construct the event bus, the seeded device registry, and the chart
//!   feed
//! - Spawn the background simulators under one cancellation token
//! - Handle graceful shutdown (ctrl-c cancels, every task is joined)
//!
//! ## Dependency rule
//! This is the only crate that depends on all other crates. It is the
//! wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use domo_core::event_bus::{EventBus, RecvError, Subscription};
use domo_core::registry::Registry;
use domo_core::sim::{DriftSimulator, PowerSampler};
use domo_core::telemetry::{CHART_CAPACITY, PowerFeed};

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    let bus = EventBus::new(config.engine.bus_capacity);
    let registry = Arc::new(Registry::with_seed_devices(
        bus.clone(),
        config.engine.log_capacity,
    ));
    let feed = PowerFeed::new(CHART_CAPACITY);
    let cancel = CancellationToken::new();

    let tick = config.tick_period();
    let tasks = vec![
        tokio::spawn(feed.clone().run(bus.subscribe(), cancel.clone())),
        tokio::spawn(watch_events(bus.subscribe(), cancel.clone())),
        tokio::spawn(PowerSampler::new(bus.clone(), tick).run(cancel.clone())),
        tokio::spawn(DriftSimulator::new(Arc::clone(&registry), tick).run(cancel.clone())),
    ];

    tracing::info!(
        devices = registry.list().len(),
        tick_secs = tick.as_secs(),
        "domod running; press ctrl-c to stop"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    cancel.cancel();
    for task in tasks {
        if let Err(err) = task.await {
            tracing::warn!(error = %err, "background task panicked during shutdown");
        }
    }

    let window = feed.chart_snapshot();
    tracing::info!(
        samples = window.len(),
        log_entries = registry.recent_log(usize::MAX).len(),
        "final engine state"
    );

    Ok(())
}

/// Stand-in for a live view: logs every event as it is observed.
async fn watch_events(mut subscription: Subscription, cancel: CancellationToken) {
    loop {
        tokio::select! {
            () = cancel.cancelled() => return,
            received = subscription.recv() => match received {
                Ok(event) => tracing::info!("{}", event.summary()),
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "event watcher fell behind the bus");
                }
                Err(RecvError::Closed) => return,
            },
        }
    }
}
