//! Telemetry ring buffer — the fixed-capacity window of recent power
//! samples feeding the chart.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use domo_domain::event::Event;
use tokio_util::sync::CancellationToken;

use crate::event_bus::{RecvError, Subscription};

/// How many samples the chart window retains.
pub const CHART_CAPACITY: usize = 40;

/// Fixed-capacity FIFO of recent numeric samples.
///
/// Conveyor-belt semantics: pushing onto a full buffer evicts the single
/// oldest sample. Arrival order is the only index.
#[derive(Debug)]
pub struct RingBuffer {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl Default for RingBuffer {
    fn default() -> Self {
        Self::new(CHART_CAPACITY)
    }
}

impl RingBuffer {
    /// Create a buffer retaining at most `capacity` samples.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Append a sample, evicting the single oldest when full.
    pub fn push(&mut self, sample: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// The current window in insertion order, paired with its position
    /// within the window.
    ///
    /// Indices are re-based from 0 on every read: once the window is
    /// full, each eviction shifts every sample one position left. This
    /// is the chart's intended visual semantic, not a stable sample
    /// counter — consumers must not assume index stability across
    /// pushes.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(usize, f64)> {
        self.samples.iter().copied().enumerate().collect()
    }

    /// Current number of retained samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the window holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Bus subscriber specialised for the numeric power series.
///
/// Clone the feed to keep a read handle; run [`PowerFeed::run`] as a
/// background task to keep the window current.
#[derive(Clone, Default)]
pub struct PowerFeed {
    buffer: Arc<Mutex<RingBuffer>>,
}

impl PowerFeed {
    /// Create a feed with an empty chart window.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(RingBuffer::new(capacity))),
        }
    }

    /// The current chart window; see [`RingBuffer::snapshot`].
    #[must_use]
    pub fn chart_snapshot(&self) -> Vec<(usize, f64)> {
        self.lock().snapshot()
    }

    /// Push a sample directly, bypassing the bus. Mostly for tests.
    pub fn push(&self, sample: f64) {
        self.lock().push(sample);
    }

    /// Consume power samples from `subscription` until cancelled or the
    /// bus closes. Other event types are ignored.
    pub async fn run(self, mut subscription: Subscription, cancel: CancellationToken) {
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::info!("power feed stopping");
                    return;
                }
                received = subscription.recv() => match received {
                    Ok(Event::PowerSample { watts }) => self.lock().push(watts),
                    Ok(_) => {}
                    Err(RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "power feed fell behind the bus");
                    }
                    Err(RecvError::Closed) => {
                        tracing::info!("event bus closed, power feed stopping");
                        return;
                    }
                },
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, RingBuffer> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
