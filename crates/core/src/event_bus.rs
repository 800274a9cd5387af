//! In-process event bus backed by a tokio [`broadcast`] channel.
//!
//! Each subscriber owns a bounded queue; a subscriber that falls more
//! than `capacity` events behind observes [`RecvError::Lagged`] and loses
//! the oldest events instead of stalling publishers. Delivery is FIFO per
//! publisher.

use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use domo_domain::event::Event;

pub use tokio::sync::broadcast::error::{RecvError, TryRecvError};

/// In-process event bus using a tokio [`broadcast`] channel.
///
/// Publishing succeeds even when there are no active subscribers
/// (the event is simply dropped). Cloning the bus yields another
/// publishing handle onto the same channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a new event bus with the given per-subscriber capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events on this bus.
    ///
    /// Returns a handle that will receive all events published *after*
    /// the subscription is created. Dropping the handle unsubscribes.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Publish an event to all current subscribers. Never blocks.
    pub fn publish(&self, event: Event) {
        // send fails only when there are zero receivers, which is fine —
        // we simply ignore the error.
        let _ = self.sender.send(event);
    }

    /// Number of live subscriptions, mostly useful in tests.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Handle pairing one subscriber with the bus.
///
/// Unsubscription is dropping the handle; the bus holds no reference to
/// it beyond delivery.
pub struct Subscription {
    receiver: broadcast::Receiver<Event>,
}

impl Subscription {
    /// Wait for the next event.
    ///
    /// # Errors
    ///
    /// [`RecvError::Lagged`] when this subscriber fell behind and lost
    /// events; [`RecvError::Closed`] when every bus handle is gone.
    pub async fn recv(&mut self) -> Result<Event, RecvError> {
        self.receiver.recv().await
    }

    /// Non-blocking variant of [`recv`](Self::recv).
    ///
    /// # Errors
    ///
    /// [`TryRecvError::Empty`] when no event is queued, plus the
    /// lag/closed cases of [`recv`](Self::recv).
    pub fn try_recv(&mut self) -> Result<Event, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Adapt the subscription into a [`tokio_stream`] stream, the shape
    /// presentation layers usually want.
    #[must_use]
    pub fn into_stream(self) -> BroadcastStream<Event> {
        BroadcastStream::new(self.receiver)
    }
}
