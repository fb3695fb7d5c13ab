//! In-process event bus backed by a tokio broadcast channel.

use std::future::Future;

use tokio::sync::broadcast;

use voxhub_domain::error::VoxHubError;
use voxhub_domain::event::Event;

use crate::ports::EventPublisher;

/// Fans device and schedule events out to every live subscriber.
///
/// Nothing is buffered for absent subscribers. A subscriber that falls more
/// than `capacity` events behind skips the oldest ones and sees
/// [`broadcast::error::RecvError::Lagged`] once.
pub struct InProcessEventBus {
    sender: broadcast::Sender<Event>,
}

impl InProcessEventBus {
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Receiver for events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

impl EventPublisher for InProcessEventBus {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), VoxHubError>> + Send {
        if self.sender.send(event).is_err() {
            tracing::trace!("event dropped, no subscribers");
        }
        async { Ok(()) }
    }
}
