//! Shared application state for axum handlers.

use std::sync::Arc;

use voxhub_app::event_bus::InProcessEventBus;
use voxhub_app::ports::{Clock, EventPublisher};
use voxhub_app::scheduler::ActionScheduler;
use voxhub_app::services::chat_service::ChatService;

/// Application state shared across all axum handlers.
///
/// Generic over the event publisher and clock used by the scheduler to avoid
/// dynamic dispatch. `Clone` is implemented manually so the underlying types
/// themselves do not need to be `Clone`: only the `Arc` wrappers are cloned.
pub struct AppState<P, C> {
    /// Free-text command handling.
    pub chat_service: Arc<ChatService<P, C>>,
    /// Device snapshots, direct control and pending actions.
    pub scheduler: Arc<ActionScheduler<P, C>>,
    /// Event bus for SSE subscriptions.
    pub event_bus: Arc<InProcessEventBus>,
}

impl<P, C> Clone for AppState<P, C> {
    fn clone(&self) -> Self {
        Self {
            chat_service: Arc::clone(&self.chat_service),
            scheduler: Arc::clone(&self.scheduler),
            event_bus: Arc::clone(&self.event_bus),
        }
    }
}

impl<P, C> AppState<P, C>
where
    P: EventPublisher + Send + Sync + 'static,
    C: Clock + 'static,
{
    /// Create a new application state.
    ///
    /// The scheduler is shared with the chat service, so both must be built
    /// around the same instance before being handed over.
    pub fn new(
        chat_service: Arc<ChatService<P, C>>,
        scheduler: Arc<ActionScheduler<P, C>>,
        event_bus: Arc<InProcessEventBus>,
    ) -> Self {
        Self {
            chat_service,
            scheduler,
            event_bus,
        }
    }
}
