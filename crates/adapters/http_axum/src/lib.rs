//! # voxhub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Accept free-text commands on `POST /api/chat` and return the
//!   acknowledgment produced by the chat service
//! - Expose device snapshots and direct on/off control under `/api/devices`
//! - List and cancel pending scheduled actions under `/api/schedules`
//! - Stream domain events to browsers over SSE (`/api/events/stream`)
//!
//! ## Dependency rule
//! Depends on `voxhub-app` (for the scheduler, chat service and ports) and
//! `voxhub-domain` (for types used in request/response mapping). Never leaks
//! axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
mod test_support {
    use std::sync::Arc;

    use voxhub_app::event_bus::InProcessEventBus;
    use voxhub_app::ports::SystemClock;
    use voxhub_app::scheduler::ActionScheduler;
    use voxhub_app::services::chat_service::ChatService;
    use voxhub_app::store::DeviceStore;
    use voxhub_domain::command::CommandInterpreter;
    use voxhub_domain::device::{DeviceId, DeviceStatus};
    use voxhub_domain::time::now;

    use crate::state::AppState;

    /// Fan and Light both OFF, wired with the system clock.
    pub(crate) fn test_state() -> AppState<Arc<InProcessEventBus>, SystemClock> {
        let event_bus = Arc::new(InProcessEventBus::new(16));
        let store = DeviceStore::with_devices(
            [
                (DeviceId::new("Fan").unwrap(), DeviceStatus::Off),
                (DeviceId::new("Light").unwrap(), DeviceStatus::Off),
            ],
            now(),
        );
        let scheduler = Arc::new(ActionScheduler::new(
            store,
            Arc::clone(&event_bus),
            SystemClock,
        ));
        let chat_service = Arc::new(ChatService::new(
            CommandInterpreter::default(),
            Arc::clone(&scheduler),
        ));
        AppState::new(chat_service, scheduler, event_bus)
    }
}
