//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod chat;
#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod schedules;
pub mod sse;

use axum::Router;
use axum::routing::{delete, get, post};

use voxhub_app::ports::{Clock, EventPublisher};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<P, C>() -> Router<AppState<P, C>>
where
    P: EventPublisher + Send + Sync + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route("/chat", post(chat::handle::<P, C>))
        // Devices
        .route("/devices", get(devices::list::<P, C>))
        .route(
            "/devices/{id}",
            get(devices::get::<P, C>).put(devices::update_status::<P, C>),
        )
        // Schedules
        .route("/schedules", get(schedules::list::<P, C>))
        .route("/schedules/{id}", delete(schedules::cancel::<P, C>))
        // Events
        .route("/events/stream", get(sse::stream::<P, C>))
}
