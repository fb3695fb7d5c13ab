//! Free-text command endpoint.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use voxhub_app::ports::{Clock, EventPublisher};
use voxhub_domain::id::ScheduledActionId;

use crate::state::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
    /// Id of the action armed by this message, usable with
    /// `DELETE /api/schedules/{id}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled: Option<ScheduledActionId>,
}

/// `POST /api/chat`
///
/// Always answers `200` with a reply, including when the message was not
/// understood.
pub async fn handle<P, C>(
    State(state): State<AppState<P, C>>,
    Json(req): Json<ChatRequest>,
) -> Json<ChatResponse>
where
    P: EventPublisher + Send + Sync + 'static,
    C: Clock + 'static,
{
    let ack = state.chat_service.handle(&req.message).await;
    Json(ChatResponse {
        reply: ack.message,
        scheduled: ack.scheduled,
    })
}
