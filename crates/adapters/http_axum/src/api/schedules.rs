//! JSON REST handlers for pending scheduled actions.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use voxhub_app::ports::{Clock, EventPublisher};
use voxhub_domain::error::ValidationError;
use voxhub_domain::id::ScheduledActionId;
use voxhub_domain::schedule::ScheduledAction;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct CancelBody {
    pub cancelled: bool,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<ScheduledAction>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the cancel endpoint.
pub enum CancelResponse {
    Ok(Json<CancelBody>),
}

impl IntoResponse for CancelResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/schedules`: pending actions, earliest first.
pub async fn list<P, C>(State(state): State<AppState<P, C>>) -> ListResponse
where
    P: EventPublisher + Send + Sync + 'static,
    C: Clock + 'static,
{
    ListResponse::Ok(Json(state.scheduler.pending()))
}

/// `DELETE /api/schedules/{id}`
///
/// Answers `{"cancelled": false}` rather than `404` when the action already
/// fired or never existed.
pub async fn cancel<P, C>(
    State(state): State<AppState<P, C>>,
    Path(id): Path<String>,
) -> Result<CancelResponse, ApiError>
where
    P: EventPublisher + Send + Sync + 'static,
    C: Clock + 'static,
{
    let action_id = ScheduledActionId::from_str(&id).map_err(ValidationError::InvalidId)?;
    let cancelled = state.scheduler.cancel(action_id).await;
    Ok(CancelResponse::Ok(Json(CancelBody { cancelled })))
}
