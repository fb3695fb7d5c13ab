//! JSON REST handlers for devices.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use voxhub_app::ports::{Clock, EventPublisher};
use voxhub_domain::device::{DeviceId, DeviceState, DeviceStatus};
use voxhub_domain::error::NotFoundError;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for setting a device status.
#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: DeviceStatus,
}

#[derive(Serialize)]
pub struct UpdateStatusBody {
    pub reply: String,
    pub device: Option<DeviceState>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<DeviceState>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<DeviceState>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the update endpoint.
pub enum UpdateResponse {
    Ok(Json<UpdateStatusBody>),
}

impl IntoResponse for UpdateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/devices`
pub async fn list<P, C>(State(state): State<AppState<P, C>>) -> ListResponse
where
    P: EventPublisher + Send + Sync + 'static,
    C: Clock + 'static,
{
    ListResponse::Ok(Json(state.scheduler.devices()))
}

/// `GET /api/devices/{id}`
pub async fn get<P, C>(
    State(state): State<AppState<P, C>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    P: EventPublisher + Send + Sync + 'static,
    C: Clock + 'static,
{
    let device_id = DeviceId::new(id)?;
    let device = state
        .scheduler
        .device(&device_id)
        .ok_or_else(|| NotFoundError {
            entity: "device",
            id: device_id.to_string(),
        })?;
    Ok(GetResponse::Ok(Json(device)))
}

/// `PUT /api/devices/{id}`
///
/// Applies the status immediately; unknown devices are registered.
pub async fn update_status<P, C>(
    State(state): State<AppState<P, C>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<UpdateResponse, ApiError>
where
    P: EventPublisher + Send + Sync + 'static,
    C: Clock + 'static,
{
    let device_id = DeviceId::new(id)?;
    let ack = state.scheduler.apply_now(&device_id, req.status).await;
    Ok(UpdateResponse::Ok(Json(UpdateStatusBody {
        reply: ack.message,
        device: state.scheduler.device(&device_id),
    })))
}
