//! Capture answers from the front-end and the track release queue.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::services::media::{BrokerError, DenyBody, GrantBody};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ReleasedResponse {
    /// Browser track ids the front-end should stop.
    pub tracks: Vec<String>,
}

/// `POST /api/media/requests/{id}/grant`
pub async fn grant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<GrantBody>,
) -> Result<StatusCode, StatusCode> {
    state.broker.grant(id, body).map_err(broker_error_to_status)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/media/requests/{id}/deny`
pub async fn deny(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<DenyBody>,
) -> Result<StatusCode, StatusCode> {
    state.broker.deny(id, body).map_err(broker_error_to_status)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/media/requests/{id}`
pub async fn cancel(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, StatusCode> {
    state.broker.cancel(id).map_err(broker_error_to_status)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/media/released` — drain stopped track ids.
pub async fn released(State(state): State<AppState>) -> Json<ReleasedResponse> {
    Json(ReleasedResponse { tracks: state.broker.take_released() })
}

pub(crate) fn broker_error_to_status(err: BrokerError) -> StatusCode {
    match err {
        BrokerError::UnknownRequest(_) => StatusCode::NOT_FOUND,
    }
}

#[cfg(test)]
#[path = "media_test.rs"]
mod tests;
