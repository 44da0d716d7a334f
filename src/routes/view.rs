//! Viewer projection for capture tools.
//!
//! The viewer shows only the elements, canvas-relative, on a transparent
//! background. It ignores zoom, pan, selection and grid.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use canvas::render::{self, ViewerScene};
use serde::Deserialize;

use crate::routes::session::session_error_to_status;
use crate::services::session::SessionError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    #[serde(rename = "roomKey")]
    pub room_key: Option<String>,
}

/// `GET /view?roomKey=...` — a key that does not match the joined room is 404.
pub async fn view(State(state): State<AppState>, Query(query): Query<ViewQuery>) -> Result<Json<ViewerScene>, StatusCode> {
    if let Some(key) = query.room_key.as_deref() {
        check_room(&state, key).await.map_err(session_error_to_status)?;
    }
    let snapshot = state.engine.read().await.snapshot();
    Ok(Json(render::viewer_scene(&snapshot)))
}

async fn check_room(state: &AppState, key: &str) -> Result<(), SessionError> {
    match state.session.read().await.as_ref() {
        Some(joined) if joined.room_key == key => Ok(()),
        _ => Err(SessionError::NotJoined),
    }
}

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;
