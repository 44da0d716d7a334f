//! Room join and session lookup.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::services::session::{self, SessionError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct JoinBody {
    pub nickname: String,
    pub room_key: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SessionResponse {
    pub nickname: String,
    pub room_key: String,
    /// Link a capture tool opens to show the viewer projection.
    pub viewer_url: String,
}

/// `POST /api/session/join` — enter a room. Joining again replaces the session.
pub async fn join(State(state): State<AppState>, Json(body): Json<JoinBody>) -> Result<Json<SessionResponse>, StatusCode> {
    let joined = session::join(&body.nickname, &body.room_key).map_err(session_error_to_status)?;
    let response = SessionResponse {
        viewer_url: joined.viewer_url(&state.config.public_base_url),
        nickname: joined.nickname.clone(),
        room_key: joined.room_key.clone(),
    };
    info!(nickname = %joined.nickname, room_key = %joined.room_key, "room joined");
    *state.session.write().await = Some(joined);
    Ok(Json(response))
}

/// `GET /api/session` — the joined room, or 404 before anyone joins.
pub async fn current(State(state): State<AppState>) -> Result<Json<SessionResponse>, StatusCode> {
    let guard = state.session.read().await;
    let joined = guard.as_ref().ok_or(SessionError::NotJoined).map_err(session_error_to_status)?;
    Ok(Json(SessionResponse {
        nickname: joined.nickname.clone(),
        room_key: joined.room_key.clone(),
        viewer_url: joined.viewer_url(&state.config.public_base_url),
    }))
}

pub(crate) fn session_error_to_status(err: SessionError) -> StatusCode {
    match err {
        SessionError::MissingNickname | SessionError::MissingRoomKey | SessionError::InvalidRoomKey(_) => {
            StatusCode::BAD_REQUEST
        }
        SessionError::NotJoined => StatusCode::NOT_FOUND,
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
