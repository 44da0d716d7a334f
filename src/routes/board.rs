//! Editor routes: board projection, commands, uploads and capture requests.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use canvas::doc::Element;
use canvas::media::{IngestError, LiveSource};
use canvas::render::{self, EditorScene};

use crate::services::board::{self, BoardCommand, BoardError};
use crate::services::media::AcquireTicket;
use crate::state::AppState;

/// `GET /api/board` — current editor projection.
pub async fn get_board(State(state): State<AppState>) -> Json<EditorScene> {
    Json(editor_scene(&state).await)
}

/// `POST /api/board/commands` — apply one command and return the new projection.
pub async fn post_command(State(state): State<AppState>, Json(command): Json<BoardCommand>) -> Json<EditorScene> {
    board::apply_command(&state, command).await;
    Json(editor_scene(&state).await)
}

/// `POST /api/board/images` — raw image bytes; inserts an image element.
pub async fn post_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Element>), StatusCode> {
    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let element = board::insert_image(&state, &body, content_type).await.map_err(board_error_to_status)?;
    Ok((StatusCode::CREATED, Json(element)))
}

/// `POST /api/board/media/{source}` — start acquiring a webcam or screen.
///
/// Returns the ticket the front-end answers through `/api/media/requests`.
pub async fn start_media(
    State(state): State<AppState>,
    Path(source): Path<String>,
) -> Result<(StatusCode, Json<AcquireTicket>), StatusCode> {
    let source = LiveSource::parse(&source).ok_or(StatusCode::NOT_FOUND)?;
    let board::Acquisition { ticket, task } = board::start_live_source(&state, source);
    // Completes in the background once the front-end answers.
    drop(task);
    Ok((StatusCode::ACCEPTED, Json(ticket)))
}

async fn editor_scene(state: &AppState) -> EditorScene {
    let snapshot = state.engine.read().await.snapshot();
    render::editor_scene(&snapshot)
}

pub(crate) fn board_error_to_status(err: BoardError) -> StatusCode {
    match err {
        BoardError::Ingest(IngestError::Empty) => StatusCode::BAD_REQUEST,
        BoardError::Ingest(IngestError::UnsupportedFormat(_)) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        BoardError::NotCreated => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
#[path = "board_test.rs"]
mod tests;
