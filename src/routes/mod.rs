//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser front-end renders the board and performs the device
//! captures; this router is its API. Editor routes live under `/api`, and
//! `/view` serves the transparent canvas-only projection that a capture
//! tool embeds.

pub mod board;
pub mod media;
pub mod session;
pub mod view;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    let image_limit = DefaultBodyLimit::max(state.config.max_image_bytes);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/session", get(session::current))
        .route("/api/session/join", post(session::join))
        .route("/api/board", get(board::get_board))
        .route("/api/board/commands", post(board::post_command))
        .route("/api/board/images", post(board::post_image).layer(image_limit))
        .route("/api/board/media/{source}", post(board::start_media))
        .route("/api/media/requests/{id}/grant", post(media::grant))
        .route("/api/media/requests/{id}/deny", post(media::deny))
        .route("/api/media/requests/{id}", delete(media::cancel))
        .route("/api/media/released", get(media::released))
        .route("/view", get(view::view))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
