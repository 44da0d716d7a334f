//! Board service: applies front-end commands to the engine.
//!
//! DESIGN
//! ======
//! Routes stay thin; this module owns the mapping from the wire-level
//! `BoardCommand` to engine calls, takes the write lock once per command,
//! and starts the timers the resulting actions ask for.
//!
//! ERROR HANDLING
//! ==============
//! Constraint violations are not errors: out-of-range zooms, pans and
//! element positions are clamped by the engine. Only ingestion and
//! acquisition can fail. Acquisition failures never reach a caller; they
//! are logged and leave the board unchanged.

use canvas::camera::Point;
use canvas::doc::{ChromaKey, Element, ElementId};
use canvas::engine::{Action, EngineCore};
use canvas::input::{DragFrame, Key, LayerDirection};
use canvas::media::{self, IngestError, LiveSource};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::services::animation;
use crate::services::media::AcquireTicket;
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("engine did not report the inserted element")]
    NotCreated,
}

/// One editor interaction, as posted by the front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardCommand {
    /// Zoom by `delta` percentage points (buttons send ±10).
    Zoom { delta: f64 },
    SetZoom { zoom: f64 },
    /// Reset zoom and glide back to the workspace center.
    CenterView,
    /// Glide the pan to `(x, y)` screen pixels.
    PanTo { x: f64, y: f64 },
    ResizeViewport { width: f64, height: f64 },
    KeyDown {
        key: Key,
        #[serde(default)]
        repeat: bool,
    },
    KeyUp { key: Key },
    Drag { frame: DragFrame },
    /// Pointer click at screen coordinates.
    Click { x: f64, y: f64 },
    MoveLayer { direction: LayerDirection },
    RemoveSelected,
    SetChromaKey { id: ElementId, chroma_key: ChromaKey },
}

/// Route one command to the engine. Pure apart from the clock value passed in.
pub fn dispatch(engine: &mut EngineCore, command: BoardCommand, now_ms: f64) -> Vec<Action> {
    match command {
        BoardCommand::Zoom { delta } => engine.zoom_by(delta),
        BoardCommand::SetZoom { zoom } => engine.set_zoom(zoom),
        BoardCommand::CenterView => engine.center_view(now_ms),
        BoardCommand::PanTo { x, y } => engine.smooth_pan_to(Point::new(x, y), now_ms),
        BoardCommand::ResizeViewport { width, height } => engine.set_viewport_size(width, height),
        BoardCommand::KeyDown { key, repeat } => engine.on_key_down(&key, repeat),
        BoardCommand::KeyUp { key } => engine.on_key_up(&key),
        BoardCommand::Drag { frame } => engine.on_drag(&frame),
        BoardCommand::Click { x, y } => engine.on_click(Point::new(x, y)),
        BoardCommand::MoveLayer { direction } => engine.move_layer(direction),
        BoardCommand::RemoveSelected => engine.remove_selected(),
        BoardCommand::SetChromaKey { id, chroma_key } => engine.set_chroma_key(id, chroma_key),
    }
}

/// Apply a command under the board lock and start any animation it begins.
///
/// The timer is installed before the lock is released, so timers are
/// replaced in the same order the engine hands out animation ids.
pub async fn apply_command(state: &AppState, command: BoardCommand) -> Vec<Action> {
    let mut engine = state.engine.write().await;
    let actions = dispatch(&mut engine, command, state.now_ms());
    animation::drive(state, &actions);
    drop(engine);
    actions
}

/// Ingest an uploaded image and insert it centered on the canvas.
///
/// # Errors
///
/// Returns [`BoardError::Ingest`] for empty uploads or unrecognised formats.
pub async fn insert_image(state: &AppState, bytes: &[u8], content_type: Option<&str>) -> Result<Element, BoardError> {
    let url = media::ingest_image(bytes, content_type)?;
    let actions = state.engine.write().await.insert_image(url);
    info!(bytes = bytes.len(), "image inserted");
    created_element(actions).ok_or(BoardError::NotCreated)
}

/// A started acquisition: what the front-end needs, plus the task awaiting its answer.
pub struct Acquisition {
    pub ticket: AcquireTicket,
    pub task: JoinHandle<Option<ElementId>>,
}

/// Ask the front-end for a live source and insert it once granted.
///
/// Denial, cancellation and timeout are logged and leave the board unchanged.
pub fn start_live_source(state: &AppState, source: LiveSource) -> Acquisition {
    let pending = state.broker.open(source);
    let ticket = pending.ticket.clone();
    debug!(pending = state.broker.pending_count(), "awaiting capture answer");
    let timeout = state.config.acquire_timeout;
    let state = state.clone();

    let task = tokio::spawn(async move {
        let request_id = pending.ticket.request_id;
        match pending.wait(timeout).await {
            Ok(stream) => {
                let actions = state.engine.write().await.insert_live_source(source, stream);
                let id = created_element(actions).map(|el| el.id);
                info!(%request_id, source = source.as_str(), element = ?id, "live source inserted");
                id
            }
            Err(e) => {
                warn!(%request_id, source = source.as_str(), error = %e, "live source unavailable");
                None
            }
        }
    });

    Acquisition { ticket, task }
}

fn created_element(actions: Vec<Action>) -> Option<Element> {
    actions.into_iter().find_map(|a| match a {
        Action::ElementCreated { element } => Some(element),
        _ => None,
    })
}

#[cfg(test)]
#[path = "board_test.rs"]
mod tests;
