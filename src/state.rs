//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! One board per host: the engine sits behind a single `RwLock`, so every
//! mutation (command, drag frame, animation tick, acquisition grant) is
//! serialized and readers always see a consistent snapshot. The engine is
//! clock-free; `now_ms` supplies it monotonic milliseconds since startup.

use std::sync::{Arc, Mutex, PoisonError};

use canvas::animation::AnimationId;
use canvas::engine::EngineCore;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::config::BoardConfig;
use crate::services::media::MediaBroker;
use crate::services::session::Session;

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RwLock<EngineCore>>,
    pub config: Arc<BoardConfig>,
    /// `None` until someone joins a room.
    pub session: Arc<RwLock<Option<Session>>>,
    pub broker: MediaBroker,
    /// Timer task driving the running pan animation, if any, keyed by its id.
    pub animator: Arc<Mutex<Option<(AnimationId, JoinHandle<()>)>>>,
    started: Instant,
}

impl AppState {
    #[must_use]
    pub fn new(config: BoardConfig) -> Self {
        let engine = EngineCore::with_viewport(config.viewport_width, config.viewport_height);
        Self {
            engine: Arc::new(RwLock::new(engine)),
            config: Arc::new(config),
            session: Arc::new(RwLock::new(None)),
            broker: MediaBroker::new(),
            animator: Arc::new(Mutex::new(None)),
            started: Instant::now(),
        }
    }

    /// Milliseconds since the host started.
    #[must_use]
    pub fn now_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    /// Install the timer for animation `id`, aborting the one it supersedes.
    ///
    /// Animation ids only grow, so a timer for an id older than the installed
    /// one is stale and is aborted instead. Returns whether `handle` was kept.
    pub fn replace_animator(&self, id: AnimationId, handle: JoinHandle<()>) -> bool {
        let mut slot = self.animator.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((current, _)) = slot.as_ref() {
            if current.0 > id.0 {
                handle.abort();
                return false;
            }
        }
        if let Some((_, previous)) = slot.replace((id, handle)) {
            previous.abort();
        }
        true
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
