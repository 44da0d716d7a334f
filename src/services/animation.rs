//! Pan animation timer.
//!
//! DESIGN
//! ======
//! The engine only knows how to advance an animation to a given time. This
//! task supplies the frames: one tick per `pan_frame` period until the engine
//! reports the animation finished or stops answering to its id. Only the
//! timer for the newest animation id survives; the engine ignores ticks for
//! ids it no longer runs.

use canvas::animation::AnimationId;
use canvas::engine::Action;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::state::AppState;

/// Spawn the timer for animation `id` and register it on the state.
pub fn spawn_pan_ticker(state: &AppState, id: AnimationId) {
    let handle = tick_until_finished(state.clone(), id);
    if !state.replace_animator(id, handle) {
        debug!(id = id.0, "superseded pan animation timer dropped");
    }
}

fn tick_until_finished(state: AppState, id: AnimationId) -> JoinHandle<()> {
    let period = state.config.pan_frame;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let actions = {
                let mut engine = state.engine.write().await;
                engine.tick_animation(id, state.now_ms())
            };
            if actions.is_empty() || actions.iter().any(|a| matches!(a, Action::AnimationFinished { .. })) {
                debug!(id = id.0, "pan animation timer stopped");
                break;
            }
        }
    })
}

/// Start timers for every animation the actions announce.
///
/// Call while still holding the engine write lock that produced `actions`.
pub fn drive(state: &AppState, actions: &[Action]) {
    for action in actions {
        if let Action::AnimationStarted { id } = action {
            spawn_pan_ticker(state, *id);
        }
    }
}
