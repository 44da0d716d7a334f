//! Time-boxed pan animation with cubic ease-out.
//!
//! A `PanAnimation` only knows where it started, where it is going and when
//! it began. It never writes the viewport itself: the engine samples it on
//! each frame tick and passes the sample through `constrain_pan` before
//! committing, because the pan limits can change while the animation runs.

#[cfg(test)]
#[path = "animation_test.rs"]
mod animation_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::SMOOTH_PAN_DURATION_MS;

/// Identifies one started animation so stale frame ticks can be ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationId(pub u64);

/// Cubic ease-out: fast start, gentle stop. `t` is clamped to `[0, 1]`.
#[must_use]
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// An in-flight pan from `start` to `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanAnimation {
    pub id: AnimationId,
    pub start: Point,
    pub target: Point,
    pub started_ms: f64,
    pub duration_ms: f64,
}

impl PanAnimation {
    #[must_use]
    pub fn new(id: AnimationId, start: Point, target: Point, started_ms: f64) -> Self {
        Self { id, start, target, started_ms, duration_ms: SMOOTH_PAN_DURATION_MS }
    }

    /// Linear progress in `[0, 1]` at time `now_ms`.
    #[must_use]
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.started_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Eased pan value at time `now_ms` (not yet constrained).
    #[must_use]
    pub fn sample(&self, now_ms: f64) -> Point {
        let t = self.progress(now_ms);
        if t >= 1.0 {
            return self.target;
        }
        let eased = ease_out_cubic(t);
        Point::new(
            self.start.x + (self.target.x - self.start.x) * eased,
            self.start.y + (self.target.y - self.start.y) * eased,
        )
    }

    #[must_use]
    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}
