//! Viewport math: zoom scaling, pan clamping and boundary detection.
//!
//! The workspace (canvas plus padding) is drawn centered in the viewport,
//! scaled by `zoom / 100` and offset by `pan` screen pixels:
//!
//! ```text
//! screen = viewport_center + (workspace_pt - workspace_center) * scale + pan
//! ```
//!
//! Pan limits shrink as zoom decreases, so every pan mutation is clamped
//! against the *current* zoom and viewport size, and every zoom change
//! rescales the existing pan before clamping it again.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM, PAN_BOUNDARY_MARGIN, WORKSPACE_HEIGHT, WORKSPACE_WIDTH};

/// A point in either screen or workspace space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Largest absolute pan allowed on each axis at a given zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanLimits {
    pub max_x: f64,
    pub max_y: f64,
}

/// Workspace edge the pan is currently close to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

/// Convert a zoom percentage to a scale factor.
#[must_use]
pub fn scale(zoom: f64) -> f64 {
    zoom / 100.0
}

/// Clamp a requested zoom percentage to `[MIN_ZOOM, MAX_ZOOM]`.
#[must_use]
pub fn clamp_zoom(zoom: f64) -> f64 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Pan limits for `zoom` inside a viewport of the given pixel size.
///
/// Half of the overscan on each axis. When the scaled workspace is smaller
/// than the viewport the limit is 0 and the workspace stays centered.
#[must_use]
pub fn max_pan(zoom: f64, viewport_width: f64, viewport_height: f64) -> PanLimits {
    let s = scale(zoom);
    PanLimits {
        max_x: ((WORKSPACE_WIDTH * s - viewport_width) / 2.0).max(0.0),
        max_y: ((WORKSPACE_HEIGHT * s - viewport_height) / 2.0).max(0.0),
    }
}

/// Zoom and pan of the on-screen window into the workspace.
///
/// `zoom` is a percentage (100 = no scaling). `pan_x` / `pan_y` are screen
/// pixels. `width` / `height` are the viewport's CSS pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { zoom: DEFAULT_ZOOM, pan_x: 0.0, pan_y: 0.0, width: 0.0, height: 0.0 }
    }
}

impl Viewport {
    /// A viewport of the given pixel size at 100% zoom with no pan.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, ..Self::default() }
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        scale(self.zoom)
    }

    #[must_use]
    pub fn pan(&self) -> Point {
        Point::new(self.pan_x, self.pan_y)
    }

    /// Pan limits at the current zoom and viewport size.
    #[must_use]
    pub fn limits(&self) -> PanLimits {
        self.limits_at(self.zoom)
    }

    #[must_use]
    pub fn limits_at(&self, zoom: f64) -> PanLimits {
        max_pan(zoom, self.width, self.height)
    }

    /// Clamp each axis of a proposed pan independently to the current limits.
    #[must_use]
    pub fn constrain_pan(&self, x: f64, y: f64) -> Point {
        let limits = self.limits();
        Point::new(x.clamp(-limits.max_x, limits.max_x), y.clamp(-limits.max_y, limits.max_y))
    }

    /// Report the edge whose limit the given pan is within the boundary margin of.
    ///
    /// Left and right are checked before top and bottom; the first match wins,
    /// so a corner reports a single edge.
    #[must_use]
    pub fn check_boundary(&self, x: f64, y: f64) -> Option<Edge> {
        let limits = self.limits();
        let near = |v: f64, edge: f64| (v - edge).abs() < PAN_BOUNDARY_MARGIN;
        // An axis locked at 0 has no edge to approach.
        let free_x = limits.max_x > 0.0;
        let free_y = limits.max_y > 0.0;
        if free_x && near(x, -limits.max_x) {
            Some(Edge::Left)
        } else if free_x && near(x, limits.max_x) {
            Some(Edge::Right)
        } else if free_y && near(y, -limits.max_y) {
            Some(Edge::Top)
        } else if free_y && near(y, limits.max_y) {
            Some(Edge::Bottom)
        } else {
            None
        }
    }

    /// Boundary affordance for the pan currently committed.
    #[must_use]
    pub fn boundary(&self) -> Option<Edge> {
        self.check_boundary(self.pan_x, self.pan_y)
    }

    /// Clamp and commit a pan. Returns the stored value.
    pub fn set_pan(&mut self, x: f64, y: f64) -> Point {
        let p = self.constrain_pan(x, y);
        self.pan_x = p.x;
        self.pan_y = p.y;
        p
    }

    /// Clamp and commit a zoom, rescaling the pan by `new / old` and
    /// clamping it again. Returns false (and changes nothing) when the
    /// clamped zoom equals the current zoom, or when `zoom` is not finite.
    #[allow(clippy::float_cmp)]
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        if !zoom.is_finite() {
            return false;
        }
        let new_zoom = clamp_zoom(zoom);
        if new_zoom == self.zoom {
            return false;
        }
        let ratio = new_zoom / self.zoom;
        self.zoom = new_zoom;
        self.set_pan(self.pan_x * ratio, self.pan_y * ratio);
        true
    }

    /// Update the viewport pixel size and clamp the pan against the new limits.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.set_pan(self.pan_x, self.pan_y);
    }

    /// Convert a screen-space point to workspace coordinates.
    #[must_use]
    pub fn screen_to_workspace(&self, screen: Point) -> Point {
        let s = self.scale();
        Point {
            x: WORKSPACE_WIDTH / 2.0 + (screen.x - self.width / 2.0 - self.pan_x) / s,
            y: WORKSPACE_HEIGHT / 2.0 + (screen.y - self.height / 2.0 - self.pan_y) / s,
        }
    }

    /// Convert a workspace point to screen coordinates.
    #[must_use]
    pub fn workspace_to_screen(&self, workspace: Point) -> Point {
        let s = self.scale();
        Point {
            x: self.width / 2.0 + (workspace.x - WORKSPACE_WIDTH / 2.0) * s + self.pan_x,
            y: self.height / 2.0 + (workspace.y - WORKSPACE_HEIGHT / 2.0) * s + self.pan_y,
        }
    }

    /// Convert a screen-space distance (pixels) to workspace distance.
    #[must_use]
    pub fn screen_dist_to_workspace(&self, screen_dist: f64) -> f64 {
        screen_dist / self.scale()
    }
}
