//! Shared numeric constants for the canvas crate.

// ── Geometry ────────────────────────────────────────────────────

/// Width of the composed output canvas in logical pixels.
pub const CANVAS_WIDTH: f64 = 1280.0;

/// Height of the composed output canvas in logical pixels.
pub const CANVAS_HEIGHT: f64 = 720.0;

/// Headroom around the canvas on every side of the workspace.
pub const WORKSPACE_PADDING: f64 = 200.0;

/// Full pannable workspace width (canvas plus padding on both sides).
pub const WORKSPACE_WIDTH: f64 = CANVAS_WIDTH + WORKSPACE_PADDING * 2.0;

/// Full pannable workspace height (canvas plus padding on both sides).
pub const WORKSPACE_HEIGHT: f64 = CANVAS_HEIGHT + WORKSPACE_PADDING * 2.0;

/// Spacing of the major grid lines drawn on the canvas background.
pub const GRID_SIZE: f64 = 50.0;

// ── Zoom ────────────────────────────────────────────────────────

/// Smallest zoom percentage.
pub const MIN_ZOOM: f64 = 25.0;

/// Largest zoom percentage.
pub const MAX_ZOOM: f64 = 400.0;

/// Zoom percentage at which one workspace pixel is one screen pixel.
pub const DEFAULT_ZOOM: f64 = 100.0;

/// Percentage points added or removed by the zoom buttons.
pub const ZOOM_STEP: f64 = 10.0;

// ── Panning ─────────────────────────────────────────────────────

/// Distance from a pan limit at which the boundary affordance is reported.
pub const PAN_BOUNDARY_MARGIN: f64 = 50.0;

/// Duration of an animated pan in milliseconds.
pub const SMOOTH_PAN_DURATION_MS: f64 = 300.0;

/// Nominal frame period; pan deltas arriving faster than this are damped.
pub const FRAME_MS: f64 = 16.0;

/// Lower bound of the zoom damping factor applied to canvas drags.
pub const MIN_PAN_ZOOM_FACTOR: f64 = 0.2;

/// Fraction of release velocity kept as momentum.
pub const MOMENTUM_RETAIN: f64 = 0.5;

// ── Elements ────────────────────────────────────────────────────

/// Minimum element width and height after a resize.
pub const MIN_ELEMENT_SIZE: f64 = 50.0;

/// Default width of an uploaded image element.
pub const DEFAULT_ELEMENT_WIDTH: f64 = 320.0;

/// Default height of an uploaded image element.
pub const DEFAULT_ELEMENT_HEIGHT: f64 = 240.0;

/// Live sources are fitted inside this fraction of the canvas on each axis.
pub const STREAM_FIT_RATIO: f64 = 0.8;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels around corner resize handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;
