//! Direct-manipulation controller.
//!
//! `EngineCore` owns the document store, the UI state, the gesture state
//! machine and the single in-flight pan animation. Every handler mutates the
//! store synchronously and returns the `Action`s the host should forward to
//! its readers; the engine never touches a clock, so callers pass `now_ms`.
//!
//! Every position and size is clamped here before it is written. The store
//! itself accepts whatever it is given.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde::Serialize;

use crate::animation::{AnimationId, PanAnimation};
use crate::camera::{Edge, Point, Viewport};
use crate::consts::{
    CANVAS_HEIGHT, CANVAS_WIDTH, DEFAULT_ELEMENT_HEIGHT, DEFAULT_ELEMENT_WIDTH, DEFAULT_ZOOM, FRAME_MS,
    MIN_ELEMENT_SIZE, MIN_PAN_ZOOM_FACTOR, MOMENTUM_RETAIN, WORKSPACE_PADDING, ZOOM_STEP,
};
use crate::doc::{ChromaKey, DocSnapshot, DocStore, Element, ElementContent, ElementId, NewElement, PartialElement, User};
use crate::hit::{self, Corner, HitPart};
use crate::input::{DragFrame, InputMode, InputState, Key, LayerDirection, UiState};
use crate::media::{AcquiredStream, LiveSource, fit_to_canvas};

/// Actions returned from handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    ElementCreated { element: Element },
    ElementUpdated { id: ElementId, fields: PartialElement },
    ElementDeleted { id: ElementId },
    ViewportChanged { viewport: Viewport },
    SelectionChanged { selected: Option<ElementId> },
    ModeChanged { mode: InputMode },
    AnimationStarted { id: AnimationId },
    AnimationFinished { id: AnimationId },
    RenderNeeded,
}

/// Everything a renderer needs, copied out of the engine after a write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardSnapshot {
    #[serde(flatten)]
    pub doc: DocSnapshot,
    pub selected: Option<ElementId>,
    pub mode: InputMode,
    /// Residual pan velocity recorded at the end of the last canvas drag.
    pub momentum: Point,
    /// Pan edge the viewport is close to, if any.
    pub boundary: Option<Edge>,
    pub animating: bool,
}

/// Axis-aligned element bounds in workspace coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Zoom damping for canvas drags: slower panning when zoomed in.
#[must_use]
pub fn pan_zoom_factor(zoom: f64) -> f64 {
    (DEFAULT_ZOOM / zoom).clamp(MIN_PAN_ZOOM_FACTOR, 1.0)
}

/// Time damping for canvas drags: increments arriving faster than one frame are scaled down.
#[must_use]
pub fn pan_time_factor(elapsed_ms: Option<f64>) -> f64 {
    elapsed_ms.map_or(1.0, |dt| (dt / FRAME_MS).clamp(0.0, 1.0))
}

/// Clamp a translated element so its whole box stays on the canvas.
#[must_use]
pub fn clamp_to_canvas(x: f64, y: f64, width: f64, height: f64) -> Point {
    Point::new(
        clamp_range(x, WORKSPACE_PADDING, WORKSPACE_PADDING + CANVAS_WIDTH - width),
        clamp_range(y, WORKSPACE_PADDING, WORKSPACE_PADDING + CANVAS_HEIGHT - height),
    )
}

/// Resize `orig` by dragging `corner` by `(dx, dy)` workspace units.
///
/// The opposite corner stays fixed. Sizes never drop below the minimum and
/// no edge leaves the canvas.
#[must_use]
pub fn resize_rect(corner: Corner, orig: Rect, dx: f64, dy: f64) -> Rect {
    let canvas_right = WORKSPACE_PADDING + CANVAS_WIDTH;
    let canvas_bottom = WORKSPACE_PADDING + CANVAS_HEIGHT;
    match corner {
        Corner::Se => {
            let (x, width) = drag_far_edge(orig.x, orig.width, dx, canvas_right);
            let (y, height) = drag_far_edge(orig.y, orig.height, dy, canvas_bottom);
            Rect { x, y, width, height }
        }
        Corner::Sw => {
            let (x, width) = drag_near_edge(orig.x, orig.width, dx);
            let (y, height) = drag_far_edge(orig.y, orig.height, dy, canvas_bottom);
            Rect { x, y, width, height }
        }
        Corner::Ne => {
            let (x, width) = drag_far_edge(orig.x, orig.width, dx, canvas_right);
            let (y, height) = drag_near_edge(orig.y, orig.height, dy);
            Rect { x, y, width, height }
        }
        Corner::Nw => {
            let (x, width) = drag_near_edge(orig.x, orig.width, dx);
            let (y, height) = drag_near_edge(orig.y, orig.height, dy);
            Rect { x, y, width, height }
        }
    }
}

/// Move the leading edge; the trailing edge stays put.
fn drag_near_edge(start: f64, len: f64, delta: f64) -> (f64, f64) {
    let far = start + len;
    let near = clamp_range(start + delta, WORKSPACE_PADDING, far - MIN_ELEMENT_SIZE);
    (near, far - near)
}

/// Move the trailing edge; the leading edge stays put.
fn drag_far_edge(start: f64, len: f64, delta: f64, limit: f64) -> (f64, f64) {
    (start, clamp_range(len + delta, MIN_ELEMENT_SIZE, limit - start))
}

/// Clamp that resolves an inverted range to `lo` instead of panicking.
fn clamp_range(v: f64, lo: f64, hi: f64) -> f64 {
    v.min(hi).max(lo)
}

/// Core engine state: all manipulation logic, independent of any host.
#[derive(Default)]
pub struct EngineCore {
    pub doc: DocStore,
    pub ui: UiState,
    pub input: InputState,
    animation: Option<PanAnimation>,
    next_animation_id: u64,
    momentum: Point,
    last_pan_ms: Option<f64>,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine whose viewport starts at the given pixel size.
    #[must_use]
    pub fn with_viewport(width: f64, height: f64) -> Self {
        let mut core = Self::new();
        core.doc.viewport.set_size(width, height);
        core
    }

    // =============================================================
    // Queries
    // =============================================================

    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.ui.selected
    }

    #[must_use]
    pub fn mode(&self) -> InputMode {
        self.ui.mode
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.doc.viewport
    }

    #[must_use]
    pub fn momentum(&self) -> Point {
        self.momentum
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.doc.get(id)
    }

    /// The animation currently allowed to write the pan, if any.
    #[must_use]
    pub fn active_animation(&self) -> Option<AnimationId> {
        self.animation.map(|a| a.id)
    }

    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            doc: self.doc.snapshot(),
            selected: self.ui.selected,
            mode: self.ui.mode,
            momentum: self.momentum,
            boundary: self.doc.viewport.boundary(),
            animating: self.animation.is_some(),
        }
    }

    // =============================================================
    // Viewport
    // =============================================================

    /// Record the viewport's pixel size and reclamp the pan.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) -> Vec<Action> {
        self.doc.viewport.set_size(width, height);
        self.viewport_changed()
    }

    /// Set the zoom percentage (clamped), rescaling and reclamping the pan.
    /// Nothing happens when the clamped zoom equals the current one.
    pub fn set_zoom(&mut self, zoom: f64) -> Vec<Action> {
        if self.doc.viewport.set_zoom(zoom) {
            tracing::debug!(zoom = self.doc.viewport.zoom, "zoom changed");
            self.viewport_changed()
        } else {
            Vec::new()
        }
    }

    /// Change the zoom by `delta` percentage points.
    pub fn zoom_by(&mut self, delta: f64) -> Vec<Action> {
        self.set_zoom(self.doc.viewport.zoom + delta)
    }

    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.zoom_by(ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.zoom_by(-ZOOM_STEP)
    }

    /// Start animating the pan towards `target`, cancelling any animation in flight.
    ///
    /// The target is not clamped up front; each frame is clamped as it is committed.
    pub fn smooth_pan_to(&mut self, target: Point, now_ms: f64) -> Vec<Action> {
        self.next_animation_id += 1;
        let id = AnimationId(self.next_animation_id);
        if let Some(prev) = self.animation.replace(PanAnimation::new(id, self.doc.viewport.pan(), target, now_ms)) {
            tracing::debug!(cancelled = prev.id.0, started = id.0, "pan animation replaced");
        }
        vec![Action::AnimationStarted { id }]
    }

    /// Advance animation `id` to `now_ms`. Ticks for any other id are ignored.
    pub fn tick_animation(&mut self, id: AnimationId, now_ms: f64) -> Vec<Action> {
        let Some(anim) = self.animation.filter(|a| a.id == id) else {
            tracing::debug!(id = id.0, "stale animation tick");
            return Vec::new();
        };
        let p = anim.sample(now_ms);
        self.doc.viewport.set_pan(p.x, p.y);
        let mut actions = self.viewport_changed();
        if anim.is_finished(now_ms) {
            self.animation = None;
            actions.push(Action::AnimationFinished { id });
        }
        actions
    }

    /// Drop the animation in flight, if any.
    pub fn cancel_animation(&mut self) {
        self.animation = None;
    }

    /// Reset zoom to 100% and glide back to the workspace center.
    pub fn center_view(&mut self, now_ms: f64) -> Vec<Action> {
        self.momentum = Point::default();
        let mut actions = self.set_zoom(DEFAULT_ZOOM);
        actions.extend(self.smooth_pan_to(Point::default(), now_ms));
        actions
    }

    fn viewport_changed(&mut self) -> Vec<Action> {
        self.doc.touch();
        vec![Action::ViewportChanged { viewport: self.doc.viewport }, Action::RenderNeeded]
    }

    // =============================================================
    // Keyboard
    // =============================================================

    pub fn on_key_down(&mut self, key: &Key, repeat: bool) -> Vec<Action> {
        if key.is_pan() {
            if repeat || self.ui.mode != InputMode::Idle {
                return Vec::new();
            }
            return self.set_mode(InputMode::PanReady);
        }
        if key.is_delete() {
            return self.remove_selected();
        }
        Vec::new()
    }

    pub fn on_key_up(&mut self, key: &Key) -> Vec<Action> {
        if !key.is_pan() || self.ui.mode == InputMode::Idle {
            return Vec::new();
        }
        if matches!(self.input, InputState::Panning { .. }) {
            // The rest of this drag no longer pans.
            self.input = InputState::Ignored;
        }
        self.set_mode(InputMode::Idle)
    }

    fn set_mode(&mut self, mode: InputMode) -> Vec<Action> {
        self.ui.mode = mode;
        vec![Action::ModeChanged { mode }, Action::RenderNeeded]
    }

    // =============================================================
    // Pointer
    // =============================================================

    /// Feed one frame of a drag gesture.
    pub fn on_drag(&mut self, frame: &DragFrame) -> Vec<Action> {
        let mut actions = Vec::new();
        if frame.first {
            actions.extend(self.begin_gesture(frame));
        }

        match self.input {
            InputState::Idle | InputState::Ignored => {}
            InputState::Panning { last_movement } => actions.extend(self.pan_frame(frame, last_movement)),
            InputState::DraggingElement { id, orig_x, orig_y } => {
                if frame.first || frame.last {
                    actions.extend(self.translate_element(id, orig_x, orig_y, frame.movement));
                }
            }
            InputState::ResizingElement { id, corner, orig_x, orig_y, orig_w, orig_h } => {
                if frame.active || frame.last {
                    let orig = Rect { x: orig_x, y: orig_y, width: orig_w, height: orig_h };
                    actions.extend(self.resize_element(id, corner, orig, frame.movement));
                }
            }
        }

        if frame.last {
            self.input = InputState::Idle;
        }
        actions
    }

    fn begin_gesture(&mut self, frame: &DragFrame) -> Vec<Action> {
        if self.ui.mode.pans() {
            self.input = InputState::Panning { last_movement: Point::default() };
            self.momentum = Point::default();
            self.last_pan_ms = None;
            return self.set_mode(InputMode::Panning);
        }

        let pt = self.doc.viewport.screen_to_workspace(frame.origin);
        self.input = match hit::hit_test(pt, &self.doc, &self.doc.viewport) {
            Some(h) => match (h.part, self.doc.get(&h.element_id)) {
                (HitPart::ResizeHandle(corner), Some(el)) => InputState::ResizingElement {
                    id: el.id,
                    corner,
                    orig_x: el.x,
                    orig_y: el.y,
                    orig_w: el.width,
                    orig_h: el.height,
                },
                (HitPart::Body, Some(el)) => InputState::DraggingElement { id: el.id, orig_x: el.x, orig_y: el.y },
                (_, None) => InputState::Ignored,
            },
            None => InputState::Ignored,
        };
        Vec::new()
    }

    fn pan_frame(&mut self, frame: &DragFrame, last_movement: Point) -> Vec<Action> {
        let mut actions = Vec::new();
        let zoom_factor = pan_zoom_factor(self.doc.viewport.zoom);

        if frame.active {
            let time_factor = pan_time_factor(self.last_pan_ms.map(|t| frame.time_ms - t));
            let k = time_factor * zoom_factor;
            let dx = (frame.movement.x - last_movement.x) * k;
            let dy = (frame.movement.y - last_movement.y) * k;
            let pan = self.doc.viewport.pan();
            self.doc.viewport.set_pan(pan.x + dx, pan.y + dy);
            self.last_pan_ms = Some(frame.time_ms);
            self.input = InputState::Panning { last_movement: frame.movement };
            actions.extend(self.viewport_changed());
        }

        if frame.last {
            self.momentum = Point::new(
                frame.velocity.x * MOMENTUM_RETAIN * zoom_factor,
                frame.velocity.y * MOMENTUM_RETAIN * zoom_factor,
            );
            actions.extend(self.set_mode(InputMode::PanReady));
        }
        actions
    }

    fn translate_element(&mut self, id: ElementId, orig_x: f64, orig_y: f64, movement: Point) -> Vec<Action> {
        let Some(el) = self.doc.get(&id) else {
            return Vec::new();
        };
        let s = self.doc.viewport.scale();
        let p = clamp_to_canvas(orig_x + movement.x / s, orig_y + movement.y / s, el.width, el.height);
        let fields = PartialElement { x: Some(p.x), y: Some(p.y), ..Default::default() };
        self.update(id, fields)
    }

    fn resize_element(&mut self, id: ElementId, corner: Corner, orig: Rect, movement: Point) -> Vec<Action> {
        let s = self.doc.viewport.scale();
        let r = resize_rect(corner, orig, movement.x / s, movement.y / s);
        let fields = PartialElement {
            x: Some(r.x),
            y: Some(r.y),
            width: Some(r.width),
            height: Some(r.height),
            ..Default::default()
        };
        self.update(id, fields)
    }

    /// Select the element under `screen_pt`, or clear the selection on background.
    pub fn on_click(&mut self, screen_pt: Point) -> Vec<Action> {
        let pt = self.doc.viewport.screen_to_workspace(screen_pt);
        let selected = hit::hit_test(pt, &self.doc, &self.doc.viewport).map(|h| h.element_id);
        self.select(selected)
    }

    pub fn select(&mut self, id: Option<ElementId>) -> Vec<Action> {
        if self.ui.selected == id {
            return Vec::new();
        }
        self.ui.selected = id;
        vec![Action::SelectionChanged { selected: id }, Action::RenderNeeded]
    }

    // =============================================================
    // Elements
    // =============================================================

    /// Swap the selected element's z-order with its neighbour.
    pub fn move_layer(&mut self, direction: LayerDirection) -> Vec<Action> {
        match self.ui.selected {
            Some(id) => self.move_layer_of(id, direction),
            None => Vec::new(),
        }
    }

    /// Swap `id`'s z-order with the next element above or below it. No-op at the ends.
    pub fn move_layer_of(&mut self, id: ElementId, direction: LayerDirection) -> Vec<Action> {
        let sorted = self.doc.sorted_elements();
        let Some(idx) = sorted.iter().position(|e| e.id == id) else {
            return Vec::new();
        };
        let neighbour = match direction {
            LayerDirection::Up => sorted.get(idx + 1),
            LayerDirection::Down => idx.checked_sub(1).and_then(|i| sorted.get(i)),
        };
        let Some(other) = neighbour else {
            return Vec::new();
        };
        let (own_z, other_id, other_z) = (sorted[idx].z_index, other.id, other.z_index);

        let mut actions = self.update(id, PartialElement { z_index: Some(other_z), ..Default::default() });
        actions.extend(self.update(other_id, PartialElement { z_index: Some(own_z), ..Default::default() }));
        actions
    }

    /// Remove an element, stopping its stream if it owns one.
    pub fn remove_element(&mut self, id: &ElementId) -> Vec<Action> {
        if self.doc.remove(id).is_none() {
            return Vec::new();
        }
        tracing::debug!(%id, "element removed");
        let mut actions = vec![Action::ElementDeleted { id: *id }];
        if self.ui.selected.as_ref() == Some(id) {
            actions.extend(self.select(None));
        } else {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    pub fn remove_selected(&mut self) -> Vec<Action> {
        match self.ui.selected {
            Some(id) => self.remove_element(&id),
            None => Vec::new(),
        }
    }

    /// Insert an image at the default size, centered on the canvas.
    pub fn insert_image(&mut self, url: String) -> Vec<Action> {
        let new = self.centered(ElementContent::Image { url }, DEFAULT_ELEMENT_WIDTH, DEFAULT_ELEMENT_HEIGHT);
        let id = self.doc.insert(new);
        self.created(id)
    }

    /// Insert a live element sized to fit the canvas; the element takes the stream.
    pub fn insert_live_source(&mut self, source: LiveSource, stream: AcquiredStream) -> Vec<Action> {
        let size = fit_to_canvas(source, stream.resolution);
        let content = ElementContent::Live { source, track_ids: stream.handle.track_ids() };
        let new = self.centered(content, size.width, size.height);
        let id = self.doc.insert_with_stream(new, stream.handle);
        self.created(id)
    }

    pub fn set_chroma_key(&mut self, id: ElementId, chroma_key: ChromaKey) -> Vec<Action> {
        self.update(id, PartialElement { chroma_key: Some(chroma_key), ..Default::default() })
    }

    /// Replace the presence list. Nothing in the board produces it yet.
    pub fn update_users(&mut self, users: Vec<User>) -> Vec<Action> {
        self.doc.update_users(users);
        vec![Action::RenderNeeded]
    }

    fn centered(&self, content: ElementContent, width: f64, height: f64) -> NewElement {
        NewElement {
            content,
            x: WORKSPACE_PADDING + (CANVAS_WIDTH - width) / 2.0,
            y: WORKSPACE_PADDING + (CANVAS_HEIGHT - height) / 2.0,
            width,
            height,
            z_index: self.doc.next_z_index(),
        }
    }

    fn created(&self, id: ElementId) -> Vec<Action> {
        match self.doc.get(&id) {
            Some(el) => {
                tracing::debug!(%id, kind = ?el.kind(), "element created");
                vec![Action::ElementCreated { element: el.clone() }, Action::RenderNeeded]
            }
            None => Vec::new(),
        }
    }

    fn update(&mut self, id: ElementId, fields: PartialElement) -> Vec<Action> {
        if self.doc.apply_partial(&id, &fields) {
            vec![Action::ElementUpdated { id, fields }, Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }
}
