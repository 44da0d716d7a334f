//! Render/compose projections over a board snapshot.
//!
//! Two read paths share one snapshot: the interactive editor scene, drawn in
//! workspace coordinates under the viewport transform, and the passive viewer
//! scene, drawn canvas-relative against a transparent background for external
//! capture. Neither mutates anything; both list items bottom-first.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::Serialize;

use crate::camera::{Edge, Point, Viewport};
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, GRID_SIZE, WORKSPACE_HEIGHT, WORKSPACE_PADDING, WORKSPACE_WIDTH};
use crate::doc::{ChromaKey, Element, ElementContent, ElementId, User};
use crate::engine::BoardSnapshot;
use crate::input::InputMode;

/// Background of the viewer scene.
pub const VIEWER_BACKGROUND: &str = "transparent";

/// A rectangle in whatever space the containing scene documents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// `screen = translate + workspace * scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl Transform {
    #[must_use]
    pub fn from_viewport(v: &Viewport) -> Self {
        let s = v.scale();
        Self {
            translate_x: v.width / 2.0 - WORKSPACE_WIDTH / 2.0 * s + v.pan_x,
            translate_y: v.height / 2.0 - WORKSPACE_HEIGHT / 2.0 * s + v.pan_y,
            scale: s,
        }
    }

    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(self.translate_x + p.x * self.scale, self.translate_y + p.y * self.scale)
    }
}

/// One element to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneItem {
    pub id: ElementId,
    pub content: ElementContent,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub z_index: i64,
    pub selected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chroma_key: Option<ChromaKey>,
}

impl SceneItem {
    fn from_element(el: &Element, offset: f64, selected: bool) -> Self {
        Self {
            id: el.id,
            content: el.content.clone(),
            x: el.x - offset,
            y: el.y - offset,
            width: el.width,
            height: el.height,
            z_index: el.z_index,
            selected,
            chroma_key: el.chroma_key,
        }
    }
}

/// Canvas and visible-region rectangles as fractions of the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Minimap {
    pub canvas: Bounds,
    pub viewport: Bounds,
}

/// The interactive editor view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorScene {
    pub revision: u64,
    pub viewport: Viewport,
    pub transform: Transform,
    /// Canvas sub-region in workspace coordinates.
    pub canvas: Bounds,
    pub grid_size: f64,
    pub items: Vec<SceneItem>,
    pub mode: InputMode,
    pub cursor: &'static str,
    pub boundary: Option<Edge>,
    pub momentum: Point,
    pub animating: bool,
    /// `"x, y • zoom%"` position readout.
    pub status: String,
    pub minimap: Minimap,
    pub users: Vec<User>,
}

/// The passive capture view: canvas-relative, no viewport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewerScene {
    pub revision: u64,
    pub width: f64,
    pub height: f64,
    pub background: &'static str,
    pub items: Vec<SceneItem>,
}

/// Project a snapshot into the editor scene.
#[must_use]
pub fn editor_scene(snap: &BoardSnapshot) -> EditorScene {
    let v = snap.doc.viewport;
    let items = paint_order(&snap.doc.elements)
        .into_iter()
        .map(|el| SceneItem::from_element(el, 0.0, snap.selected == Some(el.id)))
        .collect();

    EditorScene {
        revision: snap.doc.revision,
        viewport: v,
        transform: Transform::from_viewport(&v),
        canvas: Bounds { x: WORKSPACE_PADDING, y: WORKSPACE_PADDING, width: CANVAS_WIDTH, height: CANVAS_HEIGHT },
        grid_size: GRID_SIZE,
        items,
        mode: snap.mode,
        cursor: snap.mode.cursor(),
        boundary: snap.boundary,
        momentum: snap.momentum,
        animating: snap.animating,
        status: status_line(&v),
        minimap: minimap(&v),
        users: snap.doc.users.clone(),
    }
}

/// Project a snapshot into the viewer scene. Only the elements are read.
#[must_use]
pub fn viewer_scene(snap: &BoardSnapshot) -> ViewerScene {
    ViewerScene {
        revision: snap.doc.revision,
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
        background: VIEWER_BACKGROUND,
        items: viewer_items(&snap.doc.elements),
    }
}

/// Viewer items: elements shifted from workspace to canvas coordinates, bottom first.
#[must_use]
pub fn viewer_items(elements: &[Element]) -> Vec<SceneItem> {
    paint_order(elements)
        .into_iter()
        .map(|el| SceneItem::from_element(el, WORKSPACE_PADDING, false))
        .collect()
}

/// Position readout: the negated pan and the zoom, rounded.
#[must_use]
pub fn status_line(v: &Viewport) -> String {
    format!("{}, {} • {}%", rounded(-v.pan_x), rounded(-v.pan_y), rounded(v.zoom))
}

#[must_use]
pub fn minimap(v: &Viewport) -> Minimap {
    let s = v.scale();
    let top_left = v.screen_to_workspace(Point::new(0.0, 0.0));
    Minimap {
        canvas: Bounds {
            x: WORKSPACE_PADDING / WORKSPACE_WIDTH,
            y: WORKSPACE_PADDING / WORKSPACE_HEIGHT,
            width: CANVAS_WIDTH / WORKSPACE_WIDTH,
            height: CANVAS_HEIGHT / WORKSPACE_HEIGHT,
        },
        viewport: Bounds {
            x: top_left.x / WORKSPACE_WIDTH,
            y: top_left.y / WORKSPACE_HEIGHT,
            width: v.width / s / WORKSPACE_WIDTH,
            height: v.height / s / WORKSPACE_HEIGHT,
        },
    }
}

fn paint_order(elements: &[Element]) -> Vec<&Element> {
    let mut els: Vec<&Element> = elements.iter().collect();
    els.sort_by_key(|e| e.z_index);
    els
}

fn rounded(v: f64) -> f64 {
    // adding +0.0 turns -0.0 into 0.0
    v.round() + 0.0
}
