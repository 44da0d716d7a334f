#![allow(clippy::float_cmp)]

use super::*;
use crate::engine::{Action, EngineCore};

fn core_with_images(n: usize) -> (EngineCore, Vec<ElementId>) {
    let mut core = EngineCore::with_viewport(1280.0, 800.0);
    let ids = (0..n)
        .map(|_| {
            core.insert_image("data:image/png;base64,AAAA".into())
                .into_iter()
                .find_map(|a| match a {
                    Action::ElementCreated { element } => Some(element.id),
                    _ => None,
                })
                .unwrap()
        })
        .collect();
    (core, ids)
}

// =============================================================
// Transform
// =============================================================

#[test]
fn transform_matches_viewport_mapping() {
    let mut v = Viewport::new(1280.0, 800.0);
    v.set_zoom(150.0);
    v.set_pan(120.0, -40.0);
    let t = Transform::from_viewport(&v);
    for p in [Point::new(0.0, 0.0), Point::new(680.0, 440.0), Point::new(1680.0, 1120.0)] {
        let a = t.apply(p);
        let b = v.workspace_to_screen(p);
        assert!((a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9);
    }
}

#[test]
fn transform_identity_zoom_centers_workspace() {
    let v = Viewport::new(1680.0, 1120.0);
    let t = Transform::from_viewport(&v);
    assert_eq!((t.translate_x, t.translate_y, t.scale), (0.0, 0.0, 1.0));
}

// =============================================================
// Editor scene
// =============================================================

#[test]
fn editor_items_in_paint_order() {
    let (mut core, ids) = core_with_images(3);
    core.move_layer_of(ids[0], crate::input::LayerDirection::Up);
    let scene = editor_scene(&core.snapshot());
    let order: Vec<_> = scene.items.iter().map(|i| i.id).collect();
    assert_eq!(order, vec![ids[1], ids[0], ids[2]]);
}

#[test]
fn editor_items_keep_workspace_coordinates() {
    let (core, _) = core_with_images(1);
    let scene = editor_scene(&core.snapshot());
    assert_eq!((scene.items[0].x, scene.items[0].y), (680.0, 440.0));
}

#[test]
fn editor_marks_selection() {
    let (mut core, ids) = core_with_images(2);
    core.select(Some(ids[1]));
    let scene = editor_scene(&core.snapshot());
    let selected: Vec<_> = scene.items.iter().filter(|i| i.selected).map(|i| i.id).collect();
    assert_eq!(selected, vec![ids[1]]);
}

#[test]
fn editor_canvas_and_grid() {
    let (core, _) = core_with_images(0);
    let scene = editor_scene(&core.snapshot());
    assert_eq!(scene.canvas, Bounds { x: 200.0, y: 200.0, width: 1280.0, height: 720.0 });
    assert_eq!(scene.grid_size, 50.0);
}

#[test]
fn editor_cursor_follows_mode() {
    let (mut core, _) = core_with_images(0);
    core.on_key_down(&crate::input::Key("Space".into()), false);
    let scene = editor_scene(&core.snapshot());
    assert_eq!(scene.mode, InputMode::PanReady);
    assert_eq!(scene.cursor, "grab");
}

#[test]
fn editor_reports_boundary() {
    let (mut core, _) = core_with_images(0);
    core.doc.viewport.set_pan(-190.0, 0.0);
    assert_eq!(editor_scene(&core.snapshot()).boundary, Some(Edge::Left));
}

// =============================================================
// Status / minimap
// =============================================================

#[test]
fn status_line_negates_and_rounds() {
    let mut v = Viewport::new(1280.0, 800.0);
    v.set_zoom(137.4);
    v.set_pan(12.6, -40.2);
    assert_eq!(status_line(&v), "-13, 40 • 137%");
}

#[test]
fn status_line_at_origin_has_no_negative_zero() {
    let v = Viewport::new(1280.0, 800.0);
    assert_eq!(status_line(&v), "0, 0 • 100%");
}

#[test]
fn minimap_canvas_fractions() {
    let m = minimap(&Viewport::new(1280.0, 800.0));
    assert!((m.canvas.x - 200.0 / 1680.0).abs() < 1e-12);
    assert!((m.canvas.width - 1280.0 / 1680.0).abs() < 1e-12);
    assert!((m.canvas.height - 720.0 / 1120.0).abs() < 1e-12);
}

#[test]
fn minimap_viewport_centered_at_rest() {
    let m = minimap(&Viewport::new(1280.0, 800.0));
    let cx = m.viewport.x + m.viewport.width / 2.0;
    let cy = m.viewport.y + m.viewport.height / 2.0;
    assert!((cx - 0.5).abs() < 1e-12 && (cy - 0.5).abs() < 1e-12);
}

#[test]
fn minimap_viewport_shrinks_when_zoomed_in() {
    let mut v = Viewport::new(1280.0, 800.0);
    let wide = minimap(&v).viewport.width;
    v.set_zoom(200.0);
    assert!((minimap(&v).viewport.width - wide / 2.0).abs() < 1e-12);
}

// =============================================================
// Viewer scene
// =============================================================

#[test]
fn viewer_subtracts_padding() {
    let (core, _) = core_with_images(1);
    let scene = viewer_scene(&core.snapshot());
    assert_eq!((scene.items[0].x, scene.items[0].y), (480.0, 240.0));
    assert_eq!((scene.items[0].width, scene.items[0].height), (320.0, 240.0));
}

#[test]
fn viewer_is_canvas_sized_and_transparent() {
    let (core, _) = core_with_images(0);
    let scene = viewer_scene(&core.snapshot());
    assert_eq!((scene.width, scene.height), (1280.0, 720.0));
    assert_eq!(scene.background, "transparent");
    assert!(scene.items.is_empty());
}

#[test]
fn viewer_ignores_viewport_and_selection() {
    let (mut core, ids) = core_with_images(1);
    let before = viewer_scene(&core.snapshot()).items;
    core.set_zoom(300.0);
    core.doc.viewport.set_pan(500.0, 500.0);
    core.select(Some(ids[0]));
    let after = viewer_scene(&core.snapshot()).items;
    assert_eq!(before, after);
}

#[test]
fn editor_and_viewer_agree_on_same_revision() {
    let (core, _) = core_with_images(2);
    let snap = core.snapshot();
    let editor = editor_scene(&snap);
    let viewer = viewer_scene(&snap);
    assert_eq!(editor.revision, viewer.revision);
    for (e, v) in editor.items.iter().zip(&viewer.items) {
        assert_eq!(e.id, v.id);
        assert_eq!(e.x - WORKSPACE_PADDING, v.x);
        assert_eq!(e.z_index, v.z_index);
    }
}

#[test]
fn viewer_scene_serializes_items() {
    let (core, _) = core_with_images(1);
    let v = serde_json::to_value(viewer_scene(&core.snapshot())).unwrap();
    assert_eq!(v["background"], "transparent");
    assert_eq!(v["items"][0]["content"]["kind"], "image");
}
