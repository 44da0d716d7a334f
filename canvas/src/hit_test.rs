use super::*;
use crate::doc::{ElementContent, NewElement};

fn image_at(doc: &mut DocStore, x: f64, y: f64, w: f64, h: f64, z: i64) -> ElementId {
    doc.insert(NewElement { content: ElementContent::Image { url: String::new() }, x, y, width: w, height: h, z_index: z })
}

fn vp(zoom: f64) -> Viewport {
    let mut v = Viewport::new(800.0, 600.0);
    v.set_zoom(zoom);
    v
}

// =============================================================
// Corner
// =============================================================

#[test]
fn corner_positions() {
    let mut doc = DocStore::new();
    let id = image_at(&mut doc, 10.0, 20.0, 100.0, 50.0, 1);
    let el = doc.get(&id).unwrap();
    assert_eq!(Corner::Nw.position(el), Point::new(10.0, 20.0));
    assert_eq!(Corner::Ne.position(el), Point::new(110.0, 20.0));
    assert_eq!(Corner::Sw.position(el), Point::new(10.0, 70.0));
    assert_eq!(Corner::Se.position(el), Point::new(110.0, 70.0));
}

#[test]
fn corner_moving_edges() {
    assert!(Corner::Nw.moves_left() && Corner::Nw.moves_top());
    assert!(!Corner::Ne.moves_left() && Corner::Ne.moves_top());
    assert!(Corner::Sw.moves_left() && !Corner::Sw.moves_top());
    assert!(!Corner::Se.moves_left() && !Corner::Se.moves_top());
}

#[test]
fn corner_serde_lowercase() {
    assert_eq!(serde_json::to_string(&Corner::Sw).unwrap(), "\"sw\"");
}

// =============================================================
// hit_test
// =============================================================

#[test]
fn empty_doc_hits_nothing() {
    let doc = DocStore::new();
    assert!(hit_test(Point::new(500.0, 500.0), &doc, &vp(100.0)).is_none());
}

#[test]
fn body_hit() {
    let mut doc = DocStore::new();
    let id = image_at(&mut doc, 680.0, 440.0, 320.0, 240.0, 1);
    let hit = hit_test(Point::new(800.0, 500.0), &doc, &vp(100.0)).unwrap();
    assert_eq!(hit, Hit { element_id: id, part: HitPart::Body });
}

#[test]
fn miss_outside() {
    let mut doc = DocStore::new();
    image_at(&mut doc, 680.0, 440.0, 320.0, 240.0, 1);
    assert!(hit_test(Point::new(300.0, 300.0), &doc, &vp(100.0)).is_none());
}

#[test]
fn handle_hit_each_corner() {
    let mut doc = DocStore::new();
    let id = image_at(&mut doc, 680.0, 440.0, 320.0, 240.0, 1);
    let el = doc.get(&id).unwrap().clone();
    for corner in Corner::ALL {
        let p = corner.position(&el);
        let hit = hit_test(p, &doc, &vp(100.0)).unwrap();
        assert_eq!(hit.part, HitPart::ResizeHandle(corner));
    }
}

#[test]
fn handle_overhangs_element() {
    let mut doc = DocStore::new();
    image_at(&mut doc, 680.0, 440.0, 320.0, 240.0, 1);
    let hit = hit_test(Point::new(675.0, 435.0), &doc, &vp(100.0)).unwrap();
    assert_eq!(hit.part, HitPart::ResizeHandle(Corner::Nw));
}

#[test]
fn handle_radius_shrinks_in_workspace_at_high_zoom() {
    let mut doc = DocStore::new();
    image_at(&mut doc, 680.0, 440.0, 320.0, 240.0, 1);
    // 6 workspace px from the corner: inside 8px at 100%, outside 2px at 400%
    let p = Point::new(686.0, 440.0);
    assert_eq!(hit_test(p, &doc, &vp(100.0)).unwrap().part, HitPart::ResizeHandle(Corner::Nw));
    assert_eq!(hit_test(p, &doc, &vp(400.0)).unwrap().part, HitPart::Body);
}

#[test]
fn topmost_z_wins() {
    let mut doc = DocStore::new();
    let low = image_at(&mut doc, 300.0, 300.0, 400.0, 400.0, 5);
    let high = image_at(&mut doc, 300.0, 300.0, 400.0, 400.0, 9);
    let hit = hit_test(Point::new(500.0, 500.0), &doc, &vp(100.0)).unwrap();
    assert_eq!(hit.element_id, high);
    assert_ne!(hit.element_id, low);
}

#[test]
fn later_insertion_wins_on_z_tie() {
    let mut doc = DocStore::new();
    image_at(&mut doc, 300.0, 300.0, 400.0, 400.0, 1);
    let later = image_at(&mut doc, 300.0, 300.0, 400.0, 400.0, 1);
    let hit = hit_test(Point::new(500.0, 500.0), &doc, &vp(100.0)).unwrap();
    assert_eq!(hit.element_id, later);
}

#[test]
fn lower_element_hit_outside_upper() {
    let mut doc = DocStore::new();
    let low = image_at(&mut doc, 300.0, 300.0, 400.0, 400.0, 1);
    image_at(&mut doc, 300.0, 300.0, 100.0, 100.0, 2);
    let hit = hit_test(Point::new(600.0, 600.0), &doc, &vp(100.0)).unwrap();
    assert_eq!(hit.element_id, low);
}
