//! Hit-testing against board elements.
//!
//! Elements are tested topmost first (highest z, later insertion on ties).
//! Each element's four corner handles are tested before its body; a handle
//! extends `HANDLE_RADIUS_PX` screen pixels around its corner, so it stays
//! grabbable at any zoom and slightly overhangs the element.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use serde::{Deserialize, Serialize};

use crate::camera::{Point, Viewport};
use crate::consts::HANDLE_RADIUS_PX;
use crate::doc::{DocStore, Element, ElementId};

/// Corner resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Corner {
    Nw,
    Ne,
    Sw,
    Se,
}

impl Corner {
    pub const ALL: [Self; 4] = [Self::Nw, Self::Ne, Self::Sw, Self::Se];

    /// Workspace position of this corner on `el`.
    #[must_use]
    pub fn position(self, el: &Element) -> Point {
        match self {
            Self::Nw => Point::new(el.x, el.y),
            Self::Ne => Point::new(el.x + el.width, el.y),
            Self::Sw => Point::new(el.x, el.y + el.height),
            Self::Se => Point::new(el.x + el.width, el.y + el.height),
        }
    }

    /// Whether dragging this corner moves the element's left edge.
    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::Nw | Self::Sw)
    }

    /// Whether dragging this corner moves the element's top edge.
    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::Nw | Self::Ne)
    }
}

/// Which part of an element was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(Corner),
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub element_id: ElementId,
    pub part: HitPart,
}

/// Find the topmost element part under `workspace_pt`.
#[must_use]
pub fn hit_test(workspace_pt: Point, doc: &DocStore, viewport: &Viewport) -> Option<Hit> {
    let radius = viewport.screen_dist_to_workspace(HANDLE_RADIUS_PX);
    doc.sorted_elements().into_iter().rev().find_map(|el| hit_element(workspace_pt, el, radius))
}

fn hit_element(pt: Point, el: &Element, radius: f64) -> Option<Hit> {
    for corner in Corner::ALL {
        let c = corner.position(el);
        if (pt.x - c.x).hypot(pt.y - c.y) <= radius {
            return Some(Hit { element_id: el.id, part: HitPart::ResizeHandle(corner) });
        }
    }
    if el.contains(pt.x, pt.y) {
        return Some(Hit { element_id: el.id, part: HitPart::Body });
    }
    None
}
