//! Document model: board elements, their properties, and the in-memory store.
//!
//! This module defines what is on the board (`Element`, `ElementContent`), a
//! sparse-update type for incremental edits (`PartialElement`), the presence
//! list (`User`), and the runtime store that owns every live element together
//! with the viewport (`DocStore`).
//!
//! The store performs no positional validation: the engine clamps positions
//! and sizes before it writes. Readers never see the store directly; they get
//! an immutable `DocSnapshot` taken after a write, so the editor and the
//! viewer always render the same revision.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Viewport;
use crate::media::{LiveSource, StreamHandle};

/// Unique identifier for a board element.
pub type ElementId = Uuid;

/// Chroma-key colour to knock out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyColor {
    Green,
    Blue,
}

/// Chroma-key settings carried on an element. Stored and round-tripped only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChromaKey {
    pub enabled: bool,
    pub color: KeyColor,
    pub sensitivity: f64,
}

/// What an element displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementContent {
    /// A static image referenced by URL (typically a `data:` URL).
    Image { url: String },
    /// A live capture. The stream handle itself is owned by the store.
    Live { source: LiveSource, track_ids: Vec<String> },
}

/// Flat element kind for callers that do not need the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Image,
    Webcam,
    Screen,
}

impl ElementContent {
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Image { .. } => ElementKind::Image,
            Self::Live { source: LiveSource::Webcam, .. } => ElementKind::Webcam,
            Self::Live { source: LiveSource::Screen, .. } => ElementKind::Screen,
        }
    }
}

/// A positioned, sized, z-ordered media tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier for this element.
    pub id: ElementId,
    /// Image or live capture payload.
    pub content: ElementContent,
    /// Left edge in workspace coordinates.
    pub x: f64,
    /// Top edge in workspace coordinates.
    pub y: f64,
    /// Width in workspace pixels.
    pub width: f64,
    /// Height in workspace pixels.
    pub height: f64,
    /// Stacking order; lower values are drawn beneath higher values.
    pub z_index: i64,
    /// Chroma-key settings, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chroma_key: Option<ChromaKey>,
}

impl Element {
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.content.kind()
    }

    /// Whether `(x, y)` in workspace coordinates lies inside the element.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Element fields supplied by the caller on insert; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewElement {
    pub content: ElementContent,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub z_index: i64,
}

/// Sparse update for an element. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chroma_key: Option<ChromaKey>,
}

/// A participant in the room. Nothing populates this list yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub nickname: String,
    pub is_active: bool,
    /// Unix milliseconds of the last activity.
    pub last_seen_ms: i64,
}

/// Immutable copy of the store taken after a write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocSnapshot {
    pub revision: u64,
    /// Elements in insertion order.
    pub elements: Vec<Element>,
    pub viewport: Viewport,
    pub users: Vec<User>,
}

/// In-memory store of board elements, viewport and presence.
pub struct DocStore {
    elements: HashMap<ElementId, Element>,
    /// Insertion order of live element ids.
    order: Vec<ElementId>,
    /// Stream handles owned by live elements.
    streams: HashMap<ElementId, StreamHandle>,
    users: Vec<User>,
    /// Current zoom and pan.
    pub viewport: Viewport,
    revision: u64,
}

impl DocStore {
    /// Create an empty store with a default viewport.
    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: HashMap::new(),
            order: Vec::new(),
            streams: HashMap::new(),
            users: Vec::new(),
            viewport: Viewport::default(),
            revision: 0,
        }
    }

    /// Insert a new element under a fresh id and append it to the order.
    pub fn insert(&mut self, new: NewElement) -> ElementId {
        let id = Uuid::new_v4();
        let element = Element {
            id,
            content: new.content,
            x: new.x,
            y: new.y,
            width: new.width,
            height: new.height,
            z_index: new.z_index,
            chroma_key: None,
        };
        self.elements.insert(id, element);
        self.order.push(id);
        self.touch();
        id
    }

    /// Insert a live element that takes ownership of `stream`.
    pub fn insert_with_stream(&mut self, new: NewElement, stream: StreamHandle) -> ElementId {
        let id = self.insert(new);
        self.streams.insert(id, stream);
        id
    }

    /// Remove an element by id, releasing its stream if it owns one.
    pub fn remove(&mut self, id: &ElementId) -> Option<Element> {
        let removed = self.elements.remove(id)?;
        self.order.retain(|eid| eid != id);
        if let Some(mut stream) = self.streams.remove(id) {
            stream.release();
        }
        self.touch();
        Some(removed)
    }

    /// Return a reference to an element by id.
    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    /// The stream owned by an element, if any.
    #[must_use]
    pub fn stream(&self, id: &ElementId) -> Option<&StreamHandle> {
        self.streams.get(id)
    }

    /// Apply a partial update to an existing element. Returns false if the element doesn't exist.
    pub fn apply_partial(&mut self, id: &ElementId, partial: &PartialElement) -> bool {
        let Some(el) = self.elements.get_mut(id) else {
            return false;
        };
        if let Some(x) = partial.x {
            el.x = x;
        }
        if let Some(y) = partial.y {
            el.y = y;
        }
        if let Some(w) = partial.width {
            el.width = w;
        }
        if let Some(h) = partial.height {
            el.height = h;
        }
        if let Some(z) = partial.z_index {
            el.z_index = z;
        }
        if let Some(chroma) = partial.chroma_key {
            el.chroma_key = Some(chroma);
        }
        self.touch();
        true
    }

    /// Elements in insertion order.
    #[must_use]
    pub fn elements(&self) -> Vec<&Element> {
        self.order.iter().filter_map(|id| self.elements.get(id)).collect()
    }

    /// Elements sorted by `(z_index, insertion order)`: paint order, bottom first.
    #[must_use]
    pub fn sorted_elements(&self) -> Vec<&Element> {
        let mut els = self.elements();
        // stable sort keeps insertion order on ties
        els.sort_by_key(|e| e.z_index);
        els
    }

    /// Z-order for the next inserted element.
    #[must_use]
    pub fn next_z_index(&self) -> i64 {
        i64::try_from(self.elements.len()).map_or(i64::MAX, |n| n + 1)
    }

    /// Replace the presence list.
    pub fn update_users(&mut self, users: Vec<User>) {
        self.users = users;
        self.touch();
    }

    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Number of elements currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the store contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Monotonic write counter.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Mark the store as changed. Viewport writes go through here too.
    pub fn touch(&mut self) {
        self.revision += 1;
    }

    /// Copy the current state for readers.
    #[must_use]
    pub fn snapshot(&self) -> DocSnapshot {
        DocSnapshot {
            revision: self.revision,
            elements: self.elements().into_iter().cloned().collect(),
            viewport: self.viewport,
            users: self.users.clone(),
        }
    }
}

impl Default for DocStore {
    fn default() -> Self {
        Self::new()
    }
}
