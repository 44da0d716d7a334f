//! Viewport and direct-manipulation engine for the media board.
//!
//! This crate is pure and host-agnostic: no I/O, no clock, no async. It owns
//! the coordinate system that maps the fixed-size canvas (inside a padded
//! workspace) to a zoomable, pannable, clamped viewport, the element store,
//! and the controller that turns drag gestures into pans, moves and resizes.
//! The host feeds it input and a clock and forwards the resulting
//! [`engine::Action`]s to its readers.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Direct-manipulation controller, [`engine::EngineCore`] |
//! | [`doc`] | Element store and element types |
//! | [`camera`] | Zoom, pan clamping, boundary detection, coordinate conversions |
//! | [`animation`] | Eased pan animation |
//! | [`input`] | Keys, drag frames, input mode and the gesture state machine |
//! | [`hit`] | Hit-testing against elements and their corner handles |
//! | [`media`] | Stream handles, stream sizing and image ingestion |
//! | [`render`] | Editor and viewer projections |
//! | [`consts`] | Canvas geometry, zoom limits and other constants |

pub mod animation;
pub mod camera;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod hit;
pub mod input;
pub mod media;
pub mod render;
