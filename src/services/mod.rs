//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the board lock, the capture broker and the session so
//! route handlers stay focused on extracting requests and mapping errors to
//! status codes.

pub mod animation;
pub mod board;
pub mod media;
pub mod session;
