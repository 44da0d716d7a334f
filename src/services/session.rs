//! Room session: who is presenting, and under which room key.
//!
//! DESIGN
//! ======
//! There is no authentication. Joining only records a nickname and a room
//! key, moves the host from pre-join to board, and yields the link a capture
//! tool (OBS browser source) opens to show the viewer projection. Room keys
//! are restricted to URL-safe characters so the link needs no escaping.

use serde::Serialize;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("nickname is required")]
    MissingNickname,

    #[error("room key is required")]
    MissingRoomKey,

    #[error("room key may only contain letters, digits, '-' and '_': {0}")]
    InvalidRoomKey(String),

    #[error("no room joined")]
    NotJoined,
}

/// A joined room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub nickname: String,
    pub room_key: String,
}

impl Session {
    /// Viewer link for this session under `base`.
    #[must_use]
    pub fn viewer_url(&self, base: &str) -> String {
        viewer_url(base, &self.room_key)
    }
}

/// Validate and trim join input.
///
/// # Errors
///
/// Returns [`SessionError`] when either field is blank after trimming or the
/// room key holds characters outside `[A-Za-z0-9_-]`.
pub fn join(nickname: &str, room_key: &str) -> Result<Session, SessionError> {
    let nickname = nickname.trim();
    let room_key = room_key.trim();
    if nickname.is_empty() {
        return Err(SessionError::MissingNickname);
    }
    if room_key.is_empty() {
        return Err(SessionError::MissingRoomKey);
    }
    if !room_key.chars().all(is_room_key_char) {
        return Err(SessionError::InvalidRoomKey(room_key.to_owned()));
    }
    Ok(Session { nickname: nickname.to_owned(), room_key: room_key.to_owned() })
}

/// `{base}/view?roomKey={key}`.
#[must_use]
pub fn viewer_url(base: &str, room_key: &str) -> String {
    format!("{}/view?roomKey={room_key}", base.trim_end_matches('/'))
}

fn is_room_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
