//! Media sources: live stream handles, display sizing, and image ingestion.
//!
//! A live element exclusively owns one `StreamHandle`. The handle stops every
//! track exactly once, either when the store releases it on removal or, if
//! nobody released it, when it is dropped.

#[cfg(test)]
#[path = "media_test.rs"]
mod media_test;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, STREAM_FIT_RATIO};

/// Which kind of live capture feeds an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiveSource {
    /// A camera.
    Webcam,
    /// A captured screen or window.
    Screen,
}

impl LiveSource {
    /// Resolution requested from the capture device.
    #[must_use]
    pub fn ideal_resolution(self) -> Resolution {
        match self {
            Self::Webcam => Resolution { width: 1280, height: 720 },
            Self::Screen => Resolution { width: 1920, height: 1080 },
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Webcam => "webcam",
            Self::Screen => "screen",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "webcam" => Some(Self::Webcam),
            "screen" => Some(Self::Screen),
            _ => None,
        }
    }
}

/// Pixel dimensions of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// Display size of an element in workspace pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Scale a stream so it fits inside 80% of the canvas on both axes while
/// keeping its aspect ratio. Zero dimensions fall back to the source's
/// ideal resolution.
#[must_use]
pub fn fit_to_canvas(source: LiveSource, actual: Option<Resolution>) -> Size {
    let ideal = source.ideal_resolution();
    let (w, h) = match actual {
        Some(r) => (
            if r.width == 0 { ideal.width } else { r.width },
            if r.height == 0 { ideal.height } else { r.height },
        ),
        None => (ideal.width, ideal.height),
    };
    let w = f64::from(w);
    let h = f64::from(h);
    let max_w = CANVAS_WIDTH * STREAM_FIT_RATIO;
    let max_h = CANVAS_HEIGHT * STREAM_FIT_RATIO;
    let scale = (max_w / w).min(max_h / h);
    Size { width: w * scale, height: h * scale }
}

// =============================================================================
// STREAM HANDLE
// =============================================================================

/// One track of a live capture (video, audio).
pub trait MediaTrack: Send + Sync {
    /// Host-assigned identifier of the track.
    fn id(&self) -> &str;
    /// Stop the track and release the underlying device.
    fn stop(&mut self);
}

/// Owned handle to a live capture stream.
pub struct StreamHandle {
    tracks: Vec<Box<dyn MediaTrack>>,
    released: bool,
}

impl StreamHandle {
    #[must_use]
    pub fn new(tracks: Vec<Box<dyn MediaTrack>>) -> Self {
        Self { tracks, released: false }
    }

    /// Ids of the tracks owned by this stream.
    #[must_use]
    pub fn track_ids(&self) -> Vec<String> {
        self.tracks.iter().map(|t| t.id().to_owned()).collect()
    }

    #[must_use]
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Stop every track. Subsequent calls do nothing and return 0.
    pub fn release(&mut self) -> usize {
        if self.released {
            return 0;
        }
        self.released = true;
        for track in &mut self.tracks {
            track.stop();
        }
        tracing::debug!(tracks = self.tracks.len(), "stream released");
        self.tracks.len()
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle")
            .field("tracks", &self.track_ids())
            .field("released", &self.released)
            .finish()
    }
}

/// A granted capture: the live handle plus the resolution the device settled on.
#[derive(Debug)]
pub struct AcquiredStream {
    pub handle: StreamHandle,
    pub resolution: Option<Resolution>,
}

/// Why a capture request produced no stream.
#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    /// The user or the OS refused permission.
    #[error("permission denied")]
    Denied,

    /// No capture device is available.
    #[error("no capture device available")]
    NoDevice,

    /// The platform cannot capture this source.
    #[error("capture unsupported: {0}")]
    Unsupported(String),

    /// The request was cancelled before it completed.
    #[error("capture request cancelled")]
    Cancelled,

    /// Nobody answered the request in time.
    #[error("capture request timed out")]
    TimedOut,
}

// =============================================================================
// IMAGE INGESTION
// =============================================================================

/// Errors produced while turning a local file into a displayable image.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("image file is empty")]
    Empty,

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
}

/// Raster formats recognised by their magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
}

impl ImageFormat {
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::WebP => "image/webp",
        }
    }

    /// Detect the format from the leading bytes of the file.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            Some(Self::Png)
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if data.starts_with(b"GIF8") {
            Some(Self::Gif)
        } else if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            Some(Self::WebP)
        } else {
            None
        }
    }
}

/// Encode an uploaded file as a `data:` URL.
///
/// The MIME type comes from the file's magic bytes when recognised, else from
/// `content_type` when it names an `image/*` type. Parameters after `;` are dropped.
///
/// # Errors
///
/// Returns [`IngestError::Empty`] for an empty file and
/// [`IngestError::UnsupportedFormat`] when neither the bytes nor the declared
/// content type identify an image.
pub fn ingest_image(bytes: &[u8], content_type: Option<&str>) -> Result<String, IngestError> {
    if bytes.is_empty() {
        return Err(IngestError::Empty);
    }
    let mime = match ImageFormat::from_magic_bytes(bytes) {
        Some(format) => format.mime_type().to_owned(),
        None => match content_type.map(|ct| ct.split_once(';').map_or(ct, |(mime, _)| mime).trim()) {
            Some(ct) if ct.starts_with("image/") => ct.to_owned(),
            other => return Err(IngestError::UnsupportedFormat(other.unwrap_or("unknown").to_owned())),
        },
    };
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}
