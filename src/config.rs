//! Host configuration parsed from environment variables.
//!
//! Canvas geometry and zoom limits are compile-time constants in
//! `canvas::consts`; only deployment knobs live here.

use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 800.0;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_PAN_FRAME_MS: u64 = 16;
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 64 * 1024 * 1024;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be greater than zero")]
    Zero { var: &'static str },

    #[error("PUBLIC_BASE_URL must start with http:// or https://, got {0}")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardConfig {
    pub port: u16,
    /// Viewport pixel size assumed until the front-end reports its own.
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Origin used to build the viewer link, without a trailing slash.
    pub public_base_url: String,
    /// How long a stream acquisition waits for the front-end to answer.
    pub acquire_timeout: Duration,
    /// Period of the pan animation timer.
    pub pan_frame: Duration,
    /// Largest accepted image upload body.
    pub max_image_bytes: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            public_base_url: format!("http://127.0.0.1:{DEFAULT_PORT}"),
            acquire_timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
            pan_frame: Duration::from_millis(DEFAULT_PAN_FRAME_MS),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl BoardConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `VIEWPORT_WIDTH` / `VIEWPORT_HEIGHT`: default 1280×800
    /// - `PUBLIC_BASE_URL`: default `http://127.0.0.1:{PORT}`
    /// - `ACQUIRE_TIMEOUT_SECS`: default 60
    /// - `PAN_FRAME_MS`: default 16
    /// - `MAX_IMAGE_BYTES`: default 64 MiB
    ///
    /// Unparseable numbers fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for zero sizes, periods or upload limits and for a base URL
    /// that is not http(s).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] over an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`Self::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT);
        let viewport_width = positive(parse_or(&lookup, "VIEWPORT_WIDTH", DEFAULT_VIEWPORT_WIDTH), "VIEWPORT_WIDTH")?;
        let viewport_height = positive(parse_or(&lookup, "VIEWPORT_HEIGHT", DEFAULT_VIEWPORT_HEIGHT), "VIEWPORT_HEIGHT")?;

        let acquire_secs = parse_or(&lookup, "ACQUIRE_TIMEOUT_SECS", DEFAULT_ACQUIRE_TIMEOUT_SECS);
        if acquire_secs == 0 {
            return Err(ConfigError::Zero { var: "ACQUIRE_TIMEOUT_SECS" });
        }
        let frame_ms = parse_or(&lookup, "PAN_FRAME_MS", DEFAULT_PAN_FRAME_MS);
        if frame_ms == 0 {
            return Err(ConfigError::Zero { var: "PAN_FRAME_MS" });
        }
        let max_image_bytes = parse_or(&lookup, "MAX_IMAGE_BYTES", DEFAULT_MAX_IMAGE_BYTES);
        if max_image_bytes == 0 {
            return Err(ConfigError::Zero { var: "MAX_IMAGE_BYTES" });
        }

        let public_base_url = match lookup("PUBLIC_BASE_URL") {
            Some(raw) => {
                let url = raw.trim().trim_end_matches('/').to_owned();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::InvalidBaseUrl(url));
                }
                url
            }
            None => format!("http://127.0.0.1:{port}"),
        };

        Ok(Self {
            port,
            viewport_width,
            viewport_height,
            public_base_url,
            acquire_timeout: Duration::from_secs(acquire_secs),
            pan_frame: Duration::from_millis(frame_ms),
            max_image_bytes,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key).and_then(|v| v.trim().parse::<T>().ok()).unwrap_or(default)
}

fn positive(v: f64, var: &'static str) -> Result<f64, ConfigError> {
    if v > 0.0 && v.is_finite() { Ok(v) } else { Err(ConfigError::Zero { var }) }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
