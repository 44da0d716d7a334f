//! Capture brokering between the host and the browser front-end.
//!
//! DESIGN
//! ======
//! The host cannot open cameras or screens itself. An acquisition registers a
//! pending request keyed by a fresh id and hands the front-end the resolution
//! hint; the front-end runs the browser capture and answers with grant, deny
//! or cancel. The waiting side holds a `oneshot` receiver and gives up after
//! the configured timeout.
//!
//! RELEASE
//! =======
//! A granted stream is wrapped in `RemoteTrack`s. Stopping a track cannot
//! touch the browser directly, so its id goes to the `ReleaseOutbox`, which
//! the front-end drains to stop its own tracks. Dropping a stream that never
//! reached the board (request abandoned mid-grant) releases it the same way.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use canvas::media::{AcquireError, AcquiredStream, LiveSource, MediaTrack, Resolution, StreamHandle};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tracing::{debug, info};
use uuid::Uuid;

type Outcome = Result<AcquiredStream, AcquireError>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BrokerError {
    #[error("unknown capture request: {0}")]
    UnknownRequest(Uuid),
}

// =============================================================================
// RELEASE OUTBOX
// =============================================================================

/// Track ids the host has stopped and the front-end has not yet collected.
#[derive(Clone, Default)]
pub struct ReleaseOutbox {
    ids: Arc<Mutex<Vec<String>>>,
}

impl ReleaseOutbox {
    fn push(&self, id: String) {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner).push(id);
    }

    /// Drain every queued id, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.ids.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// A track living in the browser, stopped by queueing its id.
pub struct RemoteTrack {
    id: String,
    outbox: ReleaseOutbox,
}

impl RemoteTrack {
    #[must_use]
    pub fn new(id: String, outbox: ReleaseOutbox) -> Self {
        Self { id, outbox }
    }
}

impl MediaTrack for RemoteTrack {
    fn id(&self) -> &str {
        &self.id
    }

    fn stop(&mut self) {
        debug!(track = %self.id, "queueing track stop");
        self.outbox.push(self.id.clone());
    }
}

// =============================================================================
// REQUEST BODIES
// =============================================================================

/// Front-end answer for a successful capture.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GrantBody {
    /// Settled width of the video track, if known.
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// Browser track ids that make up the stream.
    #[serde(default)]
    pub tracks: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    Denied,
    NoDevice,
    Unsupported,
}

/// Front-end answer for a failed capture.
#[derive(Debug, Clone, Deserialize)]
pub struct DenyBody {
    pub reason: DenyReason,
    #[serde(default)]
    pub message: Option<String>,
}

impl DenyBody {
    fn into_error(self) -> AcquireError {
        match self.reason {
            DenyReason::Denied => AcquireError::Denied,
            DenyReason::NoDevice => AcquireError::NoDevice,
            DenyReason::Unsupported => {
                AcquireError::Unsupported(self.message.unwrap_or_else(|| "unsupported source".to_owned()))
            }
        }
    }
}

/// What the front-end needs to start a browser capture.
#[derive(Debug, Clone, Serialize)]
pub struct AcquireTicket {
    pub request_id: Uuid,
    pub source: LiveSource,
    pub ideal: Resolution,
}

// =============================================================================
// BROKER
// =============================================================================

struct Pending {
    source: LiveSource,
    tx: oneshot::Sender<Outcome>,
}

/// Registry of capture requests awaiting a front-end answer.
#[derive(Clone, Default)]
pub struct MediaBroker {
    pending: Arc<Mutex<HashMap<Uuid, Pending>>>,
    outbox: ReleaseOutbox,
}

/// Waiting side of one capture request.
pub struct PendingRequest {
    pub ticket: AcquireTicket,
    rx: oneshot::Receiver<Outcome>,
    broker: MediaBroker,
}

impl PendingRequest {
    /// Wait for the front-end answer.
    ///
    /// # Errors
    ///
    /// Returns the front-end's [`AcquireError`], `Cancelled` if the request
    /// was dropped, or `TimedOut` after `timeout` (the request is then
    /// forgotten, so a late grant gets `UnknownRequest`).
    pub async fn wait(self, timeout: Duration) -> Outcome {
        match tokio::time::timeout(timeout, self.rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(AcquireError::Cancelled),
            Err(_) => {
                self.broker.forget(self.ticket.request_id);
                Err(AcquireError::TimedOut)
            }
        }
    }
}

impl MediaBroker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capture request for `source`.
    #[must_use]
    pub fn open(&self, source: LiveSource) -> PendingRequest {
        let (tx, rx) = oneshot::channel();
        let request_id = Uuid::new_v4();
        self.lock().insert(request_id, Pending { source, tx });
        info!(%request_id, source = source.as_str(), "capture requested");
        PendingRequest {
            ticket: AcquireTicket { request_id, source, ideal: source.ideal_resolution() },
            rx,
            broker: self.clone(),
        }
    }

    /// Complete a request with the granted tracks.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::UnknownRequest`] if the id is not pending.
    pub fn grant(&self, request_id: Uuid, body: GrantBody) -> Result<(), BrokerError> {
        let pending = self.take(request_id)?;
        let tracks: Vec<Box<dyn MediaTrack>> = body
            .tracks
            .into_iter()
            .map(|id| Box::new(RemoteTrack::new(id, self.outbox.clone())) as Box<dyn MediaTrack>)
            .collect();
        let resolution = match (body.width, body.height) {
            (Some(width), Some(height)) => Some(Resolution { width, height }),
            _ => None,
        };
        let stream = AcquiredStream { handle: StreamHandle::new(tracks), resolution };
        info!(%request_id, source = pending.source.as_str(), tracks = stream.handle.track_count(), "capture granted");
        // A closed receiver hands the stream back; dropping it queues its tracks for release.
        if let Err(Ok(unclaimed)) = pending.tx.send(Ok(stream)) {
            debug!(%request_id, "capture granted after waiter left");
            drop(unclaimed);
        }
        Ok(())
    }

    /// Fail a request with the front-end's reason.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::UnknownRequest`] if the id is not pending.
    pub fn deny(&self, request_id: Uuid, body: DenyBody) -> Result<(), BrokerError> {
        let pending = self.take(request_id)?;
        if pending.tx.send(Err(body.into_error())).is_err() {
            debug!(%request_id, "capture denied after waiter left");
        }
        Ok(())
    }

    /// Abandon a request. The waiter observes `Cancelled`.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::UnknownRequest`] if the id is not pending.
    pub fn cancel(&self, request_id: Uuid) -> Result<(), BrokerError> {
        self.take(request_id).map(drop)
    }

    /// Ids of tracks the host has stopped since the last call.
    #[must_use]
    pub fn take_released(&self) -> Vec<String> {
        self.outbox.drain()
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.lock().len()
    }

    fn take(&self, request_id: Uuid) -> Result<Pending, BrokerError> {
        self.lock().remove(&request_id).ok_or(BrokerError::UnknownRequest(request_id))
    }

    fn forget(&self, request_id: Uuid) {
        self.lock().remove(&request_id);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Pending>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "media_test.rs"]
mod tests;
