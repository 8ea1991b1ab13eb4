//! Channel plumbing for the consumed backend boundary.
//!
//! The backend is a remote, message-passing process treated as a black box.
//! A [`BackendConnection`] is the sheet-side half: a request sender plus an
//! event receiver. The matching [`BackendEndpoint`] is handed to whatever
//! drives the backend (in tests, a scripted thread).

use tokio::sync::mpsc;

use crate::protocol::{BackendEvent, BackendRequest};

/// Sheet-side half of a backend attachment.
#[derive(Debug)]
pub struct BackendConnection {
    /// Requests flowing to the backend.
    pub requests: mpsc::UnboundedSender<BackendRequest>,
    /// Responses and change notifications flowing back.
    pub events: mpsc::UnboundedReceiver<BackendEvent>,
}

/// Backend-side half of an attachment.
#[derive(Debug)]
pub struct BackendEndpoint {
    /// Requests arriving from the sheet.
    pub requests: mpsc::UnboundedReceiver<BackendRequest>,
    /// Channel for responses and change notifications.
    pub events: mpsc::UnboundedSender<BackendEvent>,
}

/// Creates a connected backend channel pair.
pub fn backend_channel() -> (BackendConnection, BackendEndpoint) {
    let (request_tx, request_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    (
        BackendConnection {
            requests: request_tx,
            events: event_rx,
        },
        BackendEndpoint {
            requests: request_rx,
            events: event_tx,
        },
    )
}
