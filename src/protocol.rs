//! Message types crossing the contact-sheet boundaries.
//!
//! This module defines the typed requests sent to the backend, the
//! responses and change notifications the backend delivers, and the
//! notification events broadcast to UI observers. The backend owns
//! authoritative membership and content; the contact sheet only consumes
//! this protocol.

use std::collections::BTreeMap;
use std::path::PathBuf;

use uuid::Uuid;

use crate::error::SheetError;

/// Descriptor for one media item as the backend reports it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct MediaInfo {
    /// Stable media identity.
    pub uuid: Uuid,
    /// Display name.
    pub name: String,
    /// Source location the item was imported from.
    pub source: PathBuf,
}

/// One entry of a batch reorder: place `uuid` immediately after `after`,
/// or at the head of the order when `after` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
pub struct MoveRequest {
    pub uuid: Uuid,
    pub after: Option<Uuid>,
}

/// Mime-keyed drag-and-drop payload handed over by the UI shell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct DropPayload {
    entries: BTreeMap<String, Vec<String>>,
}

const URI_LIST_MIME: &str = "text/uri-list";

impl DropPayload {
    /// Builds a payload carrying a plain uri list.
    pub fn from_uris<I, S>(uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries = BTreeMap::new();
        entries.insert(
            URI_LIST_MIME.to_string(),
            uris.into_iter().map(Into::into).collect(),
        );
        Self { entries }
    }

    /// Parses the interchange representation produced by `to_json`.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, SheetError> {
        serde_json::from_value(value.clone())
            .map_err(|err| SheetError::InvalidArgument(format!("malformed drop payload: {err}")))
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("a mime/value map serializes to json")
    }

    /// The uris dropped onto the sheet, empty when the payload carries none.
    pub fn uris(&self) -> &[String] {
        self.entries
            .get(URI_LIST_MIME)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }
}

/// Opaque reference to the backend-side selection filter companion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterRef(pub Uuid);

/// Requests sent to the backend actor owning authoritative state.
///
/// Every round-trip request carries a `request` correlation id; the
/// matching response arrives on the event stream. Responses may interleave
/// across different requests but are delivered in order per request key.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendRequest {
    /// Import the given paths into the collection.
    LoadPaths { request: Uuid, paths: Vec<PathBuf> },
    /// Import the content of a drag-and-drop payload.
    ImportDrop { request: Uuid, payload: DropPayload },
    /// Apply a batch of move requests to the authoritative order.
    Reorder {
        request: Uuid,
        moves: Vec<MoveRequest>,
    },
    /// Resolve the selection-filter companion for this collection.
    QuerySelectionFilter { request: Uuid },
}

impl BackendRequest {
    /// Correlation id of this request.
    pub fn request_id(&self) -> Uuid {
        match self {
            BackendRequest::LoadPaths { request, .. }
            | BackendRequest::ImportDrop { request, .. }
            | BackendRequest::Reorder { request, .. }
            | BackendRequest::QuerySelectionFilter { request } => *request,
        }
    }
}

/// Responses and change notifications delivered by the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    /// Response to `LoadPaths`: the identities added by the import.
    LoadCompleted {
        request: Uuid,
        result: Result<Vec<Uuid>, String>,
    },
    /// Response to `ImportDrop`: the identities added by the drop.
    DropImported {
        request: Uuid,
        result: Result<Vec<Uuid>, String>,
    },
    /// Response to `Reorder`: the confirmed authoritative order.
    OrderConfirmed {
        request: Uuid,
        result: Result<Vec<Uuid>, String>,
    },
    /// Response to `QuerySelectionFilter`.
    SelectionFilter {
        request: Uuid,
        result: Result<FilterRef, String>,
    },
    /// Unsolicited membership notification: items joined the collection.
    MediaAdded(Vec<MediaInfo>),
    /// Unsolicited membership notification: items left the collection.
    MediaRemoved(Vec<Uuid>),
}

/// Notifications broadcast to contact-sheet observers.
///
/// One event is emitted per mutated observable property, in the order the
/// corresponding state transitions were applied.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetEvent {
    NameChanged,
    FlagChanged,
    ExpandedChanged,
    SelectedChanged,
    CompareModeChanged,
    ParentChanged,
    BackendChanged,
    PlayheadChanged,
    /// Membership (the id/handle mapping) changed.
    MembershipChanged,
    /// Positions within the ordered sequence changed.
    OrderChanged,
    /// Distinguished add notification carrying the new identities, so a UI
    /// can auto-scroll to freshly imported items.
    MediaAdded(Vec<Uuid>),
}
