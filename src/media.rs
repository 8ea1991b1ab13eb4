//! UI-facing media entity wrapper.

use std::path::PathBuf;

use uuid::Uuid;

use crate::protocol::MediaInfo;

/// Lightweight, non-owning handle to a backend-owned media item.
///
/// A handle carries the item's identity plus a cached snapshot of its
/// display fields. Holding one never keeps backend state alive; the handle's
/// own lifetime is managed by the projection cache that created it, and a
/// handle whose identity has left the collection is simply stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaHandle {
    /// Stable media identity.
    pub uuid: Uuid,
    /// Display name used for sorting and UI labels.
    pub name: String,
    /// Source location the backend imported this item from.
    pub source: PathBuf,
}

impl MediaHandle {
    pub fn from_info(info: &MediaInfo) -> Self {
        Self {
            uuid: info.uuid,
            name: info.name.clone(),
            source: info.source.clone(),
        }
    }
}

impl From<MediaInfo> for MediaHandle {
    fn from(info: MediaInfo) -> Self {
        Self::from_info(&info)
    }
}
