//! Synchronization bridge between a UI-owned contact sheet and the remote
//! backend that owns its media.
//!
//! A [`ContactSheet`] is a mutable membership-and-ordering view over media
//! entities. Authoritative state lives in a message-passing backend;
//! the sheet keeps a local projection consistent by consuming the backend's
//! typed protocol, turns fire-and-forget messages into awaitable
//! operations, and broadcasts one notification per observable change.

pub mod backend;
pub mod config;
pub mod error;
pub mod gateway;
pub mod media;
pub mod order;
pub mod playhead;
pub mod projection;
pub mod protocol;
pub mod sheet;
pub mod view_state;

pub use backend::{backend_channel, BackendConnection, BackendEndpoint};
pub use config::SheetConfig;
pub use error::SheetError;
pub use gateway::{PendingFilter, PendingMedia, PendingOrder};
pub use media::MediaHandle;
pub use playhead::Playhead;
pub use protocol::{
    BackendEvent, BackendRequest, DropPayload, FilterRef, MediaInfo, MoveRequest, SheetEvent,
};
pub use sheet::{ContactSheet, ParentRef};
pub use view_state::CompareMode;
