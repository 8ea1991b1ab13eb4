//! The contact sheet: a mutable membership-and-ordering view over media
//! entities, reconciled against a remote backend.
//!
//! One context owns the `ContactSheet` and is the only one to mutate it.
//! Local view state (name, flag, selection, compare mode, sort) changes
//! synchronously; membership and authoritative order only change when a
//! confirmed backend notification is pumped through
//! [`ContactSheet::handle_backend_event`]. Backend round trips are issued
//! through the gateway and resolve when the matching response event
//! arrives; blocking wrappers pump events on the owning context until
//! their pending handle resolves.

use std::collections::BTreeMap;
use std::path::PathBuf;

use log::{debug, info};
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use crate::backend::BackendConnection;
use crate::config::SheetConfig;
use crate::error::SheetError;
use crate::gateway::{
    OpKey, Pending, PendingFilter, PendingMedia, PendingOrder, PendingTable, Ticket,
};
use crate::media::MediaHandle;
use crate::order;
use crate::playhead::{Playhead, PlayheadBinding};
use crate::projection::{MediaProjection, MembershipDelta};
use crate::protocol::{BackendEvent, BackendRequest, DropPayload, FilterRef, MoveRequest, SheetEvent};
use crate::view_state::{CompareMode, ViewState};

/// Non-owning reference to the container (e.g. a playlist) this sheet
/// belongs to. Navigation-only; never an ownership edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef {
    pub uuid: Uuid,
    pub name: String,
}

/// An ordered collection of media items mirrored from a remote backend.
pub struct ContactSheet {
    uuid: Uuid,
    cuuid: Uuid,
    name: String,
    flag: String,
    view: ViewState,
    projection: MediaProjection,
    parent: Option<ParentRef>,
    backend: Option<mpsc::UnboundedSender<BackendRequest>>,
    backend_events: Option<mpsc::UnboundedReceiver<BackendEvent>>,
    playhead: PlayheadBinding,
    media_ops: PendingTable<Vec<Uuid>>,
    order_ops: PendingTable<Vec<Uuid>>,
    filter_ops: PendingTable<FilterRef>,
    events: broadcast::Sender<SheetEvent>,
    config: SheetConfig,
}

impl ContactSheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, Uuid::nil(), SheetConfig::default())
    }

    /// Creates a sheet carrying a compositional identity linking it to
    /// another entity (a template or variant).
    pub fn with_cuuid(name: impl Into<String>, cuuid: Uuid) -> Self {
        Self::with_config(name, cuuid, SheetConfig::default())
    }

    pub fn with_config(name: impl Into<String>, cuuid: Uuid, config: SheetConfig) -> Self {
        let (events, _) = broadcast::channel(config.notifications.event_capacity.max(1));
        Self {
            uuid: Uuid::new_v4(),
            cuuid,
            name: name.into(),
            flag: String::new(),
            view: ViewState::default(),
            projection: MediaProjection::new(),
            parent: None,
            backend: None,
            backend_events: None,
            playhead: PlayheadBinding::default(),
            media_ops: PendingTable::new(),
            order_ops: PendingTable::new(),
            filter_ops: PendingTable::new(),
            events,
            config,
        }
    }

    // ------------------------------------------------------------------
    // Read surface

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn cuuid(&self) -> Uuid {
        self.cuuid
    }

    pub fn kind(&self) -> &'static str {
        "ContactSheet"
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flag(&self) -> &str {
        &self.flag
    }

    pub fn expanded(&self) -> bool {
        self.view.expanded()
    }

    pub fn selected(&self) -> bool {
        self.view.selected()
    }

    pub fn compare_mode(&self) -> CompareMode {
        self.view.compare_mode()
    }

    pub fn parent(&self) -> Option<&ParentRef> {
        self.parent.as_ref()
    }

    /// Display name qualified by the containing playlist, when known.
    pub fn full_name(&self) -> String {
        match &self.parent {
            Some(parent) => format!("{} / {}", parent.name, self.name),
            None => self.name.clone(),
        }
    }

    pub fn has_backend(&self) -> bool {
        self.backend.as_ref().is_some_and(|tx| !tx.is_closed())
    }

    /// The canonical media order.
    pub fn order(&self) -> &[Uuid] {
        self.projection.order()
    }

    /// Handles in canonical order.
    pub fn media(&self) -> Vec<MediaHandle> {
        self.projection.media()
    }

    /// Identity-to-position map over the canonical order.
    pub fn media_order(&self) -> BTreeMap<Uuid, usize> {
        self.projection.media_order()
    }

    pub fn contains_media(&self, uuid: Uuid) -> bool {
        self.projection.contains(uuid)
    }

    pub fn lookup(&self, uuid: Uuid) -> Option<&MediaHandle> {
        self.projection.lookup(uuid)
    }

    /// Successor of `uuid` for "select next" navigation. Past the last item
    /// this is a miss unless the configured navigation policy wraps.
    pub fn next_media_after(&self, uuid: Uuid) -> Option<&MediaHandle> {
        self.projection.next_after(uuid, self.config.navigation.wrap)
    }

    /// Subscribes to this sheet's notifications. Events are delivered in
    /// the order the corresponding transitions were applied.
    pub fn subscribe(&self) -> broadcast::Receiver<SheetEvent> {
        self.events.subscribe()
    }

    // ------------------------------------------------------------------
    // Local mutators (synchronous, never a backend round trip)

    pub fn set_name(&mut self, name: &str) {
        if self.name != name {
            self.name = name.to_string();
            self.emit(SheetEvent::NameChanged);
        }
    }

    pub fn set_flag(&mut self, flag: &str) {
        if self.flag != flag {
            self.flag = flag.to_string();
            self.emit(SheetEvent::FlagChanged);
        }
    }

    pub fn set_expanded(&mut self, value: bool) {
        if self.view.set_expanded(value) {
            self.emit(SheetEvent::ExpandedChanged);
        }
    }

    pub fn set_selected(&mut self, value: bool) {
        if self.view.set_selected(value) {
            self.emit(SheetEvent::SelectedChanged);
        }
    }

    /// Accepts an untyped compare-mode index from the UI boundary; an index
    /// outside the closed mode set is rejected and prior state kept.
    pub fn set_compare_mode(&mut self, index: i32) -> Result<(), SheetError> {
        if self.view.set_compare_mode(index)? {
            self.emit(SheetEvent::CompareModeChanged);
        }
        Ok(())
    }

    pub fn set_parent(&mut self, parent: Option<ParentRef>) {
        if self.parent != parent {
            self.parent = parent;
            self.emit(SheetEvent::ParentChanged);
        }
    }

    /// Reorders the sheet alphabetically by display name, synchronously.
    /// When a backend is attached the applied order is forwarded so the
    /// authoritative side converges; its confirmation re-applies the same
    /// order and is a no-op.
    pub fn sort_alphabetically(&mut self) {
        if self.projection.sort_alphabetically() {
            debug!("ContactSheet: sorted '{}' alphabetically", self.name);
            self.emit(SheetEvent::OrderChanged);
        }
        if self.projection.is_empty() {
            return;
        }
        let moves = order::moves_for_sequence(self.projection.order());
        if let Ok(backend) = self.backend() {
            let _ = backend.send(BackendRequest::Reorder {
                request: Uuid::new_v4(),
                moves,
            });
        }
    }

    // ------------------------------------------------------------------
    // Backend attachment and event intake

    /// Attaches the backend this sheet mirrors. May happen any time after
    /// construction; until then the sheet is in its degraded no-backend
    /// state and gateway operations fail fast.
    pub fn attach_backend(&mut self, connection: BackendConnection) {
        let BackendConnection { requests, events } = connection;
        self.backend = Some(requests);
        self.backend_events = Some(events);
        info!("ContactSheet: backend attached to '{}'", self.name);
        self.emit(SheetEvent::BackendChanged);
    }

    /// Applies one backend event: membership notifications update the
    /// projection atomically, responses resolve their pending operation.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::MediaAdded(infos) => {
                let delta = self.projection.apply_membership_change(infos, &[]);
                self.notify_membership(delta);
            }
            BackendEvent::MediaRemoved(uuids) => {
                let delta = self.projection.apply_membership_change(Vec::new(), &uuids);
                self.notify_membership(delta);
            }
            BackendEvent::LoadCompleted { request, result }
            | BackendEvent::DropImported { request, result } => {
                let outcome = result.map_err(SheetError::BackendFailure);
                if !self.media_ops.resolve(request, outcome) {
                    debug!("ContactSheet: response for unknown media request {request}");
                }
            }
            BackendEvent::OrderConfirmed { request, result } => match result {
                Ok(confirmed) => {
                    if self.projection.set_order(&confirmed) {
                        self.emit(SheetEvent::OrderChanged);
                    }
                    let applied = self.projection.order().to_vec();
                    if !self.order_ops.resolve(request, Ok(applied)) {
                        debug!("ContactSheet: unsolicited order confirmation applied");
                    }
                }
                Err(message) => {
                    let failure = Err(SheetError::BackendFailure(message));
                    if !self.order_ops.resolve(request, failure) {
                        debug!("ContactSheet: failure for unknown reorder request {request}");
                    }
                }
            },
            BackendEvent::SelectionFilter { request, result } => {
                let outcome = result.map_err(SheetError::BackendFailure);
                if !self.filter_ops.resolve(request, outcome) {
                    debug!("ContactSheet: response for unknown filter request {request}");
                }
            }
        }
    }

    /// Drains and applies every backend event currently queued. Returns how
    /// many were handled.
    pub fn pump_backend_events(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let event = match self.backend_events.as_mut() {
                Some(events) => match events.try_recv() {
                    Ok(event) => event,
                    Err(_) => break,
                },
                None => break,
            };
            self.handle_backend_event(event);
            handled += 1;
        }
        handled
    }

    // ------------------------------------------------------------------
    // Gateway operations (backend round trips)

    /// Requests an import of `path`. Resolves with the identities the
    /// backend added; membership itself updates when the backend's add
    /// notification is pumped.
    pub fn load_media(&mut self, path: impl Into<PathBuf>) -> Result<PendingMedia, SheetError> {
        self.load_paths(vec![path.into()])
    }

    /// Requests an import of several paths as one operation.
    pub fn load_paths(&mut self, paths: Vec<PathBuf>) -> Result<PendingMedia, SheetError> {
        self.backend()?;
        match self.media_ops.begin(OpKey::Load(paths.clone())) {
            Ticket::Joined(pending) => Ok(pending),
            Ticket::Issued { request, pending } => {
                debug!(
                    "ContactSheet: requesting load of {} path(s) into '{}'",
                    paths.len(),
                    self.name
                );
                self.send_or_forget_media(BackendRequest::LoadPaths { request, paths }, request)?;
                Ok(pending)
            }
        }
    }

    /// Blocking variant of [`ContactSheet::load_media`]; pumps backend
    /// events on the calling context until the result arrives.
    pub fn load_media_blocking(
        &mut self,
        path: impl Into<PathBuf>,
    ) -> Result<Vec<Uuid>, SheetError> {
        let pending = self.load_media(path)?;
        self.wait_for(pending)
    }

    /// Requests an import of a drag-and-drop payload.
    pub fn import_drop(&mut self, payload: DropPayload) -> Result<PendingMedia, SheetError> {
        self.backend()?;
        match self.media_ops.begin(OpKey::Import(payload.clone())) {
            Ticket::Joined(pending) => Ok(pending),
            Ticket::Issued { request, pending } => {
                debug!("ContactSheet: importing drop payload into '{}'", self.name);
                self.send_or_forget_media(
                    BackendRequest::ImportDrop { request, payload },
                    request,
                )?;
                Ok(pending)
            }
        }
    }

    /// Blocking variant of [`ContactSheet::import_drop`].
    pub fn import_drop_blocking(&mut self, payload: DropPayload) -> Result<Vec<Uuid>, SheetError> {
        let pending = self.import_drop(payload)?;
        self.wait_for(pending)
    }

    /// Requests a batch reorder. Resolves with the confirmed order once the
    /// backend acknowledges; the local order changes only on confirmation.
    pub fn reorder(&mut self, moves: Vec<MoveRequest>) -> Result<PendingOrder, SheetError> {
        self.backend()?;
        match self.order_ops.begin(OpKey::Reorder(moves.clone())) {
            Ticket::Joined(pending) => Ok(pending),
            Ticket::Issued { request, pending } => {
                debug!(
                    "ContactSheet: requesting reorder of {} item(s) in '{}'",
                    moves.len(),
                    self.name
                );
                let message = BackendRequest::Reorder { request, moves };
                if self.backend()?.send(message).is_err() {
                    self.order_ops.forget(request);
                    return Err(SheetError::NoBackend);
                }
                Ok(pending)
            }
        }
    }

    /// Blocking variant of [`ContactSheet::reorder`].
    pub fn reorder_blocking(&mut self, moves: Vec<MoveRequest>) -> Result<Vec<Uuid>, SheetError> {
        let pending = self.reorder(moves)?;
        self.wait_for(pending)
    }

    /// Resolves the backend-side selection-filter companion.
    pub fn selection_filter(&mut self) -> Result<PendingFilter, SheetError> {
        self.backend()?;
        match self.filter_ops.begin(OpKey::SelectionFilter) {
            Ticket::Joined(pending) => Ok(pending),
            Ticket::Issued { request, pending } => {
                let message = BackendRequest::QuerySelectionFilter { request };
                if self.backend()?.send(message).is_err() {
                    self.filter_ops.forget(request);
                    return Err(SheetError::NoBackend);
                }
                Ok(pending)
            }
        }
    }

    /// Blocking variant of [`ContactSheet::selection_filter`].
    pub fn selection_filter_blocking(&mut self) -> Result<FilterRef, SheetError> {
        let pending = self.selection_filter()?;
        self.wait_for(pending)
    }

    // ------------------------------------------------------------------
    // Playhead companion

    /// The playback companion for this sheet, created lazily on first
    /// access and bound for the rest of the sheet's lifetime.
    pub fn playhead(&mut self) -> &Playhead {
        let collection = self.uuid;
        let events = &self.events;
        let newly_bound = self
            .playhead
            .bind_with(|| Playhead::new(collection, events.subscribe()));
        if newly_bound {
            debug!("ContactSheet: playhead bound for '{}'", self.name);
            self.emit(SheetEvent::PlayheadChanged);
        }
        self.playhead
            .bound()
            .expect("playhead binding is established on first access")
    }

    pub fn playhead_mut(&mut self) -> Option<&mut Playhead> {
        self.playhead.bound_mut()
    }

    // ------------------------------------------------------------------

    fn backend(&self) -> Result<&mpsc::UnboundedSender<BackendRequest>, SheetError> {
        match self.backend.as_ref() {
            Some(tx) if !tx.is_closed() => Ok(tx),
            _ => Err(SheetError::NoBackend),
        }
    }

    fn send_or_forget_media(
        &mut self,
        message: BackendRequest,
        request: Uuid,
    ) -> Result<(), SheetError> {
        if self.backend()?.send(message).is_err() {
            self.media_ops.forget(request);
            return Err(SheetError::NoBackend);
        }
        Ok(())
    }

    /// Pumps backend events until `pending` resolves. Resolution never
    /// requires this particular wait: any pump of the owning context
    /// delivers it just as well.
    fn wait_for<T>(&mut self, mut pending: Pending<T>) -> Result<T, SheetError> {
        loop {
            if let Some(outcome) = pending.try_resolved() {
                return outcome;
            }
            let event = match self.backend_events.as_mut() {
                Some(events) => events.blocking_recv(),
                None => return Err(SheetError::NoBackend),
            };
            match event {
                Some(event) => self.handle_backend_event(event),
                None => {
                    return Err(SheetError::BackendFailure(
                        "backend closed the event channel".to_string(),
                    ))
                }
            }
        }
    }

    fn notify_membership(&mut self, delta: MembershipDelta) {
        if !delta.membership_changed() {
            return;
        }
        self.emit(SheetEvent::MembershipChanged);
        if delta.order_changed {
            self.emit(SheetEvent::OrderChanged);
        }
        if !delta.added.is_empty() {
            info!(
                "ContactSheet: {} media item(s) added to '{}'",
                delta.added.len(),
                self.name
            );
            self.emit(SheetEvent::MediaAdded(delta.added));
        }
    }

    fn emit(&self, event: SheetEvent) {
        let _ = self.events.send(event);
    }
}
