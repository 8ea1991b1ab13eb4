//! Single-flight bookkeeping for backend round trips.
//!
//! Every UI-facing operation that needs the backend is split into a
//! non-blocking request that returns a pending handle, and an eventual
//! resolution delivered when the matching backend response is pumped.
//! Requests are keyed by their semantic target; a second request issued
//! while an identical one is outstanding joins the pending entry instead
//! of reaching the backend twice, and every joined caller observes the
//! same outcome.

use std::collections::HashMap;
use std::path::PathBuf;

use log::debug;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::error::SheetError;
use crate::protocol::{DropPayload, FilterRef, MoveRequest};

/// Semantic key identifying one logical backend operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OpKey {
    /// "Load these paths into this collection."
    Load(Vec<PathBuf>),
    /// "Import this drop payload."
    Import(DropPayload),
    /// "Apply this move batch."
    Reorder(Vec<MoveRequest>),
    /// "Resolve the selection-filter companion."
    SelectionFilter,
}

/// Handle to the eventual result of one backend round trip.
///
/// Resolution is observed either by awaiting [`Pending::resolved`] or by
/// polling [`Pending::try_resolved`] while the owning context pumps backend
/// events. Dropping the handle abandons the caller's interest without
/// affecting the operation or any joined caller.
#[derive(Debug)]
pub struct Pending<T> {
    rx: oneshot::Receiver<Result<T, SheetError>>,
}

/// Pending identities from a load or drop import.
pub type PendingMedia = Pending<Vec<Uuid>>;
/// Pending confirmed order from a reorder.
pub type PendingOrder = Pending<Vec<Uuid>>;
/// Pending selection-filter reference.
pub type PendingFilter = Pending<FilterRef>;

impl<T> Pending<T> {
    /// Awaits the outcome. Fails with [`SheetError::BackendFailure`] when
    /// the collection was dropped before the operation resolved.
    pub async fn resolved(self) -> Result<T, SheetError> {
        match self.rx.await {
            Ok(outcome) => outcome,
            Err(_) => Err(abandoned()),
        }
    }

    /// Non-blocking check: `None` while the operation is still in flight.
    pub fn try_resolved(&mut self) -> Option<Result<T, SheetError>> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(abandoned())),
        }
    }
}

fn abandoned() -> SheetError {
    SheetError::BackendFailure("operation abandoned before a result arrived".to_string())
}

/// Outcome of registering an operation with the single-flight table.
pub(crate) enum Ticket<T> {
    /// No identical operation was in flight; the caller must send the
    /// backend request under the returned correlation id.
    Issued { request: Uuid, pending: Pending<T> },
    /// An identical operation is outstanding; the caller joined it and no
    /// request must be sent.
    Joined(Pending<T>),
}

struct InFlight<T> {
    key: OpKey,
    waiters: Vec<oneshot::Sender<Result<T, SheetError>>>,
}

/// Outstanding-request table for one family of operations.
pub(crate) struct PendingTable<T> {
    by_key: HashMap<OpKey, Uuid>,
    in_flight: HashMap<Uuid, InFlight<T>>,
}

impl<T: Clone> PendingTable<T> {
    pub(crate) fn new() -> Self {
        Self {
            by_key: HashMap::new(),
            in_flight: HashMap::new(),
        }
    }

    /// Registers interest in the operation identified by `key`, joining an
    /// in-flight entry when one exists.
    pub(crate) fn begin(&mut self, key: OpKey) -> Ticket<T> {
        let (tx, rx) = oneshot::channel();
        let pending = Pending { rx };

        if let Some(request) = self.by_key.get(&key) {
            if let Some(entry) = self.in_flight.get_mut(request) {
                entry.waiters.push(tx);
                debug!("ContactSheet: joined in-flight request {request}");
                return Ticket::Joined(pending);
            }
        }

        let request = Uuid::new_v4();
        self.by_key.insert(key.clone(), request);
        self.in_flight.insert(
            request,
            InFlight {
                key,
                waiters: vec![tx],
            },
        );
        Ticket::Issued { request, pending }
    }

    /// Resolves the operation issued under `request`, fanning the outcome
    /// out to every waiter. Waiters that dropped their handle are skipped.
    /// Returns whether a matching operation was outstanding.
    pub(crate) fn resolve(&mut self, request: Uuid, outcome: Result<T, SheetError>) -> bool {
        let Some(entry) = self.in_flight.remove(&request) else {
            return false;
        };
        self.by_key.remove(&entry.key);
        for waiter in entry.waiters {
            let _ = waiter.send(outcome.clone());
        }
        true
    }

    /// Drops the operation issued under `request` without notifying anyone;
    /// used when the backend request could not even be sent.
    pub(crate) fn forget(&mut self, request: Uuid) {
        if let Some(entry) = self.in_flight.remove(&request) {
            self.by_key.remove(&entry.key);
        }
    }

    pub(crate) fn outstanding(&self) -> usize {
        self.in_flight.len()
    }
}
