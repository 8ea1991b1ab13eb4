//! Ordering operations over a media identity sequence.
//!
//! The ordered sequence is the canonical order of a contact sheet;
//! insertion order carries no meaning. Batch moves follow drag-drop
//! semantics: requests apply sequentially in request order, so when several
//! items target the same predecessor the last request ends up closest to
//! it.

use uuid::Uuid;

use crate::protocol::MoveRequest;

/// Result of applying a batch of move requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Whether the sequence differs from the one the batch started from.
    pub changed: bool,
    /// Ids of requests skipped because the moved item or its requested
    /// predecessor is not part of the sequence.
    pub rejected: Vec<Uuid>,
}

/// Applies `(uuid, after)` move requests to `order`, one at a time, in
/// request order.
///
/// `after: None` moves the item to the head. A request naming an unknown
/// moved id or an unknown predecessor (including the item itself) is
/// skipped and reported through [`MoveOutcome::rejected`]; the rest of the
/// batch still applies.
pub fn apply_moves(order: &mut Vec<Uuid>, moves: &[MoveRequest]) -> MoveOutcome {
    let before = order.clone();
    let mut rejected = Vec::new();

    for entry in moves {
        let Some(current) = order.iter().position(|id| *id == entry.uuid) else {
            rejected.push(entry.uuid);
            continue;
        };
        match entry.after {
            None => {
                let id = order.remove(current);
                order.insert(0, id);
            }
            Some(after) => {
                if after == entry.uuid {
                    rejected.push(entry.uuid);
                    continue;
                }
                let Some(anchor) = order.iter().position(|id| *id == after) else {
                    rejected.push(entry.uuid);
                    continue;
                };
                let id = order.remove(current);
                // The anchor shifts down by one when the moved item sat
                // before it.
                let insert_at = if current <= anchor { anchor } else { anchor + 1 };
                order.insert(insert_at, id);
            }
        }
    }

    MoveOutcome {
        changed: *order != before,
        rejected,
    }
}

/// Reorders `order` alphabetically by display name, case-insensitive, with
/// the identity as tie-break so equal names sort deterministically.
///
/// Returns whether the sequence changed. Sorting twice is a no-op.
pub fn sort_alphabetically<F>(order: &mut Vec<Uuid>, display_name: F) -> bool
where
    F: Fn(&Uuid) -> String,
{
    let mut keyed: Vec<(String, Uuid)> = order
        .iter()
        .map(|id| (display_name(id).to_lowercase(), *id))
        .collect();
    keyed.sort();
    let changed = !keyed.iter().map(|(_, id)| *id).eq(order.iter().copied());
    *order = keyed.into_iter().map(|(_, id)| id).collect();
    changed
}

/// Successor of `uuid` in `order`.
///
/// Past the last item the result is `None`, unless `wrap` is set, in which
/// case navigation restarts at the head. The result is always an identity
/// present in the sequence; an unknown `uuid` yields `None`.
pub fn next_after(order: &[Uuid], uuid: Uuid, wrap: bool) -> Option<Uuid> {
    let position = order.iter().position(|id| *id == uuid)?;
    match order.get(position + 1) {
        Some(next) => Some(*next),
        None if wrap => order.first().copied(),
        None => None,
    }
}

/// Expresses a full sequence as a chain of move requests, suitable for
/// forwarding a locally-computed order to the authoritative backend.
pub fn moves_for_sequence(order: &[Uuid]) -> Vec<MoveRequest> {
    order
        .iter()
        .enumerate()
        .map(|(index, id)| MoveRequest {
            uuid: *id,
            after: if index == 0 {
                None
            } else {
                Some(order[index - 1])
            },
        })
        .collect()
}
