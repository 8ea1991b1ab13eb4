//! Local projection of backend-owned collection membership.
//!
//! The projection pairs the canonical ordered sequence with an
//! identity-to-handle map. The two stay strictly bijective: every id in the
//! sequence has exactly one handle and vice versa, with no duplicates and
//! no dangling entries. Membership only ever changes here in response to
//! confirmed backend notifications.

use std::collections::{BTreeMap, HashMap, HashSet};

use uuid::Uuid;

use crate::media::MediaHandle;
use crate::order;
use crate::protocol::MediaInfo;

/// Summary of one applied membership batch, used to emit exactly one
/// membership notification and at most one order notification per batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipDelta {
    /// Identities that joined the collection.
    pub added: Vec<Uuid>,
    /// Identities that left the collection.
    pub removed: Vec<Uuid>,
    /// Whether any surviving member's position shifted. Appending at the
    /// tail leaves existing positions alone and does not count.
    pub order_changed: bool,
}

impl MembershipDelta {
    pub fn membership_changed(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }
}

/// Ordered identity sequence plus handle cache for one contact sheet.
#[derive(Debug, Default)]
pub struct MediaProjection {
    order: Vec<Uuid>,
    handles: HashMap<Uuid, MediaHandle>,
}

impl MediaProjection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, uuid: Uuid) -> bool {
        self.handles.contains_key(&uuid)
    }

    pub fn lookup(&self, uuid: Uuid) -> Option<&MediaHandle> {
        self.handles.get(&uuid)
    }

    pub fn position(&self, uuid: Uuid) -> Option<usize> {
        self.order.iter().position(|id| *id == uuid)
    }

    /// The canonical order.
    pub fn order(&self) -> &[Uuid] {
        &self.order
    }

    /// Handles in canonical order.
    pub fn media(&self) -> Vec<MediaHandle> {
        self.order
            .iter()
            .filter_map(|id| self.handles.get(id).cloned())
            .collect()
    }

    /// Identity-to-position map over the canonical order.
    pub fn media_order(&self) -> BTreeMap<Uuid, usize> {
        self.order
            .iter()
            .enumerate()
            .map(|(index, id)| (*id, index))
            .collect()
    }

    /// Successor of `uuid`, honoring the wrap policy.
    pub fn next_after(&self, uuid: Uuid, wrap: bool) -> Option<&MediaHandle> {
        let next = order::next_after(&self.order, uuid, wrap)?;
        self.handles.get(&next)
    }

    /// Applies one membership batch: removed ids are pruned from both
    /// structures, added items are appended at the tail with lazily
    /// constructed handles. Already-present additions and unknown removals
    /// are ignored, keeping the pair bijective.
    pub fn apply_membership_change(
        &mut self,
        added: Vec<MediaInfo>,
        removed: &[Uuid],
    ) -> MembershipDelta {
        let mut delta = MembershipDelta::default();

        let positions_before = self.media_order();
        for uuid in removed {
            if self.handles.remove(uuid).is_some() {
                self.order.retain(|id| id != uuid);
                delta.removed.push(*uuid);
            }
        }

        for info in added {
            if self.handles.contains_key(&info.uuid) {
                continue;
            }
            self.order.push(info.uuid);
            delta.added.push(info.uuid);
            self.handles.insert(info.uuid, MediaHandle::from(info));
        }

        delta.order_changed = self
            .order
            .iter()
            .enumerate()
            .any(|(index, id)| matches!(positions_before.get(id), Some(old) if *old != index));
        delta
    }

    /// Applies a backend-confirmed order as an authoritative permutation of
    /// the current membership. Unknown ids in the confirmed sequence are
    /// dropped; members it omits keep their relative order at the tail.
    pub fn set_order(&mut self, confirmed: &[Uuid]) -> bool {
        let mut seen = HashSet::new();
        let mut next: Vec<Uuid> = confirmed
            .iter()
            .filter(|id| self.handles.contains_key(id) && seen.insert(**id))
            .copied()
            .collect();
        for id in &self.order {
            if seen.insert(*id) {
                next.push(*id);
            }
        }
        let changed = next != self.order;
        self.order = next;
        changed
    }

    /// Reorders alphabetically by handle display name (case-insensitive,
    /// identity tie-break). Returns whether the order changed.
    pub fn sort_alphabetically(&mut self) -> bool {
        let Self { order, handles } = self;
        order::sort_alphabetically(order, |id| {
            handles.get(id).map(|h| h.name.clone()).unwrap_or_default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn info(name: &str) -> MediaInfo {
        MediaInfo {
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            source: PathBuf::from(format!("/shots/{name}")),
        }
    }

    fn assert_bijective(projection: &MediaProjection) {
        let mut seen = HashSet::new();
        for id in projection.order() {
            assert!(seen.insert(*id), "duplicate id in order");
            assert!(
                projection.lookup(*id).is_some(),
                "order id missing from handle map"
            );
        }
        assert_eq!(projection.order().len(), projection.len());
        assert_eq!(seen.len(), projection.media().len());
    }

    #[test]
    fn test_membership_stays_bijective_across_add_remove_sequences() {
        let mut projection = MediaProjection::new();
        let first = info("a.mov");
        let second = info("b.mov");
        let third = info("c.mov");

        let delta =
            projection.apply_membership_change(vec![first.clone(), second.clone()], &[]);
        assert_eq!(delta.added.len(), 2);
        assert!(delta.membership_changed());
        assert_bijective(&projection);

        let delta = projection.apply_membership_change(vec![third.clone()], &[first.uuid]);
        assert_eq!(delta.added, vec![third.uuid]);
        assert_eq!(delta.removed, vec![first.uuid]);
        assert_bijective(&projection);

        let delta = projection.apply_membership_change(vec![], &[second.uuid, third.uuid]);
        assert_eq!(delta.removed.len(), 2);
        assert!(projection.is_empty());
        assert_bijective(&projection);
    }

    #[test]
    fn test_duplicate_add_and_unknown_remove_are_ignored() {
        let mut projection = MediaProjection::new();
        let item = info("a.mov");
        projection.apply_membership_change(vec![item.clone()], &[]);

        let delta = projection.apply_membership_change(vec![item.clone()], &[Uuid::new_v4()]);
        assert!(!delta.membership_changed());
        assert!(!delta.order_changed);
        assert_eq!(projection.len(), 1);
        assert_bijective(&projection);
    }

    #[test]
    fn test_tail_append_does_not_count_as_order_change() {
        let mut projection = MediaProjection::new();
        projection.apply_membership_change(vec![info("a.mov")], &[]);
        let delta = projection.apply_membership_change(vec![info("b.mov")], &[]);
        assert!(delta.membership_changed());
        assert!(!delta.order_changed);
    }

    #[test]
    fn test_middle_removal_shifts_positions_and_counts_as_order_change() {
        let mut projection = MediaProjection::new();
        let first = info("a.mov");
        let second = info("b.mov");
        let third = info("c.mov");
        projection.apply_membership_change(
            vec![first.clone(), second.clone(), third.clone()],
            &[],
        );

        let delta = projection.apply_membership_change(vec![], &[second.uuid]);
        assert!(delta.order_changed);
        assert_eq!(projection.position(third.uuid), Some(1));

        // Removing the new tail shifts nothing.
        let delta = projection.apply_membership_change(vec![], &[third.uuid]);
        assert!(!delta.order_changed);
    }

    #[test]
    fn test_set_order_preserves_bijection_against_bogus_confirmations() {
        let mut projection = MediaProjection::new();
        let first = info("a.mov");
        let second = info("b.mov");
        let third = info("c.mov");
        projection.apply_membership_change(
            vec![first.clone(), second.clone(), third.clone()],
            &[],
        );

        // Confirmed order names a stranger, repeats an id, and omits a member.
        let confirmed = vec![third.uuid, Uuid::new_v4(), first.uuid, third.uuid];
        assert!(projection.set_order(&confirmed));
        assert_eq!(
            projection.order(),
            &[third.uuid, first.uuid, second.uuid]
        );
        assert_bijective(&projection);

        assert!(!projection.set_order(&[third.uuid, first.uuid, second.uuid]));
    }

    #[test]
    fn test_lookup_and_next_after() {
        let mut projection = MediaProjection::new();
        let first = info("a.mov");
        let second = info("b.mov");
        projection.apply_membership_change(vec![first.clone(), second.clone()], &[]);

        assert_eq!(projection.lookup(first.uuid).map(|h| h.uuid), Some(first.uuid));
        assert!(projection.lookup(Uuid::new_v4()).is_none());
        assert_eq!(
            projection.next_after(first.uuid, false).map(|h| h.uuid),
            Some(second.uuid)
        );
        assert!(projection.next_after(second.uuid, false).is_none());
        assert_eq!(
            projection.next_after(second.uuid, true).map(|h| h.uuid),
            Some(first.uuid)
        );
    }

    #[test]
    fn test_sort_alphabetically_uses_display_names() {
        let mut projection = MediaProjection::new();
        let zebra = info("zebra.mov");
        let apple = info("Apple.mov");
        projection.apply_membership_change(vec![zebra.clone(), apple.clone()], &[]);

        assert!(projection.sort_alphabetically());
        assert_eq!(projection.order(), &[apple.uuid, zebra.uuid]);
        assert!(!projection.sort_alphabetically());
    }
}
