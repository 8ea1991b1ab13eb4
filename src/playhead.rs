//! Playhead companion bound one-to-one to a contact sheet.

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::protocol::SheetEvent;

/// Playback context companion for one contact sheet.
///
/// The playhead observes its collection's order and membership through a
/// notification subscription; it never owns the collection.
#[derive(Debug)]
pub struct Playhead {
    uuid: Uuid,
    collection: Uuid,
    events: broadcast::Receiver<SheetEvent>,
}

impl Playhead {
    pub fn new(collection: Uuid, events: broadcast::Receiver<SheetEvent>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            collection,
            events,
        }
    }

    /// Identity of this playhead instance.
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Identity of the collection this playhead plays.
    pub fn collection(&self) -> Uuid {
        self.collection
    }

    /// Next observed collection notification, if any arrived.
    pub fn try_next_event(&mut self) -> Option<SheetEvent> {
        loop {
            match self.events.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }
}

/// Binding state between a contact sheet and its playhead companion.
///
/// The binding starts `Unbound` and transitions to `Bound` exactly once, on
/// first access; the transition is irreversible for the collection's
/// lifetime.
#[derive(Debug, Default)]
pub enum PlayheadBinding {
    #[default]
    Unbound,
    Bound(Playhead),
}

impl PlayheadBinding {
    pub fn is_bound(&self) -> bool {
        matches!(self, PlayheadBinding::Bound(_))
    }

    /// Runs the Unbound -> Bound transition. Returns whether the transition
    /// happened; an already-bound companion is kept untouched.
    pub fn bind_with<F>(&mut self, make: F) -> bool
    where
        F: FnOnce() -> Playhead,
    {
        if self.is_bound() {
            return false;
        }
        *self = PlayheadBinding::Bound(make());
        true
    }

    pub fn bound(&self) -> Option<&Playhead> {
        match self {
            PlayheadBinding::Bound(playhead) => Some(playhead),
            PlayheadBinding::Unbound => None,
        }
    }

    pub fn bound_mut(&mut self) -> Option<&mut Playhead> {
        match self {
            PlayheadBinding::Bound(playhead) => Some(playhead),
            PlayheadBinding::Unbound => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_transition_runs_once() {
        let (events, _) = broadcast::channel(8);
        let collection = Uuid::new_v4();
        let mut binding = PlayheadBinding::default();
        assert!(!binding.is_bound());

        assert!(binding.bind_with(|| Playhead::new(collection, events.subscribe())));
        let first = binding.bound().expect("binding should be bound").uuid();

        assert!(!binding.bind_with(|| Playhead::new(collection, events.subscribe())));
        let second = binding.bound().expect("binding should stay bound").uuid();
        assert_eq!(first, second);
    }

    #[test]
    fn test_playhead_observes_collection_events() {
        let (events, _) = broadcast::channel(8);
        let mut playhead = Playhead::new(Uuid::new_v4(), events.subscribe());

        assert!(playhead.try_next_event().is_none());
        let _ = events.send(SheetEvent::OrderChanged);
        assert_eq!(playhead.try_next_event(), Some(SheetEvent::OrderChanged));
    }
}
