//! Change-sets returned by store mutations and the events built from them

use crate::placement::Placement;
use std::fmt;

/// What a single store command changed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    pub added: Vec<Placement>,
    pub removed: Vec<Placement>,
    pub floors_inserted: Vec<i32>,
    pub floors_removed: Vec<i32>,
    /// `(from, to)` for every floor whose position changed
    pub floor_moves: Vec<(i32, i32)>,
}

impl ChangeSet {
    pub fn added(placements: impl IntoIterator<Item = Placement>) -> Self {
        Self {
            added: placements.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn removed(placements: impl IntoIterator<Item = Placement>) -> Self {
        Self {
            removed: placements.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.floors_inserted.is_empty()
            && self.floors_removed.is_empty()
            && self.floor_moves.is_empty()
    }

    pub fn touches_floors(&self) -> bool {
        !self.floors_inserted.is_empty()
            || !self.floors_removed.is_empty()
            || !self.floor_moves.is_empty()
    }

    /// Append another change-set
    pub fn merge(&mut self, other: ChangeSet) {
        self.added.extend(other.added);
        self.removed.extend(other.removed);
        self.floors_inserted.extend(other.floors_inserted);
        self.floors_removed.extend(other.floors_removed);
        self.floor_moves.extend(other.floor_moves);
    }
}

/// Notification sent to store subscribers after each mutating command
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    PlacementsChanged { version: u64, changes: ChangeSet },
    FloorsChanged { version: u64, changes: ChangeSet },
}

impl StoreEvent {
    pub fn version(&self) -> u64 {
        match self {
            StoreEvent::PlacementsChanged { version, .. } => *version,
            StoreEvent::FloorsChanged { version, .. } => *version,
        }
    }

    pub fn changes(&self) -> &ChangeSet {
        match self {
            StoreEvent::PlacementsChanged { changes, .. } => changes,
            StoreEvent::FloorsChanged { changes, .. } => changes,
        }
    }
}

pub type StoreListener = Box<dyn FnMut(&StoreEvent) + Send + Sync>;

/// Subscribers of a store. Not persisted and not carried over by `clone`.
#[derive(Default)]
pub struct StoreListeners(Vec<StoreListener>);

impl StoreListeners {
    pub fn push(&mut self, listener: StoreListener) {
        self.0.push(listener);
    }

    pub fn emit(&mut self, event: &StoreEvent) {
        for listener in &mut self.0 {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Clone for StoreListeners {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl fmt::Debug for StoreListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StoreListeners({})", self.0.len())
    }
}
