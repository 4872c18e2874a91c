// ── Optimistic operation bookkeeping ──
//
// Every local-first mutation runs under a client-generated id. The
// collection keeps the last confirmed value of each touched entry plus the
// ordered list of changes on top of it. Committing or rolling back one
// operation replays the remaining changes over that base, so an
// unrelated edit is never undone or lost.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::model::EntityId;

/// Client-generated identifier for one optimistic mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationId(Uuid);

impl OperationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OperationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op-{}", self.0.simple())
    }
}

/// A field-level local change, replayable over any base value.
pub(crate) type Edit<T> = Arc<dyn Fn(&mut T) + Send + Sync>;

/// What one operation does to one entry.
pub(crate) enum Change<T> {
    Edit(Edit<T>),
    Remove,
}

impl<T: Clone> Change<T> {
    pub fn apply(&self, value: Option<Arc<T>>) -> Option<Arc<T>> {
        match self {
            Self::Edit(edit) => value.map(|current| {
                let mut next = (*current).clone();
                edit(&mut next);
                Arc::new(next)
            }),
            Self::Remove => None,
        }
    }
}

/// One entry touched by an operation, in application order.
pub(crate) struct PendingEdit<T> {
    pub op: OperationId,
    pub id: EntityId,
    pub change: Change<T>,
    /// Confirmed by the backend but still replayed because an earlier
    /// edit on the same entry is unresolved.
    pub committed: bool,
}
