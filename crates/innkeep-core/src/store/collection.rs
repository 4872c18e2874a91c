// ── Generic reactive entity collection ──
//
// Lock-free concurrent storage with O(1) lookups, push-based change
// notification via `watch` channels, and per-operation optimistic edits.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashmap::DashMap;
use tokio::sync::watch;
use tracing::debug;

use super::optimistic::{Change, Edit, OperationId, PendingEdit};
use crate::model::{Entity, EntityId};

struct Slot<T> {
    /// Arrival position; snapshots list entries in server order.
    seq: u64,
    value: Arc<T>,
}

/// Confirmed values and the unresolved changes layered over them.
struct Journal<T> {
    /// Last server-confirmed value and list position of every entry with
    /// outstanding edits. `None` when the entry does not exist server-side.
    base: HashMap<EntityId, Option<(u64, Arc<T>)>>,
    edits: Vec<PendingEdit<T>>,
}

impl<T> Default for Journal<T> {
    fn default() -> Self {
        Self {
            base: HashMap::new(),
            edits: Vec::new(),
        }
    }
}

/// A lock-free, reactive collection for a single entity type.
///
/// Uses `DashMap` for O(1) concurrent lookups and `watch` channels for
/// push-based change notification. Every mutation bumps a version counter
/// and rebuilds the snapshot that subscribers receive.
///
/// Optimistic edits go through a small journal: the visible value of a
/// touched entry is always its confirmed base with every unresolved
/// change replayed in order.
pub struct EntityCollection<T: Entity> {
    by_id: DashMap<EntityId, Slot<T>>,
    next_seq: AtomicU64,

    journal: Mutex<Journal<T>>,

    /// Set by invalidating events until the next scope refresh lands.
    stale: AtomicBool,

    version: watch::Sender<u64>,
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Entity> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            by_id: DashMap::new(),
            next_seq: AtomicU64::new(0),
            journal: Mutex::new(Journal::default()),
            stale: AtomicBool::new(false),
            version,
            snapshot,
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn get(&self, id: &EntityId) -> Option<Arc<T>> {
        self.by_id.get(id).map(|r| Arc::clone(&r.value))
    }

    /// Current snapshot in server order (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Snapshot entries belonging to one property, or all of them.
    pub fn scoped(&self, scope: Option<&EntityId>) -> Vec<Arc<T>> {
        self.snapshot()
            .iter()
            .filter(|e| scope.is_none() || e.scope() == scope)
            .cloned()
            .collect()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn is_stale(&self) -> bool {
        self.stale.load(Ordering::SeqCst)
    }

    /// Operations applied locally and not yet confirmed or rolled back.
    pub fn pending_operations(&self) -> usize {
        self.journal()
            .edits
            .iter()
            .filter(|e| !e.committed)
            .map(|e| e.op)
            .collect::<HashSet<_>>()
            .len()
    }

    // ── Server-driven writes ─────────────────────────────────────────
    //
    // An entry with outstanding edits takes server data as its new base;
    // the local changes stay on top until they resolve.

    /// Insert or update an entity. Returns `true` if the id was new.
    pub(crate) fn upsert(&self, entity: T) -> bool {
        let id = entity.entity_id().clone();
        let is_new = !self.by_id.contains_key(&id);
        {
            let mut journal = self.journal();
            self.confirm(&mut journal, &id, Some(Arc::new(entity)));
        }
        self.publish();
        is_new
    }

    /// Remove an entity by id. Returns the removed entity if it existed.
    pub(crate) fn remove(&self, id: &EntityId) -> Option<Arc<T>> {
        let removed = self.get(id);
        {
            let mut journal = self.journal();
            self.confirm(&mut journal, id, None);
        }
        if removed.is_some() {
            self.publish();
        }
        removed
    }

    /// Edit one entry in place, outside any operation. Returns `false`
    /// when the id is unknown.
    pub(crate) fn patch(&self, id: &EntityId, edit: impl FnOnce(&mut T)) -> bool {
        let mut journal = self.journal();
        let current = match journal.base.get(id) {
            Some(base) => base.as_ref().map(|(_, v)| Arc::clone(v)),
            None => self.get(id),
        };
        let Some(current) = current else {
            return false;
        };
        let mut next = (*current).clone();
        edit(&mut next);
        self.confirm(&mut journal, id, Some(Arc::new(next)));
        drop(journal);
        self.publish();
        true
    }

    /// Replace every entry in `scope` (all entries when `None`) with a
    /// fresh server listing, then replay outstanding local changes so an
    /// in-flight optimistic edit is not overwritten by stale data.
    pub(crate) fn replace_scope(&self, scope: Option<&EntityId>, items: Vec<T>) {
        let mut refreshed: HashSet<EntityId> = self
            .by_id
            .iter()
            .filter(|r| scope.is_none() || r.value.scope() == scope)
            .map(|r| r.key().clone())
            .collect();
        for id in &refreshed {
            self.by_id.remove(id);
        }

        for item in items {
            let id = item.entity_id().clone();
            let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
            self.by_id.insert(
                id.clone(),
                Slot {
                    seq,
                    value: Arc::new(item),
                },
            );
            refreshed.insert(id);
        }

        {
            let mut journal = self.journal();
            let tracked: Vec<EntityId> = journal
                .base
                .keys()
                .filter(|id| refreshed.contains(*id))
                .cloned()
                .collect();
            if !tracked.is_empty() {
                debug!(kind = T::KIND, count = tracked.len(), "re-applying pending edits");
            }
            for id in tracked {
                let fresh = self.by_id.get(&id).map(|r| (r.seq, Arc::clone(&r.value)));
                journal.base.insert(id.clone(), fresh);
                self.materialize(&mut journal, &id);
            }
        }

        self.stale.store(false, Ordering::SeqCst);
        self.publish();
    }

    pub(crate) fn mark_stale(&self) {
        self.stale.store(true, Ordering::SeqCst);
    }

    // ── Optimistic writes ────────────────────────────────────────────

    /// Apply `edit` to one entry under `op`. Returns the new value, or
    /// `None` when the id is unknown (nothing is recorded then).
    pub(crate) fn apply_optimistic(
        &self,
        op: OperationId,
        id: &EntityId,
        edit: impl Fn(&mut T) + Send + Sync + 'static,
    ) -> Option<Arc<T>> {
        self.get(id)?;
        self.stage(op, id, Change::Edit(Arc::new(edit)));
        self.publish();
        self.get(id)
    }

    /// Apply one edit per entry under a single `op` (reorders).
    pub(crate) fn apply_optimistic_all(&self, op: OperationId, edits: Vec<(EntityId, Edit<T>)>) {
        for (id, edit) in edits {
            if self.by_id.contains_key(&id) {
                self.stage(op, &id, Change::Edit(edit));
            }
        }
        self.publish();
    }

    /// Remove one entry under `op`. Returns the removed value.
    pub(crate) fn remove_optimistic(&self, op: OperationId, id: &EntityId) -> Option<Arc<T>> {
        let current = self.get(id)?;
        self.stage(op, id, Change::Remove);
        self.publish();
        Some(current)
    }

    /// Confirm `op`. A server echo, when present, becomes the confirmed
    /// value of its entry in place of the local change.
    pub(crate) fn commit(&self, op: OperationId, echo: Option<T>) {
        {
            let mut journal = self.journal();
            let mut touched = Vec::new();
            for edit in journal.edits.iter_mut().filter(|e| e.op == op) {
                edit.committed = true;
                if !touched.contains(&edit.id) {
                    touched.push(edit.id.clone());
                }
            }
            if let Some(entity) = echo {
                let id = entity.entity_id().clone();
                journal.edits.retain(|e| !(e.op == op && e.id == id));
                self.confirm(&mut journal, &id, Some(Arc::new(entity)));
            }
            for id in &touched {
                self.materialize(&mut journal, id);
            }
        }
        self.publish();
    }

    /// Drop `op`'s changes and rebuild what it touched from the confirmed
    /// base plus every other outstanding change. Returns how many entries
    /// were restored; zero when `op` is unknown or already committed.
    pub(crate) fn rollback(&self, op: OperationId) -> usize {
        let restored = {
            let mut journal = self.journal();
            let mut touched: Vec<EntityId> = Vec::new();
            for edit in journal.edits.iter().filter(|e| e.op == op && !e.committed) {
                if !touched.contains(&edit.id) {
                    touched.push(edit.id.clone());
                }
            }
            if touched.is_empty() {
                return 0;
            }
            journal.edits.retain(|e| !(e.op == op && !e.committed));
            for id in &touched {
                self.materialize(&mut journal, id);
            }
            touched.len()
        };
        debug!(kind = T::KIND, %op, restored, "rolled back");
        self.publish();
        restored
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn journal(&self) -> MutexGuard<'_, Journal<T>> {
        self.journal.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert keeping the existing list position. Returns `true` if new.
    fn put(&self, id: EntityId, value: Arc<T>) -> bool {
        let existing = self.by_id.get(&id).map(|r| r.seq);
        let seq = existing.unwrap_or_else(|| self.next_seq.fetch_add(1, Ordering::SeqCst));
        self.by_id.insert(id, Slot { seq, value });
        existing.is_none()
    }

    fn stage(&self, op: OperationId, id: &EntityId, change: Change<T>) {
        let mut journal = self.journal();
        if !journal.base.contains_key(id) {
            let before = self.by_id.get(id).map(|r| (r.seq, Arc::clone(&r.value)));
            journal.base.insert(id.clone(), before);
        }
        journal.edits.push(PendingEdit {
            op,
            id: id.clone(),
            change,
            committed: false,
        });
        self.materialize(&mut journal, id);
    }

    /// Record a server-confirmed value (`None` = gone).
    fn confirm(&self, journal: &mut Journal<T>, id: &EntityId, value: Option<Arc<T>>) {
        if journal.base.contains_key(id) {
            let seq = journal
                .base
                .get(id)
                .and_then(|b| b.as_ref().map(|(seq, _)| *seq))
                .or_else(|| self.by_id.get(id).map(|r| r.seq))
                .unwrap_or_else(|| self.next_seq.fetch_add(1, Ordering::SeqCst));
            journal.base.insert(id.clone(), value.map(|v| (seq, v)));
            self.materialize(journal, id);
        } else {
            match value {
                Some(v) => {
                    self.put(id.clone(), v);
                }
                None => {
                    self.by_id.remove(id);
                }
            }
        }
    }

    /// Write base + outstanding changes for `id`, then fold leading
    /// committed changes into the base and forget the entry once nothing
    /// is outstanding.
    fn materialize(&self, journal: &mut Journal<T>, id: &EntityId) {
        let Some(base) = journal.base.get(id) else {
            return;
        };
        let seq = base.as_ref().map(|(seq, _)| *seq);
        let value = journal
            .edits
            .iter()
            .filter(|e| &e.id == id)
            .fold(base.as_ref().map(|(_, v)| Arc::clone(v)), |v, e| {
                e.change.apply(v)
            });
        match (value, seq) {
            (Some(value), Some(seq)) => {
                self.by_id.insert(id.clone(), Slot { seq, value });
            }
            (Some(value), None) => {
                self.put(id.clone(), value);
            }
            (None, _) => {
                self.by_id.remove(id);
            }
        }

        while let Some(pos) = journal.edits.iter().position(|e| &e.id == id) {
            if !journal.edits[pos].committed {
                return;
            }
            let edit = journal.edits.remove(pos);
            if let Some(base) = journal.base.get_mut(id) {
                let seq = base.as_ref().map(|(seq, _)| *seq);
                *base = seq.zip(edit.change.apply(base.take().map(|(_, v)| v)));
            }
        }
        journal.base.remove(id);
    }

    /// Rebuild the ordered snapshot, broadcast it, and bump the version.
    fn publish(&self) {
        let mut slots: Vec<(u64, Arc<T>)> = self
            .by_id
            .iter()
            .map(|r| (r.seq, Arc::clone(&r.value)))
            .collect();
        slots.sort_by_key(|(seq, _)| *seq);
        let values: Vec<Arc<T>> = slots.into_iter().map(|(_, v)| v).collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
        self.bump_version();
    }

    fn bump_version(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Activity;
    use pretty_assertions::assert_eq;

    fn activity(id: i64, title: &str, order: u32) -> Activity {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "property_id": 1,
            "title": title,
            "display_order": order,
        }))
        .unwrap()
    }

    fn titles(col: &EntityCollection<Activity>) -> Vec<String> {
        col.snapshot().iter().map(|a| a.title.clone()).collect()
    }

    #[test]
    fn upsert_reports_new_ids_and_keeps_position() {
        let col = EntityCollection::new();
        assert!(col.upsert(activity(1, "a", 0)));
        assert!(col.upsert(activity(2, "b", 1)));
        assert!(!col.upsert(activity(1, "a2", 0)));
        assert_eq!(titles(&col), ["a2", "b"]);
    }

    #[test]
    fn rollback_restores_only_touched_entries() {
        let col = EntityCollection::new();
        col.replace_scope(None, vec![activity(1, "a", 0), activity(2, "b", 1)]);

        let op = OperationId::new();
        col.apply_optimistic(op, &EntityId::from(1), |a| a.is_active = false)
            .unwrap();
        col.patch(&EntityId::from(2), |a| a.title = "b2".into());
        assert!(!col.get(&EntityId::from(1)).unwrap().is_active);

        assert_eq!(col.rollback(op), 1);
        assert!(col.get(&EntityId::from(1)).unwrap().is_active);
        assert_eq!(col.get(&EntityId::from(2)).unwrap().title, "b2");
        assert_eq!(col.pending_operations(), 0);
    }

    #[test]
    fn rolled_back_removal_returns_to_its_slot() {
        let col = EntityCollection::new();
        col.replace_scope(
            None,
            vec![activity(1, "a", 0), activity(2, "b", 1), activity(3, "c", 2)],
        );
        let op = OperationId::new();
        col.remove_optimistic(op, &EntityId::from(2)).unwrap();
        assert_eq!(titles(&col), ["a", "c"]);

        col.rollback(op);
        assert_eq!(titles(&col), ["a", "b", "c"]);
    }

    #[test]
    fn refresh_does_not_clobber_pending_edit() {
        let col = EntityCollection::new();
        col.replace_scope(None, vec![activity(1, "a", 0)]);

        let op = OperationId::new();
        col.apply_optimistic(op, &EntityId::from(1), |a| a.is_active = false);

        // A slow list response still carries the old flag.
        col.replace_scope(Some(&EntityId::from(1)), vec![activity(1, "a", 0)]);
        assert!(!col.get(&EntityId::from(1)).unwrap().is_active);

        col.commit(op, None);
        col.replace_scope(Some(&EntityId::from(1)), vec![activity(1, "a", 0)]);
        assert!(col.get(&EntityId::from(1)).unwrap().is_active);
    }

    #[test]
    fn rollback_keeps_a_later_committed_edit() {
        let col = EntityCollection::new();
        col.replace_scope(None, vec![activity(1, "a", 0)]);
        let id = EntityId::from(1);

        let rename = OperationId::new();
        let deactivate = OperationId::new();
        col.apply_optimistic(rename, &id, |a| a.title = "renamed".into());
        col.apply_optimistic(deactivate, &id, |a| a.is_active = false);
        col.commit(deactivate, None);

        assert_eq!(col.rollback(rename), 1);
        let row = col.get(&id).unwrap();
        assert_eq!(row.title, "a");
        assert!(!row.is_active);
        assert_eq!(col.pending_operations(), 0);

        // Nothing outstanding: a refresh shows the server state as-is.
        let mut server = activity(1, "a", 0);
        server.is_active = false;
        col.replace_scope(None, vec![server]);
        assert!(!col.get(&id).unwrap().is_active);
    }

    #[test]
    fn rollback_keeps_a_later_pending_edit() {
        let col = EntityCollection::new();
        col.replace_scope(None, vec![activity(1, "a", 0)]);
        let id = EntityId::from(1);

        let rename = OperationId::new();
        let deactivate = OperationId::new();
        col.apply_optimistic(rename, &id, |a| a.title = "renamed".into());
        col.apply_optimistic(deactivate, &id, |a| a.is_active = false);

        col.rollback(rename);
        let row = col.get(&id).unwrap();
        assert_eq!(row.title, "a");
        assert!(!row.is_active);
        assert_eq!(col.pending_operations(), 1);

        col.rollback(deactivate);
        assert!(col.get(&id).unwrap().is_active);
        assert_eq!(col.pending_operations(), 0);
    }

    #[test]
    fn echo_lands_under_an_earlier_pending_edit() {
        let col = EntityCollection::new();
        col.replace_scope(None, vec![activity(1, "a", 0)]);
        let id = EntityId::from(1);

        let rename = OperationId::new();
        let deactivate = OperationId::new();
        col.apply_optimistic(rename, &id, |a| a.title = "renamed".into());
        col.apply_optimistic(deactivate, &id, |a| a.is_active = false);

        let mut echo = activity(1, "a", 0);
        echo.is_active = false;
        col.commit(deactivate, Some(echo));
        assert_eq!(col.get(&id).unwrap().title, "renamed");

        col.rollback(rename);
        let row = col.get(&id).unwrap();
        assert_eq!(row.title, "a");
        assert!(!row.is_active);
    }

    #[test]
    fn replace_scope_leaves_other_properties_alone() {
        let col = EntityCollection::new();
        let mut other = activity(9, "elsewhere", 0);
        other.property_id = Some(EntityId::from(2));
        col.upsert(other);
        col.replace_scope(Some(&EntityId::from(1)), vec![activity(1, "a", 0)]);

        assert_eq!(col.len(), 2);
        assert_eq!(col.scoped(Some(&EntityId::from(1))).len(), 1);
    }

    #[test]
    fn commit_adopts_server_echo() {
        let col = EntityCollection::new();
        col.upsert(activity(1, "a", 0));
        let op = OperationId::new();
        col.apply_optimistic(op, &EntityId::from(1), |a| a.title = "local".into());
        col.commit(op, Some(activity(1, "server", 0)));
        assert_eq!(col.get(&EntityId::from(1)).unwrap().title, "server");
        assert_eq!(col.rollback(op), 0);
    }

    #[test]
    fn stale_flag_clears_on_refresh() {
        let col: EntityCollection<Activity> = EntityCollection::new();
        col.mark_stale();
        assert!(col.is_stale());
        col.replace_scope(None, vec![]);
        assert!(!col.is_stale());
    }

    #[test]
    fn every_mutation_bumps_version() {
        let col = EntityCollection::new();
        let v0 = col.version();
        col.upsert(activity(1, "a", 0));
        col.remove(&EntityId::from(1));
        assert_eq!(col.version(), v0 + 2);
        assert!(col.remove(&EntityId::from(1)).is_none());
        assert_eq!(col.version(), v0 + 2);
    }
}
