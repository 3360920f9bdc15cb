// ── Generic keyed entity collection ──
//
// Sharded concurrent storage with O(1) lookups and a cheaply cloned
// snapshot. Each mutation locks only the shard holding its key, which
// is what serialises writes to a single device.

use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::watch;

/// A concurrent collection for a single entity type.
///
/// Uses `DashMap` for per-key locking and a `watch` channel holding the
/// latest snapshot. Every mutation rebuilds the snapshot, sorted by key
/// so that readers always see a deterministic order.
pub(crate) struct EntityCollection<K, T>
where
    K: Clone + Eq + Hash + Ord + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Primary storage: key -> entity.
    by_key: DashMap<K, T>,

    /// Full snapshot, rebuilt on mutation.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<K, T> EntityCollection<K, T>
where
    K: Clone + Eq + Hash + Ord + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            by_key: DashMap::new(),
            snapshot,
        }
    }

    /// Insert or replace an entity. Returns `true` if the key was new.
    #[cfg(test)]
    pub(crate) fn upsert(&self, key: K, entity: T) -> bool {
        let is_new = self.by_key.insert(key, entity).is_none();
        self.rebuild_snapshot();
        is_new
    }

    /// Insert only if the key is absent. Returns `false` when it existed.
    pub(crate) fn insert_new(&self, key: K, entity: T) -> bool {
        let inserted = match self.by_key.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(entity);
                true
            }
        };
        if inserted {
            self.rebuild_snapshot();
        }
        inserted
    }

    /// Remove an entity by key. Returns the removed entity if it existed.
    pub(crate) fn remove(&self, key: &K) -> Option<T> {
        let removed = self.by_key.remove(key).map(|(_, v)| v);
        if removed.is_some() {
            self.rebuild_snapshot();
        }
        removed
    }

    /// Clone an entity out of the map.
    pub(crate) fn get(&self, key: &K) -> Option<T> {
        self.by_key.get(key).map(|r| r.value().clone())
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        self.by_key.contains_key(key)
    }

    /// Run `f` against the entity while holding its shard lock.
    ///
    /// `f` must not touch this collection again or it will deadlock.
    pub(crate) fn update<R>(&self, key: &K, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let out = {
            let mut entry = self.by_key.get_mut(key)?;
            f(entry.value_mut())
        };
        self.rebuild_snapshot();
        Some(out)
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Remove all entities.
    pub(crate) fn clear(&self) {
        self.by_key.clear();
        self.rebuild_snapshot();
    }

    pub(crate) fn len(&self) -> usize {
        self.by_key.len()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Collect all values, key-ordered, and publish them.
    ///
    /// The map is read while the watch value is write-locked, so rebuilds
    /// publish one at a time and the last one always sees every finished
    /// mutation. Callers must not hold a shard guard here.
    fn rebuild_snapshot(&self) {
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| {
            let mut entries: Vec<(K, Arc<T>)> = self
                .by_key
                .iter()
                .map(|r| (r.key().clone(), Arc::new(r.value().clone())))
                .collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            *snap = Arc::new(entries.into_iter().map(|(_, v)| v).collect());
        });
    }
}
