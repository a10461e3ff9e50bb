//! Ordered wish collection keyed by a monotonically increasing id.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
use wish_core::{Wish, WishDraft, WishId, WishQuery};

use crate::StoreError;

#[derive(Debug)]
struct Inner {
    /// Next id to hand out. Only ever increases.
    next_id: u64,
    /// Records in insertion order.
    wishes: IndexMap<WishId, Wish>,
}

impl Default for Inner {
    fn default() -> Self {
        Self { next_id: 1, wishes: IndexMap::new() }
    }
}

/// Thread-safe owner of all wish records.
///
/// Every operation holds the store lock for its whole duration, so id
/// assignment and visibility of create/update/delete are atomic with respect
/// to each other.
#[derive(Debug, Default)]
pub struct WishStore {
    inner: RwLock<Inner>,
}

impl WishStore {
    /// Create an empty store. The first id issued is 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next id to `draft`, append it and return the stored record.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    pub fn create(&self, draft: WishDraft) -> Wish {
        let mut inner = self.write();
        let id = WishId::new(inner.next_id);
        inner.next_id += 1;
        let wish = Wish::from_draft(id, draft);
        inner.wishes.insert(id, wish.clone());
        wish
    }

    /// Return the records admitted by `query`, sorted if it asks for it.
    ///
    /// Without a sort key the result follows insertion order. Sorting is
    /// stable, so equal keys keep their insertion order too.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn list(&self, query: &WishQuery) -> Vec<Wish> {
        let mut wishes: Vec<Wish> = self
            .read()
            .wishes
            .values()
            .filter(|w| query.admits(w))
            .cloned()
            .collect();
        if let Some(key) = query.sort_by {
            wishes.sort_by(|a, b| key.compare(a, b));
        }
        wishes
    }

    /// Look up a single record.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if no record has this id.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    pub fn get(&self, id: WishId) -> Result<Wish, StoreError> {
        self.read().wishes.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    /// Replace every field except the id. The record keeps its position.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if no record has this id.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    pub fn update(&self, id: WishId, draft: WishDraft) -> Result<Wish, StoreError> {
        let mut inner = self.write();
        let slot = inner.wishes.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        *slot = Wish::from_draft(id, draft);
        Ok(slot.clone())
    }

    /// Remove a record. Its id is never issued again.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if no record has this id, including
    /// when it was already deleted.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    pub fn delete(&self, id: WishId) -> Result<(), StoreError> {
        self.write()
            .wishes
            .shift_remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    /// Number of records currently stored.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().wishes.len()
    }

    /// Return `true` if the store holds no records.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().expect("wish store read lock poisoned")
    }

    #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().expect("wish store write lock poisoned")
    }
}
