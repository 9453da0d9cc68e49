//! Lock-guarded slot row for concurrent hosts.
//!
//! DESIGN
//! ======
//! A chain shift is a run of dependent reads and writes over one row; a second
//! caller observing the row halfway through would see a card in two places or
//! none. `SharedRow` serializes every mutation (`insert_at`, `move_card`,
//! `place`, `take`) behind the write half of a `tokio::sync::RwLock`, so each
//! one is a single critical section. Readers share the read half and only ever
//! see a row between operations.

#[cfg(test)]
#[path = "shared_test.rs"]
mod shared_test;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::row::{Direction, Shift, SlotError, SlotIndex, SlotRow};

/// Cloneable handle to a row shared between tasks.
pub struct SharedRow<C> {
    inner: Arc<RwLock<SlotRow<C>>>,
}

impl<C> Clone for SharedRow<C> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<C> SharedRow<C> {
    #[must_use]
    pub fn new(row: SlotRow<C>) -> Self {
        Self { inner: Arc::new(RwLock::new(row)) }
    }

    /// [`SlotRow::insert_at`] under the write lock.
    ///
    /// # Errors
    ///
    /// Same as [`SlotRow::insert_at`]; the row is unchanged on error.
    pub async fn insert_at(&self, target: SlotIndex, card: C, direction: Direction) -> Result<Shift, SlotError> {
        let mut row = self.inner.write().await;
        row.insert_at(target, card, direction)
    }

    /// [`SlotRow::move_card`] under the write lock.
    ///
    /// # Errors
    ///
    /// Same as [`SlotRow::move_card`]; the row is unchanged on error.
    pub async fn move_card(&self, from: SlotIndex, to: SlotIndex, direction: Direction) -> Result<Shift, SlotError> {
        self.inner.write().await.move_card(from, to, direction)
    }

    /// [`SlotRow::place`] under the write lock.
    ///
    /// # Errors
    ///
    /// Same as [`SlotRow::place`].
    pub async fn place(&self, index: SlotIndex, card: C) -> Result<(), SlotError> {
        self.inner.write().await.place(index, card)
    }

    /// [`SlotRow::take`] under the write lock.
    ///
    /// # Errors
    ///
    /// Same as [`SlotRow::take`].
    pub async fn take(&self, index: SlotIndex) -> Result<Option<C>, SlotError> {
        self.inner.write().await.take(index)
    }

    /// Run a read-only closure against the row.
    pub async fn read<R>(&self, f: impl FnOnce(&SlotRow<C>) -> R) -> R {
        let row = self.inner.read().await;
        f(&row)
    }

    pub async fn occupied_count(&self) -> usize {
        self.inner.read().await.occupied_count()
    }

    /// Clone of the row as it stands between operations.
    pub async fn snapshot(&self) -> SlotRow<C>
    where
        C: Clone,
    {
        self.inner.read().await.clone()
    }
}

impl<C> From<SlotRow<C>> for SharedRow<C> {
    fn from(row: SlotRow<C>) -> Self {
        Self::new(row)
    }
}
