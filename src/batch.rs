//! `Batch` — the private chain a single steal hands to the coordinator.
//!
//! Items sit in chain order (most recently pushed first) until
//! [`Batch::promote_minimum`] moves the smallest identifier to the front.
//! The coordinator then runs two passes: export everything, then notify and
//! release. Nothing is freed before every item has been exported.

use std::collections::VecDeque;

use crate::collab::{CompletionTracker, Exporter};
use crate::item::WorkItem;

/// Items taken from a [`CompletionList`](crate::CompletionList) by one steal.
///
/// The batch exclusively owns its items; producers can no longer see them.
pub struct Batch<I, P> {
    items: VecDeque<WorkItem<I, P>>,
}

impl<I, P> Batch<I, P> {
    pub(crate) fn from_items(items: VecDeque<WorkItem<I, P>>) -> Self {
        Self { items }
    }

    /// Number of items in the batch.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` once every item has been released.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The item that will be processed next.
    #[inline]
    pub fn front(&self) -> Option<&WorkItem<I, P>> {
        self.items.front()
    }

    /// Iterates the items front to back.
    pub fn iter(&self) -> impl Iterator<Item = &WorkItem<I, P>> + '_ {
        self.items.iter()
    }

    /// Iterates the identifiers front to back.
    pub fn ids(&self) -> impl Iterator<Item = &I> + '_ {
        self.items.iter().map(WorkItem::id)
    }

    /// Exports every payload, front to back.
    ///
    /// Items are neither modified nor released. On failure the error comes
    /// back with the number of items exported before the failing one, and
    /// the batch is left whole.
    ///
    /// # Errors
    /// The first error reported by `exporter`.
    pub fn export_all<X>(&self, exporter: &mut X) -> Result<usize, (usize, X::Error)>
    where
        X: Exporter<P> + ?Sized,
    {
        for (exported, item) in self.items.iter().enumerate() {
            exporter.export(item.payload()).map_err(|e| (exported, e))?;
        }
        Ok(self.items.len())
    }

    /// Notifies `tracker` of each item, front to back, releasing each one
    /// after its notification. With `debug_mode` set no notification is
    /// sent but items are still released.
    ///
    /// Returns the number of notifications sent.
    ///
    /// # Errors
    /// The first error reported by `tracker`. The failing item is kept at the
    /// front, so the batch still holds every item not yet acknowledged.
    pub fn notify_and_release<N>(&mut self, tracker: &mut N, debug_mode: bool) -> Result<usize, N::Error>
    where
        N: CompletionTracker<I> + ?Sized,
    {
        let mut notified = 0;
        while let Some(item) = self.items.pop_front() {
            if !debug_mode {
                if let Err(e) = tracker.task_completed(item.id()) {
                    self.items.push_front(item);
                    return Err(e);
                }
                notified += 1;
            }
            drop(item);
        }
        Ok(notified)
    }
}

impl<I: Ord, P> Batch<I, P> {
    /// Position of the first item carrying the smallest identifier.
    pub fn min_position(&self) -> Option<usize> {
        let mut iter = self.items.iter().enumerate();
        let (_, first) = iter.next()?;
        let mut min_at = 0;
        let mut min_id = first.id();
        for (at, item) in iter {
            if item.id() < min_id {
                min_at = at;
                min_id = item.id();
            }
        }
        Some(min_at)
    }

    /// Moves the minimum-identifier item to the front.
    ///
    /// Only the minimum moves; every other item keeps its relative order.
    /// Ties go to the earliest item in chain order. Returns `true` if the
    /// front changed.
    pub fn promote_minimum(&mut self) -> bool {
        match self.min_position() {
            Some(at) if at > 0 => {
                if let Some(min) = self.items.remove(at) {
                    self.items.push_front(min);
                }
                true
            }
            _ => false,
        }
    }
}

impl<I, P> IntoIterator for Batch<I, P> {
    type Item = WorkItem<I, P>;
    type IntoIter = std::collections::vec_deque::IntoIter<WorkItem<I, P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, I, P> IntoIterator for &'a Batch<I, P> {
    type Item = &'a WorkItem<I, P>;
    type IntoIter = std::collections::vec_deque::Iter<'a, WorkItem<I, P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<I: core::fmt::Debug, P> core::fmt::Debug for Batch<I, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Batch")
            .field("ids", &self.items.iter().map(WorkItem::id).collect::<Vec<_>>())
            .finish()
    }
}
