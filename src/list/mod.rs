//! `CompletionList` — a lock-free stack of finished work.
//!
//! Any number of producers [`push`](CompletionList::push) concurrently; one
//! coordinator [`drain`](CompletionList::drain)s. The only shared mutable
//! state is the head pointer:
//! - push is a Treiber push (link to the observed head, compare-exchange,
//!   retry on contention)
//! - steal compare-exchanges the head to null, taking the whole chain at once
//!
//! Steals never read a node before owning it, so taking whole chains is free
//! of the ABA hazard a single-node pop would have.

mod node;

use core::fmt;
use core::marker::PhantomData;
use std::ptr;
use std::time::Instant;

use crossbeam_utils::{Backoff, CachePadded};

use self::node::{take_chain, Node};
use crate::batch::Batch;
use crate::collab::{CompletionTracker, Exporter};
use crate::config::DrainOptions;
use crate::counter::RelaxedCounter;
use crate::error::DrainError;
use crate::item::WorkItem;
use crate::stats::{CycleReport, DrainReport, ListStats};
use crate::sync::{AtomicPtr, Ordering};
use crate::trace::{debug_event, trace_event, warn_event};

/// An unbounded multi-producer, single-coordinator completion list.
pub struct CompletionList<I, P> {
    head: CachePadded<AtomicPtr<Node<I, P>>>,
    pushed: RelaxedCounter,
    drained: RelaxedCounter,
    _owns: PhantomData<Box<Node<I, P>>>,
}

// Items only ever move between threads; none is shared by reference.
unsafe impl<I: Send, P: Send> Send for CompletionList<I, P> {}
unsafe impl<I: Send, P: Send> Sync for CompletionList<I, P> {}

impl<I, P> CompletionList<I, P> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            head: CachePadded::new(AtomicPtr::new(ptr::null_mut())),
            pushed: RelaxedCounter::new(0),
            drained: RelaxedCounter::new(0),
            _owns: PhantomData,
        }
    }

    /// Returns `true` if no item is currently linked.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire).is_null()
    }

    /// Push and steal counts so far.
    pub fn stats(&self) -> ListStats {
        ListStats {
            pushed: self.pushed.get(),
            drained: self.drained.get(),
        }
    }

    /// Pushes a finished item. Lock-free; callable from any thread.
    pub fn push(&self, item: WorkItem<I, P>) {
        let node = Node::alloc(item);
        self.publish(node, node);
        self.pushed.increment();
    }

    /// Pushes several items with a single successful compare-exchange.
    ///
    /// The items stay contiguous and in the given order, the first one
    /// nearest the head. Returns the number of items pushed.
    pub fn push_batch<T>(&self, items: T) -> usize
    where
        T: IntoIterator<Item = WorkItem<I, P>>,
    {
        let mut items = items.into_iter();
        let Some(first) = items.next() else {
            return 0;
        };

        let first = Node::alloc(first);
        let mut tail = first;
        let mut count = 1;
        for item in items {
            let node = Node::alloc(item);
            // SAFETY: the chain is still private to this thread.
            unsafe { (*tail).next = node };
            tail = node;
            count += 1;
        }

        self.publish(first, tail);
        self.pushed.fetch_add(count);
        count
    }

    /// Links the private chain `first..=tail` in front of the current head.
    fn publish(&self, first: *mut Node<I, P>, tail: *mut Node<I, P>) {
        let backoff = Backoff::new();
        let mut head = self.head.load(Ordering::Relaxed);
        loop {
            // SAFETY: `tail` is unpublished until the exchange below succeeds.
            unsafe { (*tail).next = head };
            match self
                .head
                .compare_exchange_weak(head, first, Ordering::Release, Ordering::Relaxed)
            {
                Ok(_) => return,
                Err(actual) => {
                    head = actual;
                    backoff.spin();
                }
            }
        }
    }

    /// Atomically takes every linked item, most recently pushed first.
    ///
    /// Returns `None` if the list was empty. Producers racing with the steal
    /// start a fresh chain; no item is in both.
    pub fn steal(&self) -> Option<Batch<I, P>> {
        let backoff = Backoff::new();
        let mut head = self.head.load(Ordering::Relaxed);
        loop {
            if head.is_null() {
                return None;
            }
            match self.head.compare_exchange_weak(
                head,
                ptr::null_mut(),
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => {
                    head = actual;
                    backoff.spin();
                }
            }
        }

        // SAFETY: the exchange unlinked the chain; the acquire pairs with the
        // release of every push that built it.
        let items = unsafe { take_chain(head) };
        self.drained.fetch_add(items.len());
        Some(Batch::from_items(items))
    }
}

impl<I: Ord, P> CompletionList<I, P> {
    /// Runs one steal, reorder, export, notify cycle.
    ///
    /// Returns `Ok(None)` when the steal found the list empty.
    ///
    /// # Errors
    /// A collaborator failed; the error carries the unfinished batch.
    #[allow(clippy::type_complexity)]
    pub fn drain_once<X, N>(
        &self,
        exporter: &mut X,
        tracker: &mut N,
        options: &DrainOptions,
    ) -> Result<Option<CycleReport>, DrainError<I, P, X::Error, N::Error>>
    where
        X: Exporter<P> + ?Sized,
        N: CompletionTracker<I> + ?Sized,
    {
        let Some(mut batch) = self.steal() else {
            return Ok(None);
        };
        let items = batch.len();
        let reordered = batch.promote_minimum();
        trace_event!(items, reordered, "stole completion batch");

        let started = Instant::now();
        if let Err((exported, source)) = batch.export_all(exporter) {
            warn_event!(exported, items, "export failed, handing batch back");
            return Err(DrainError::Export {
                source,
                exported,
                batch,
            });
        }
        let export_time = started.elapsed();

        let notified = match batch.notify_and_release(tracker, options.debug_mode) {
            Ok(notified) => notified,
            Err(source) => {
                warn_event!(remaining = batch.len(), "completion notification failed");
                return Err(DrainError::Notify { source, batch });
            }
        };

        Ok(Some(CycleReport {
            items,
            notified,
            reordered,
            export_time,
        }))
    }

    /// Drains until a steal finds the list empty.
    ///
    /// Items pushed while a batch is being processed are picked up by the
    /// next cycle. Within a cycle the smallest identifier is exported and
    /// notified first; across cycles there is no ordering. Must not be run
    /// from two threads at once if that ordering matters.
    ///
    /// # Errors
    /// A collaborator failed. Batches finished before the failure stay
    /// finished; the failing batch is returned in the error.
    #[allow(clippy::type_complexity)]
    pub fn drain<X, N>(
        &self,
        exporter: &mut X,
        tracker: &mut N,
        options: &DrainOptions,
    ) -> Result<DrainReport, DrainError<I, P, X::Error, N::Error>>
    where
        X: Exporter<P> + ?Sized,
        N: CompletionTracker<I> + ?Sized,
    {
        let mut report = DrainReport::default();
        while let Some(cycle) = self.drain_once(&mut *exporter, &mut *tracker, options)? {
            report.absorb(&cycle);
        }
        debug_event!(
            batches = report.batches,
            items = report.items,
            notified = report.notified,
            debug_mode = options.debug_mode,
            "completion list drained"
        );
        Ok(report)
    }
}

impl<I, P> Default for CompletionList<I, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, P> fmt::Debug for CompletionList<I, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionList")
            .field("empty", &self.is_empty())
            .field("stats", &self.stats())
            .finish()
    }
}

impl<I, P> Drop for CompletionList<I, P> {
    fn drop(&mut self) {
        let head = self.head.swap(ptr::null_mut(), Ordering::Acquire);
        // SAFETY: `&mut self` rules out concurrent pushes and steals.
        drop(unsafe { take_chain(head) });
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn stolen_ids(list: &CompletionList<u32, ()>) -> Vec<u32> {
        list.steal()
            .map(|b| b.ids().copied().collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_steal_returns_push_order_reversed() {
        let list = CompletionList::new();
        for id in [5, 3, 8, 1] {
            list.push(WorkItem::new(id, ()));
        }
        assert!(!list.is_empty());
        assert_eq!(stolen_ids(&list), vec![1, 8, 3, 5]);
        assert!(list.is_empty());
        assert!(list.steal().is_none());
    }

    #[test]
    fn test_push_batch_keeps_given_order_at_head() {
        let list = CompletionList::new();
        list.push(WorkItem::new(9, ()));
        let pushed = list.push_batch([1, 2, 3].map(|id| WorkItem::new(id, ())));
        assert_eq!(pushed, 3);
        list.push(WorkItem::new(7, ()));
        assert_eq!(stolen_ids(&list), vec![7, 1, 2, 3, 9]);
    }

    #[test]
    fn test_push_batch_empty_is_noop() {
        let list: CompletionList<u32, ()> = CompletionList::new();
        assert_eq!(list.push_batch(Vec::new()), 0);
        assert!(list.is_empty());
        assert_eq!(list.stats(), ListStats::default());
    }

    #[test]
    fn test_stats_track_pushes_and_steals() {
        let list = CompletionList::new();
        list.push(WorkItem::new(1, ()));
        list.push_batch([2, 3].map(|id| WorkItem::new(id, ())));
        assert_eq!(list.stats().pending(), 3);
        let _ = list.steal();
        list.push(WorkItem::new(4, ()));
        let stats = list.stats();
        assert_eq!(stats.pushed, 4);
        assert_eq!(stats.drained, 3);
        assert_eq!(stats.pending(), 1);
    }

    #[test]
    fn test_drop_releases_linked_items() {
        let payload = Arc::new(());
        {
            let list = CompletionList::new();
            for id in 0..16u32 {
                list.push(WorkItem::new(id, Arc::clone(&payload)));
            }
            assert_eq!(Arc::strong_count(&payload), 17);
        }
        assert_eq!(Arc::strong_count(&payload), 1);
    }

    #[test]
    fn test_concurrent_steals_partition_items() {
        const PER_THREAD: u32 = 2000;
        let list = CompletionList::new();
        let mut seen: Vec<u32> = std::thread::scope(|s| {
            for t in 0..4u32 {
                let list = &list;
                s.spawn(move || {
                    for i in 0..PER_THREAD {
                        list.push(WorkItem::new(t * PER_THREAD + i, ()));
                    }
                });
            }
            let thieves: Vec<_> = (0..2)
                .map(|_| {
                    let list = &list;
                    s.spawn(move || {
                        let mut ids = Vec::new();
                        for _ in 0..1000 {
                            if let Some(batch) = list.steal() {
                                ids.extend(batch.ids().copied());
                            }
                        }
                        ids
                    })
                })
                .collect();
            thieves
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });
        if let Some(rest) = list.steal() {
            seen.extend(rest.ids().copied());
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..4 * PER_THREAD).collect::<Vec<_>>());
    }
}
