//! Heap nodes of the shared stack.
//!
//! A node is allocated by `push`, owned by the stack while linked, and turned
//! back into an owned `WorkItem` when a steal unlinks its chain.

use std::collections::VecDeque;
use std::ptr;

use crate::item::WorkItem;

pub(super) struct Node<I, P> {
    pub(super) item: WorkItem<I, P>,
    pub(super) next: *mut Node<I, P>,
}

impl<I, P> Node<I, P> {
    /// Moves `item` into a fresh, unlinked node.
    #[inline]
    pub(super) fn alloc(item: WorkItem<I, P>) -> *mut Self {
        Box::into_raw(Box::new(Self {
            item,
            next: ptr::null_mut(),
        }))
    }
}

/// Frees every node of the chain starting at `head`, returning the items in
/// chain order.
///
/// # Safety
/// `head` must be null or the first node of a chain built from
/// [`Node::alloc`] allocations, and no other thread may be able to reach any
/// node of that chain.
pub(super) unsafe fn take_chain<I, P>(mut head: *mut Node<I, P>) -> VecDeque<WorkItem<I, P>> {
    let mut items = VecDeque::new();
    while !head.is_null() {
        // SAFETY: guaranteed by the caller; each node is visited once.
        let node = unsafe { Box::from_raw(head) };
        let Node { item, next } = *node;
        items.push_back(item);
        head = next;
    }
    items
}
