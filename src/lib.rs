//! # `donelist` - Lock-Free Completion List
//!
//! A completion list collects finished units of work from many worker
//! threads and hands them, batch by batch, to a single coordinating thread
//! that exports each result and acknowledges it to an external tracker.
//!
//! ## Model
//!
//! - **Producers** call [`CompletionList::push`] from any thread. The push is
//!   a lock-free compare-exchange on the head of an intrusive stack and never
//!   blocks another producer.
//! - **The coordinator** calls [`CompletionList::drain`]. Each cycle steals
//!   the entire stack with one compare-exchange, moves the item with the
//!   smallest identifier to the front of the stolen [`Batch`], exports every
//!   payload through an [`Exporter`], then notifies a [`CompletionTracker`]
//!   of every identifier (skipped in debug mode) and releases the item.
//!   Cycles repeat until a steal comes back empty.
//!
//! ## Ownership
//!
//! A [`WorkItem`] is owned by exactly one party at a time: the producer
//! before the push, the shared stack while linked, the coordinator's
//! [`Batch`] after a steal. Pushing moves the item in; stealing moves the
//! whole chain out. There is no way to link an item twice.
//!
//! ## Ordering
//!
//! Within one batch the minimum identifier goes first and every other item
//! keeps its stack order (most recently pushed first). This is a single
//! promotion, not a sort. Nothing is promised across batches.
//!
//! ## Failures
//!
//! Contention is resolved by retrying and never reported. A failing
//! collaborator stops the drain with a [`DrainError`] that carries the rest
//! of the batch; nothing is put back on the list automatically.
//!
//! ## Example
//!
//! ```rust
//! use core::convert::Infallible;
//! use donelist::{CompletionList, DrainOptions, WorkItem};
//!
//! let list = CompletionList::new();
//! for id in [5u32, 3, 8, 1] {
//!     list.push(WorkItem::new(id, format!("result {id}")));
//! }
//!
//! let mut exported = Vec::new();
//! let mut acked = Vec::new();
//! let report = list
//!     .drain(
//!         &mut |payload: &String| {
//!             exported.push(payload.clone());
//!             Ok::<(), Infallible>(())
//!         },
//!         &mut |id: &u32| {
//!             acked.push(*id);
//!             Ok::<(), Infallible>(())
//!         },
//!         &DrainOptions::default(),
//!     )
//!     .unwrap();
//!
//! assert_eq!(report.items, 4);
//! assert_eq!(acked, vec![1, 8, 3, 5]);
//! assert_eq!(exported[0], "result 1");
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

mod sync;
mod trace;

pub mod batch;
pub mod collab;
pub mod config;
pub mod counter;
pub mod error;
pub mod guid;
pub mod item;
pub mod list;
pub mod stats;

pub use batch::Batch;
pub use collab::{CompletionTracker, Exporter, NullTracker};
pub use config::DrainOptions;
pub use counter::RelaxedCounter;
pub use error::{ConfigError, DrainError};
pub use guid::TaskGuid;
pub use item::WorkItem;
pub use list::CompletionList;
pub use stats::{CycleReport, DrainReport, ListStats};

const _: () = {
    use core::mem;

    // Identifiers stay plain 128-bit values.
    assert!(mem::size_of::<TaskGuid>() == 16);
};
