//! `WorkItem` — one finished unit of work.

use serde::{Deserialize, Serialize};

/// A completed unit of work awaiting export and acknowledgment.
///
/// The producer builds it with its identifier and payload, then moves it
/// into a [`CompletionList`](crate::CompletionList). Moving is the only way
/// in, so an item can never be linked twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem<I, P> {
    id: I,
    payload: P,
}

impl<I, P> WorkItem<I, P> {
    /// Creates an item for the task `id` carrying `payload`.
    #[inline]
    pub const fn new(id: I, payload: P) -> Self {
        Self { id, payload }
    }

    /// The task identifier.
    #[inline]
    pub fn id(&self) -> &I {
        &self.id
    }

    /// The result data produced by the worker.
    #[inline]
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Splits the item into identifier and payload.
    #[inline]
    pub fn into_parts(self) -> (I, P) {
        (self.id, self.payload)
    }
}

impl<I, P> From<(I, P)> for WorkItem<I, P> {
    fn from((id, payload): (I, P)) -> Self {
        Self::new(id, payload)
    }
}
