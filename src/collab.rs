//! Collaborators reached by the coordinator during a drain.
//!
//! Neither trait is implemented inside this crate beyond the closure
//! adapters: the result sink and the completion tracker belong to the
//! caller.

/// Writes a finished payload to a result sink.
pub trait Exporter<P> {
    /// Failure reported by the sink. Propagated to the drain caller as is.
    type Error;

    /// Exports one payload. Called synchronously from the draining thread.
    fn export(&mut self, payload: &P) -> Result<(), Self::Error>;
}

/// Informs an external tracker that a task is finished.
///
/// Called at most once per drained identifier, but implementations should
/// tolerate a repeat if the caller re-drives a failed batch.
pub trait CompletionTracker<I> {
    /// Failure reported by the tracker. Propagated to the drain caller as is.
    type Error;

    /// Signals completion of the task `id`.
    fn task_completed(&mut self, id: &I) -> Result<(), Self::Error>;
}

impl<P, E, F> Exporter<P> for F
where
    F: FnMut(&P) -> Result<(), E>,
{
    type Error = E;

    #[inline]
    fn export(&mut self, payload: &P) -> Result<(), E> {
        self(payload)
    }
}

impl<I, E, F> CompletionTracker<I> for F
where
    F: FnMut(&I) -> Result<(), E>,
{
    type Error = E;

    #[inline]
    fn task_completed(&mut self, id: &I) -> Result<(), E> {
        self(id)
    }
}

/// A tracker that accepts every notification and does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTracker;

impl<I> CompletionTracker<I> for NullTracker {
    type Error = core::convert::Infallible;

    #[inline]
    fn task_completed(&mut self, _id: &I) -> Result<(), Self::Error> {
        Ok(())
    }
}
