//! Error types.
//!
//! Contention never shows up here: the lock-free loops retry. What does show
//! up is a collaborator failure, handed back untouched together with the
//! part of the batch that was not finished.

use core::fmt;

use crate::batch::Batch;

/// A drain stopped because a collaborator failed.
///
/// The batch being processed is returned in the error. It is not pushed
/// back onto the list; the caller decides whether to re-drive it (for
/// instance with [`CompletionList::push_batch`](crate::CompletionList::push_batch))
/// or drop it.
pub enum DrainError<I, P, XE, NE> {
    /// The exporter failed. Nothing in `batch` has been released yet.
    Export {
        /// The exporter's error.
        source: XE,
        /// How many items at the front of `batch` were exported before the failure.
        exported: usize,
        /// The whole batch, minimum identifier first.
        batch: Batch<I, P>,
    },
    /// The completion tracker failed. Every item of the batch was exported.
    Notify {
        /// The tracker's error.
        source: NE,
        /// The items not yet acknowledged, the failing one first.
        batch: Batch<I, P>,
    },
}

impl<I, P, XE, NE> DrainError<I, P, XE, NE> {
    /// The unfinished batch.
    pub fn batch(&self) -> &Batch<I, P> {
        match self {
            Self::Export { batch, .. } | Self::Notify { batch, .. } => batch,
        }
    }

    /// Takes the unfinished batch out of the error.
    pub fn into_batch(self) -> Batch<I, P> {
        match self {
            Self::Export { batch, .. } | Self::Notify { batch, .. } => batch,
        }
    }

    /// Returns `true` if the exporter failed.
    pub fn is_export(&self) -> bool {
        matches!(self, Self::Export { .. })
    }
}

impl<I, P, XE: fmt::Debug, NE: fmt::Debug> fmt::Debug for DrainError<I, P, XE, NE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Export {
                source,
                exported,
                batch,
            } => f
                .debug_struct("Export")
                .field("source", source)
                .field("exported", exported)
                .field("remaining", &batch.len())
                .finish(),
            Self::Notify { source, batch } => f
                .debug_struct("Notify")
                .field("source", source)
                .field("remaining", &batch.len())
                .finish(),
        }
    }
}

impl<I, P, XE: fmt::Display, NE: fmt::Display> fmt::Display for DrainError<I, P, XE, NE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Export {
                source,
                exported,
                batch,
            } => write!(
                f,
                "export failed after {exported} of {} items: {source}",
                batch.len()
            ),
            Self::Notify { source, batch } => write!(
                f,
                "completion notification failed with {} items unacknowledged: {source}",
                batch.len()
            ),
        }
    }
}

impl<I, P, XE, NE> std::error::Error for DrainError<I, P, XE, NE>
where
    XE: std::error::Error + 'static,
    NE: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Export { source, .. } => Some(source),
            Self::Notify { source, .. } => Some(source),
        }
    }
}

/// Invalid drain configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The JSON text could not be parsed into options.
    Json(serde_json::Error),
    /// An environment variable held an unrecognised value.
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// The rejected value.
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "invalid drain options: {e}"),
            Self::InvalidEnv { var, value } => {
                write!(f, "{var} must be a boolean (1/0, true/false, yes/no, on/off), got {value:?}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::InvalidEnv { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
