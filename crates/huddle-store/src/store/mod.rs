//! The store - the single synchronization boundary around the dataset.
//!
//! Operations are grouped by concern; each `impl Store` block lives in its
//! own module. Every method locks the dataset once and holds the lock for
//! its whole duration. Nothing under the lock performs I/O.

pub mod channels;
pub mod messages;
pub mod standup;
pub mod users;

use std::sync::Arc;

use parking_lot::Mutex;

use crate::dataset::Dataset;

/// The shared in-memory store.
///
/// Cheap to share: wrap in an [`Arc`] and hand a clone to every component,
/// including background timer tasks.
#[derive(Debug, Default)]
pub struct Store {
    pub(crate) inner: Mutex<Dataset>,
}

impl Store {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Dataset::new()),
        }
    }

    /// Create an empty store wrapped in an [`Arc`]
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Discard every user, channel, message, standup buffer, and active
    /// session. Id counters restart from zero; timers already scheduled
    /// against the old data fire into the channel-gone no-op path.
    pub fn clear(&self) {
        *self.inner.lock() = Dataset::new();
        tracing::info!("store cleared");
    }
}
