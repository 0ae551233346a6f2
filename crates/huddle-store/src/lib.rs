//! # huddle-store
//!
//! The shared in-memory dataset and its atomic operations.
//!
//! All core state (users, channels, message logs, standup buffers, session
//! tokens) lives in one [`Dataset`] behind a single `parking_lot::Mutex`
//! inside [`Store`]. Every public `Store` method acquires the lock for its
//! whole duration, so each operation is atomic with respect to every other
//! caller - request handlers and background timers alike. The store has an
//! explicit lifecycle (`new`, `clear`); there is no process-wide singleton.

mod dataset;
pub mod store;

pub use store::channels::ChannelDetails;
pub use store::messages::MessagePage;
pub use store::users::NewUser;
pub use store::Store;

/// Result type for store operations
pub type StoreResult<T> = Result<T, huddle_core::DomainError>;
