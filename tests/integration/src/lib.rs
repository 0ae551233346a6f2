//! Integration test support for the huddle core.
//!
//! The transport glue is out of scope, so these tests drive the service
//! layer directly: every operation goes token-first through the identity
//! resolver, exactly as the glue would call it.

pub mod fixtures;
pub mod helpers;

pub use helpers::TestApp;
