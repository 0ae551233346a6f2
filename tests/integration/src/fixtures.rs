//! Test fixtures and data generators

use std::sync::atomic::{AtomicU64, Ordering};

use huddle_service::dto::RegisterRequest;

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// A registration request with a unique email
pub fn register_request(name_first: &str, name_last: &str) -> RegisterRequest {
    RegisterRequest {
        email: format!("user{}@example.com", unique_suffix()),
        password: "TestPass123".to_string(),
        name_first: name_first.to_string(),
        name_last: name_last.to_string(),
    }
}
