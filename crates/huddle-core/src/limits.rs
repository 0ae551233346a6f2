//! Domain limits shared by validation at every layer.
//!
//! Lengths are counted in characters, not bytes.

/// Maximum channel name length
pub const MAX_CHANNEL_NAME_LEN: usize = 20;

/// Maximum message text length
pub const MAX_MESSAGE_LEN: usize = 1000;

/// Fixed page size for channel message listings
pub const MESSAGE_PAGE_SIZE: usize = 50;

/// Sentinel returned as the page end when no further page exists
pub const PAGE_END_SENTINEL: i64 = -1;

/// Handle (display name) length bounds
pub const MIN_HANDLE_LEN: usize = 3;
pub const MAX_HANDLE_LEN: usize = 20;

/// First/last name length bounds
pub const MIN_NAME_LEN: usize = 1;
pub const MAX_NAME_LEN: usize = 50;

/// Minimum password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Reaction kinds the system understands. Only the thumbs-up kind exists.
pub const SUPPORTED_REACT_KINDS: &[u8] = &[1];

/// Check whether a reaction kind is one the system supports
#[inline]
#[must_use]
pub fn is_supported_react_kind(kind: u8) -> bool {
    SUPPORTED_REACT_KINDS.contains(&kind)
}
