//! User entity - a registered account

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::UserId;

/// Global role of a user, independent of per-channel ownership.
///
/// The first registered user is always an `Owner`; everyone after that
/// starts as a `Member`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum GlobalRole {
    /// Elevated rights in every channel
    Owner = 1,
    /// Ordinary user
    #[default]
    Member = 2,
}

impl GlobalRole {
    /// Numeric permission id used on the wire
    #[inline]
    #[must_use]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parse a numeric permission id; `None` for unknown values
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Owner),
            2 => Some(Self::Member),
            _ => None,
        }
    }
}

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub name_first: String,
    pub name_last: String,
    /// Unique lowercase display handle, 3-20 characters
    pub handle: String,
    pub avatar_url: Option<String>,
    pub role: GlobalRole,
    /// Currently-active session token. At most one per user; `None` while
    /// logged out.
    pub token: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new User with required fields
    pub fn new(
        id: UserId,
        email: String,
        password_hash: String,
        name_first: String,
        name_last: String,
        handle: String,
        role: GlobalRole,
    ) -> Self {
        Self {
            id,
            email,
            password_hash,
            name_first,
            name_last,
            handle,
            avatar_url: None,
            role,
            token: None,
            created_at: Utc::now(),
        }
    }

    /// Check whether the user holds the global owner role
    #[inline]
    pub fn is_global_owner(&self) -> bool {
        self.role == GlobalRole::Owner
    }

    /// Check whether the user currently holds an active session
    #[inline]
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// Full name, first then last
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name_first, self.name_last)
    }

    /// Record a freshly-issued session token
    pub fn log_in(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Drop the active session token, returning it if one was set
    pub fn log_out(&mut self) -> Option<String> {
        self.token.take()
    }

    /// Update first and last name
    pub fn set_name(&mut self, name_first: String, name_last: String) {
        self.name_first = name_first;
        self.name_last = name_last;
    }

    /// Update the email address
    pub fn set_email(&mut self, email: String) {
        self.email = email;
    }

    /// Update the display handle
    pub fn set_handle(&mut self, handle: String) {
        self.handle = handle;
    }
}
