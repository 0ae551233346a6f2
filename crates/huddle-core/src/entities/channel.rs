//! Channel entity - a group-messaging room with owners and members

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{ChannelId, UserId};

/// Channel visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    /// Build from the `is_public` flag used on the wire
    #[inline]
    #[must_use]
    pub fn from_is_public(is_public: bool) -> Self {
        if is_public {
            Self::Public
        } else {
            Self::Private
        }
    }

    #[inline]
    #[must_use]
    pub fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }
}

/// Channel entity
///
/// Membership invariants (maintained by the store, repaired by
/// [`Channel::repair_ownership`]):
/// - `all_members` is never empty while the channel exists
/// - every owner is also a member
/// - a sole remaining member is always the sole owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: ChannelId,
    pub name: String,
    pub visibility: Visibility,
    /// Owner ids, in the order ownership was granted
    pub owner_members: Vec<UserId>,
    /// Member ids, in join order
    pub all_members: Vec<UserId>,
    /// When the running standup window closes; absent or past means no
    /// standup is active.
    pub standup_finish: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Channel {
    /// Create a new channel with the creator as sole owner and member
    pub fn new(id: ChannelId, name: String, visibility: Visibility, creator: UserId) -> Self {
        Self {
            id,
            name,
            visibility,
            owner_members: vec![creator],
            all_members: vec![creator],
            standup_finish: None,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_private(&self) -> bool {
        !self.visibility.is_public()
    }

    /// Check whether a user is a member
    #[inline]
    pub fn is_member(&self, user_id: UserId) -> bool {
        self.all_members.contains(&user_id)
    }

    /// Check whether a user is a channel owner
    #[inline]
    pub fn is_owner(&self, user_id: UserId) -> bool {
        self.owner_members.contains(&user_id)
    }

    #[inline]
    pub fn member_count(&self) -> usize {
        self.all_members.len()
    }

    /// Add a member; no-op if already present
    pub fn add_member(&mut self, user_id: UserId) {
        if !self.is_member(user_id) {
            self.all_members.push(user_id);
        }
    }

    /// Grant ownership; no-op if already an owner
    pub fn add_owner(&mut self, user_id: UserId) {
        if !self.is_owner(user_id) {
            self.owner_members.push(user_id);
        }
    }

    /// Revoke ownership; no-op if not an owner
    pub fn remove_owner(&mut self, user_id: UserId) {
        self.owner_members.retain(|&id| id != user_id);
    }

    /// Remove a user from both member lists. Returns whether the user was a
    /// member. The caller is responsible for deleting an emptied channel and
    /// calling [`Self::repair_ownership`] otherwise.
    pub fn remove_member(&mut self, user_id: UserId) -> bool {
        let was_member = self.is_member(user_id);
        self.all_members.retain(|&id| id != user_id);
        self.owner_members.retain(|&id| id != user_id);
        was_member
    }

    /// Re-establish the ownership invariants after a membership change:
    /// a sole remaining member becomes sole owner, and an owner-less channel
    /// promotes its longest-standing member.
    pub fn repair_ownership(&mut self) {
        if self.all_members.len() == 1 {
            self.owner_members.clone_from(&self.all_members);
        } else if self.owner_members.is_empty() {
            if let Some(&oldest) = self.all_members.first() {
                self.owner_members.push(oldest);
            }
        }
    }

    /// Whether a standup window is open at the given instant
    #[inline]
    pub fn standup_active_at(&self, now: DateTime<Utc>) -> bool {
        self.standup_finish.is_some_and(|finish| now < finish)
    }
}
