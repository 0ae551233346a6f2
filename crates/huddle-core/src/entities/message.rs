//! Message entity - one entry in a channel's append-only log

use chrono::{DateTime, Utc};

use crate::limits::SUPPORTED_REACT_KINDS;
use crate::value_objects::{ChannelId, MessageId, UserId};

/// Per-kind reaction record: which users applied this reaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionSlot {
    pub kind: u8,
    pub user_ids: Vec<UserId>,
}

impl ReactionSlot {
    /// Create an empty slot for a reaction kind
    pub fn new(kind: u8) -> Self {
        Self {
            kind,
            user_ids: Vec::new(),
        }
    }

    /// Check whether a user has this reaction active
    #[inline]
    pub fn contains(&self, user_id: UserId) -> bool {
        self.user_ids.contains(&user_id)
    }

    /// Record a user's reaction. Returns `false` if it was already active.
    pub fn add(&mut self, user_id: UserId) -> bool {
        if self.contains(user_id) {
            false
        } else {
            self.user_ids.push(user_id);
            true
        }
    }

    /// Withdraw a user's reaction. Returns `false` if none was active.
    pub fn remove(&mut self, user_id: UserId) -> bool {
        let before = self.user_ids.len();
        self.user_ids.retain(|&id| id != user_id);
        self.user_ids.len() != before
    }
}

/// Message entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub author_id: UserId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub is_pinned: bool,
    /// One slot per supported reaction kind
    pub reactions: Vec<ReactionSlot>,
}

impl Message {
    /// Create a new message with empty reaction slots
    pub fn new(
        id: MessageId,
        channel_id: ChannelId,
        author_id: UserId,
        text: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            channel_id,
            author_id,
            text,
            created_at,
            is_pinned: false,
            reactions: SUPPORTED_REACT_KINDS
                .iter()
                .map(|&kind| ReactionSlot::new(kind))
                .collect(),
        }
    }

    /// Look up the reaction slot for a kind
    pub fn reaction_slot(&self, kind: u8) -> Option<&ReactionSlot> {
        self.reactions.iter().find(|slot| slot.kind == kind)
    }

    /// Mutable reaction slot lookup
    pub fn reaction_slot_mut(&mut self, kind: u8) -> Option<&mut ReactionSlot> {
        self.reactions.iter_mut().find(|slot| slot.kind == kind)
    }

    /// Replace the text and reset the timestamp to the edit instant
    pub fn edit(&mut self, text: String, now: DateTime<Utc>) {
        self.text = text;
        self.created_at = now;
    }
}
