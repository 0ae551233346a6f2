//! The dataset - every record the system owns, plus the guard checks that
//! protect it.
//!
//! Lookups are id-indexed maps; listing order is kept in separate ordered id
//! vectors. Message logs are per-channel vectors in append order; a global
//! index maps message ids to their owning channel.

use std::collections::HashMap;

use huddle_core::{Channel, ChannelId, DomainError, Message, MessageId, User, UserId};

/// Per-channel message log and standup buffer
#[derive(Debug, Default)]
pub(crate) struct ChannelLog {
    /// Messages in append order (oldest first)
    pub messages: Vec<Message>,
    /// Accumulated standup lines, newline-joined; cleared on flush
    pub standup_buffer: String,
}

/// The whole in-memory dataset. Only ever touched under the store's lock.
#[derive(Debug, Default)]
pub(crate) struct Dataset {
    pub users: HashMap<UserId, User>,
    pub user_order: Vec<UserId>,
    /// Active session tokens, token -> user
    pub tokens: HashMap<String, UserId>,

    pub channels: HashMap<ChannelId, Channel>,
    pub channel_order: Vec<ChannelId>,
    pub logs: HashMap<ChannelId, ChannelLog>,
    /// Global message id -> owning channel
    pub message_index: HashMap<MessageId, ChannelId>,

    next_user_id: i64,
    next_channel_id: i64,
    /// Message ids are 1-based, strictly increasing, never reused
    next_message_id: i64,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    // === Id allocation ===

    pub fn alloc_user_id(&mut self) -> UserId {
        let id = UserId::new(self.next_user_id);
        self.next_user_id += 1;
        id
    }

    pub fn alloc_channel_id(&mut self) -> ChannelId {
        let id = ChannelId::new(self.next_channel_id);
        self.next_channel_id += 1;
        id
    }

    pub fn alloc_message_id(&mut self) -> MessageId {
        self.next_message_id += 1;
        MessageId::new(self.next_message_id)
    }

    /// Whether any user has registered yet (the first one becomes global owner)
    pub fn is_first_user(&self) -> bool {
        self.next_user_id == 0
    }

    // === Guard checks ===

    pub fn require_user(&self, user_id: UserId) -> Result<&User, DomainError> {
        self.users
            .get(&user_id)
            .ok_or(DomainError::UserNotFound(user_id))
    }

    pub fn require_channel(&self, channel_id: ChannelId) -> Result<&Channel, DomainError> {
        self.channels
            .get(&channel_id)
            .ok_or(DomainError::ChannelNotFound(channel_id))
    }

    pub fn require_channel_mut(
        &mut self,
        channel_id: ChannelId,
    ) -> Result<&mut Channel, DomainError> {
        self.channels
            .get_mut(&channel_id)
            .ok_or(DomainError::ChannelNotFound(channel_id))
    }

    /// The channel must already be known to exist.
    pub fn require_member(
        &self,
        user_id: UserId,
        channel_id: ChannelId,
    ) -> Result<(), DomainError> {
        let channel = self.require_channel(channel_id)?;
        if channel.is_member(user_id) {
            Ok(())
        } else {
            Err(DomainError::NotMember {
                user: user_id,
                channel: channel_id,
            })
        }
    }

    pub fn is_global_owner(&self, user_id: UserId) -> bool {
        self.users
            .get(&user_id)
            .is_some_and(User::is_global_owner)
    }

    /// Elevated rights: channel owner OR global owner.
    pub fn has_elevated_rights(&self, user_id: UserId, channel: &Channel) -> bool {
        channel.is_owner(user_id) || self.is_global_owner(user_id)
    }

    /// Resolve a message id to its owning channel.
    pub fn require_message_channel(
        &self,
        message_id: MessageId,
    ) -> Result<ChannelId, DomainError> {
        self.message_index
            .get(&message_id)
            .copied()
            .ok_or(DomainError::MessageNotFound(message_id))
    }

    /// Mutable access to a message within its channel log.
    pub fn message_mut(&mut self, message_id: MessageId) -> Result<&mut Message, DomainError> {
        let channel_id = self.require_message_channel(message_id)?;
        self.logs
            .get_mut(&channel_id)
            .and_then(|log| log.messages.iter_mut().find(|m| m.id == message_id))
            .ok_or(DomainError::MessageNotFound(message_id))
    }

    /// Immutable access to a message within its channel log.
    pub fn message(&self, message_id: MessageId) -> Result<&Message, DomainError> {
        let channel_id = self.require_message_channel(message_id)?;
        self.logs
            .get(&channel_id)
            .and_then(|log| log.messages.iter().find(|m| m.id == message_id))
            .ok_or(DomainError::MessageNotFound(message_id))
    }

    // === Shared mutations ===

    /// Append a message to a channel log and index it. The channel's log must
    /// exist; callers that tolerate a vanished channel check first.
    pub fn append_message(&mut self, message: Message) {
        self.message_index.insert(message.id, message.channel_id);
        if let Some(log) = self.logs.get_mut(&message.channel_id) {
            log.messages.push(message);
        }
    }

    /// Drop a channel and everything hanging off it.
    pub fn delete_channel(&mut self, channel_id: ChannelId) {
        self.channels.remove(&channel_id);
        self.channel_order.retain(|&id| id != channel_id);
        if let Some(log) = self.logs.remove(&channel_id) {
            for message in &log.messages {
                self.message_index.remove(&message.id);
            }
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use huddle_core::{GlobalRole, Visibility};

    fn dataset_with_channel() -> (Dataset, UserId, ChannelId) {
        let mut ds = Dataset::new();
        let user_id = ds.alloc_user_id();
        ds.users.insert(
            user_id,
            User::new(
                user_id,
                "a@example.com".into(),
                "hash".into(),
                "Ada".into(),
                "Lovelace".into(),
                "adalovelace".into(),
                GlobalRole::Owner,
            ),
        );
        ds.user_order.push(user_id);

        let channel_id = ds.alloc_channel_id();
        ds.channels.insert(
            channel_id,
            Channel::new(channel_id, "general".into(), Visibility::Public, user_id),
        );
        ds.channel_order.push(channel_id);
        ds.logs.insert(channel_id, ChannelLog::default());

        (ds, user_id, channel_id)
    }

    #[test]
    fn test_message_ids_start_at_one_and_increase() {
        let mut ds = Dataset::new();
        assert_eq!(ds.alloc_message_id(), MessageId::new(1));
        assert_eq!(ds.alloc_message_id(), MessageId::new(2));
    }

    #[test]
    fn test_guards() {
        let (ds, user_id, channel_id) = dataset_with_channel();
        assert!(ds.require_user(user_id).is_ok());
        assert!(ds.require_channel(channel_id).is_ok());
        assert!(ds.require_member(user_id, channel_id).is_ok());

        assert_eq!(
            ds.require_channel(ChannelId::new(99)).unwrap_err(),
            DomainError::ChannelNotFound(ChannelId::new(99))
        );
        assert!(matches!(
            ds.require_member(UserId::new(42), channel_id).unwrap_err(),
            DomainError::NotMember { .. }
        ));
    }

    #[test]
    fn test_delete_channel_clears_log_and_index() {
        let (mut ds, user_id, channel_id) = dataset_with_channel();
        let message_id = ds.alloc_message_id();
        ds.append_message(Message::new(
            message_id,
            channel_id,
            user_id,
            "hi".into(),
            Utc::now(),
        ));
        assert!(ds.require_message_channel(message_id).is_ok());

        ds.delete_channel(channel_id);
        assert!(ds.require_channel(channel_id).is_err());
        assert!(ds.logs.get(&channel_id).is_none());
        assert_eq!(
            ds.require_message_channel(message_id).unwrap_err(),
            DomainError::MessageNotFound(message_id)
        );
    }
}
