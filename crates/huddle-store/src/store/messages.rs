//! Message log operations: send, paginate, edit, remove, react, pin, and
//! the deferred-delivery append path.
//!
//! Message ids come from one global counter shared across all channels;
//! they are strictly increasing and never reused, even after removal.

use chrono::{DateTime, Utc};
use huddle_core::limits::{
    is_supported_react_kind, MAX_MESSAGE_LEN, MESSAGE_PAGE_SIZE, PAGE_END_SENTINEL,
};
use huddle_core::{ChannelId, DomainError, Message, MessageId, UserId};
use tracing::instrument;

use crate::dataset::Dataset;
use crate::{Store, StoreResult};

/// One page of a reverse-chronological message listing
#[derive(Debug, Clone)]
pub struct MessagePage {
    /// Newest first
    pub messages: Vec<Message>,
    pub start: usize,
    /// `start + 50`, or `-1` when this page reaches the oldest message
    pub end: i64,
}

impl Store {
    /// Append a message to a channel's log.
    ///
    /// Returns `Ok(None)` for empty text: the call succeeds but nothing is
    /// stored and no id is consumed. A long-standing caller-visible quirk,
    /// kept deliberately.
    #[instrument(skip(self, text))]
    pub fn send_message(
        &self,
        author_id: UserId,
        channel_id: ChannelId,
        text: String,
    ) -> StoreResult<Option<MessageId>> {
        if text.chars().count() > MAX_MESSAGE_LEN {
            return Err(DomainError::MessageTooLong {
                max: MAX_MESSAGE_LEN,
            });
        }
        if text.is_empty() {
            return Ok(None);
        }

        let mut ds = self.inner.lock();
        ds.require_channel(channel_id)?;
        ds.require_member(author_id, channel_id)?;

        let id = ds.alloc_message_id();
        ds.append_message(Message::new(id, channel_id, author_id, text, Utc::now()));
        tracing::info!(message_id = %id, channel = %channel_id, "message sent");
        Ok(Some(id))
    }

    /// One page of a channel's log, newest first. Requires membership.
    pub fn list_messages(
        &self,
        actor_id: UserId,
        channel_id: ChannelId,
        start: usize,
    ) -> StoreResult<MessagePage> {
        let ds = self.inner.lock();
        ds.require_channel(channel_id)?;
        ds.require_member(actor_id, channel_id)?;

        let log = ds.logs.get(&channel_id);
        let total = log.map_or(0, |l| l.messages.len());
        if start > total {
            return Err(DomainError::StartBeyondHistory {
                start,
                count: total,
            });
        }

        let messages: Vec<Message> = log
            .map(|l| {
                l.messages
                    .iter()
                    .rev()
                    .skip(start)
                    .take(MESSAGE_PAGE_SIZE)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let end = if total - start <= MESSAGE_PAGE_SIZE {
            PAGE_END_SENTINEL
        } else {
            (start + MESSAGE_PAGE_SIZE) as i64
        };

        Ok(MessagePage {
            messages,
            start,
            end,
        })
    }

    /// Fetch a single message by id
    pub fn message(&self, message_id: MessageId) -> StoreResult<Message> {
        let ds = self.inner.lock();
        ds.message(message_id).cloned()
    }

    /// Remove a message. Allowed for the author, a channel owner, or a
    /// global owner.
    #[instrument(skip(self))]
    pub fn remove_message(&self, actor_id: UserId, message_id: MessageId) -> StoreResult<()> {
        let mut ds = self.inner.lock();
        let channel_id = ds.require_message_channel(message_id)?;
        require_author_or_elevated(&ds, actor_id, message_id, channel_id)?;

        remove_locked(&mut ds, message_id, channel_id);
        tracing::info!(message_id = %message_id, "message removed");
        Ok(())
    }

    /// Edit a message's text, resetting its timestamp. Same authorization as
    /// removal plus current membership in the message's channel. Empty text
    /// removes the message instead.
    #[instrument(skip(self, text))]
    pub fn edit_message(
        &self,
        actor_id: UserId,
        message_id: MessageId,
        text: String,
    ) -> StoreResult<()> {
        let mut ds = self.inner.lock();
        let channel_id = ds.require_message_channel(message_id)?;
        ds.require_member(actor_id, channel_id)?;
        require_author_or_elevated(&ds, actor_id, message_id, channel_id)?;

        if text.is_empty() {
            remove_locked(&mut ds, message_id, channel_id);
            tracing::info!(message_id = %message_id, "message removed via empty edit");
        } else {
            ds.message_mut(message_id)?.edit(text, Utc::now());
            tracing::info!(message_id = %message_id, "message edited");
        }
        Ok(())
    }

    /// Add a reaction of the given kind. Requires membership in the
    /// message's channel; double-reacting is rejected.
    #[instrument(skip(self))]
    pub fn react(&self, actor_id: UserId, message_id: MessageId, kind: u8) -> StoreResult<()> {
        let mut ds = self.inner.lock();
        let channel_id = ds.require_message_channel(message_id)?;
        ds.require_member(actor_id, channel_id)?;
        if !is_supported_react_kind(kind) {
            return Err(DomainError::InvalidReactKind(kind));
        }

        let slot = ds
            .message_mut(message_id)?
            .reaction_slot_mut(kind)
            .ok_or(DomainError::InvalidReactKind(kind))?;
        if slot.add(actor_id) {
            Ok(())
        } else {
            Err(DomainError::AlreadyReacted)
        }
    }

    /// Withdraw a reaction of the given kind.
    #[instrument(skip(self))]
    pub fn unreact(&self, actor_id: UserId, message_id: MessageId, kind: u8) -> StoreResult<()> {
        let mut ds = self.inner.lock();
        let channel_id = ds.require_message_channel(message_id)?;
        ds.require_member(actor_id, channel_id)?;
        if !is_supported_react_kind(kind) {
            return Err(DomainError::InvalidReactKind(kind));
        }

        let slot = ds
            .message_mut(message_id)?
            .reaction_slot_mut(kind)
            .ok_or(DomainError::InvalidReactKind(kind))?;
        if slot.remove(actor_id) {
            Ok(())
        } else {
            Err(DomainError::NotReacted)
        }
    }

    /// Pin a message. Requires membership and elevated rights.
    #[instrument(skip(self))]
    pub fn pin(&self, actor_id: UserId, message_id: MessageId) -> StoreResult<()> {
        self.set_pinned(actor_id, message_id, true)
    }

    /// Unpin a message. Requires membership and elevated rights.
    #[instrument(skip(self))]
    pub fn unpin(&self, actor_id: UserId, message_id: MessageId) -> StoreResult<()> {
        self.set_pinned(actor_id, message_id, false)
    }

    fn set_pinned(&self, actor_id: UserId, message_id: MessageId, pinned: bool) -> StoreResult<()> {
        let mut ds = self.inner.lock();
        let channel_id = ds.require_message_channel(message_id)?;
        ds.require_member(actor_id, channel_id)?;

        let channel = ds.require_channel(channel_id)?;
        if !ds.has_elevated_rights(actor_id, channel) {
            return Err(DomainError::NotChannelOwner);
        }

        let message = ds.message_mut(message_id)?;
        if message.is_pinned == pinned {
            return Err(if pinned {
                DomainError::AlreadyPinned
            } else {
                DomainError::NotPinned
            });
        }
        message.is_pinned = pinned;
        Ok(())
    }

    /// Validate a deferred send and reserve its message id. Authorization is
    /// captured here, at schedule time; the timer that later appends does
    /// not re-check it.
    #[instrument(skip(self, text))]
    pub fn reserve_scheduled(
        &self,
        author_id: UserId,
        channel_id: ChannelId,
        text: &str,
    ) -> StoreResult<MessageId> {
        let mut ds = self.inner.lock();
        ds.require_channel(channel_id)?;
        ds.require_member(author_id, channel_id)?;
        if text.chars().count() > MAX_MESSAGE_LEN {
            return Err(DomainError::MessageTooLong {
                max: MAX_MESSAGE_LEN,
            });
        }
        Ok(ds.alloc_message_id())
    }

    /// Timer-side append of a previously reserved message. A silent no-op if
    /// the channel no longer exists - there is no caller left to report to.
    #[instrument(skip(self, text))]
    pub fn append_scheduled(
        &self,
        message_id: MessageId,
        channel_id: ChannelId,
        author_id: UserId,
        text: String,
        sent_at: DateTime<Utc>,
    ) {
        let mut ds = self.inner.lock();
        if !ds.channels.contains_key(&channel_id) {
            tracing::debug!(message_id = %message_id, channel = %channel_id,
                "scheduled send target gone; dropping");
            return;
        }
        ds.append_message(Message::new(
            message_id, channel_id, author_id, text, sent_at,
        ));
        tracing::info!(message_id = %message_id, channel = %channel_id, "scheduled message delivered");
    }

    /// All messages the user can reach whose text contains the query, in
    /// channel-creation then log order. An empty query matches nothing.
    pub fn search(&self, actor_id: UserId, query: &str) -> StoreResult<Vec<Message>> {
        let ds = self.inner.lock();
        ds.require_user(actor_id)?;
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut results = Vec::new();
        for channel_id in &ds.channel_order {
            let member = ds
                .channels
                .get(channel_id)
                .is_some_and(|c| c.is_member(actor_id));
            if !member {
                continue;
            }
            if let Some(log) = ds.logs.get(channel_id) {
                results.extend(
                    log.messages
                        .iter()
                        .filter(|m| m.text.contains(query))
                        .cloned(),
                );
            }
        }
        Ok(results)
    }
}

/// Author, channel owner, or global owner may modify a message.
fn require_author_or_elevated(
    ds: &Dataset,
    actor_id: UserId,
    message_id: MessageId,
    channel_id: ChannelId,
) -> Result<(), DomainError> {
    let author_id = ds.message(message_id)?.author_id;
    let channel = ds.require_channel(channel_id)?;
    if author_id == actor_id || ds.has_elevated_rights(actor_id, channel) {
        Ok(())
    } else {
        Err(DomainError::NotMessageAuthor)
    }
}

/// Drop a message from its log and the global index.
fn remove_locked(ds: &mut Dataset, message_id: MessageId, channel_id: ChannelId) {
    ds.message_index.remove(&message_id);
    if let Some(log) = ds.logs.get_mut(&channel_id) {
        log.messages.retain(|m| m.id != message_id);
    }
}
