//! Message service
//!
//! Ordinary sends, paginated reads, edits, removals, reactions, pins, and
//! deferred ("send later") delivery.
//!
//! Deferred delivery reserves the message id and captures authorization at
//! call time, then hands the append to a detached one-shot timer. The timer
//! re-enters the store like any other concurrent caller and silently drops
//! the message if the channel has since disappeared.

use chrono::{DateTime, Utc};
use huddle_core::{ChannelId, DomainError, MessageId, UserId};
use tracing::{info, instrument};

use crate::dto::{MessagePageResponse, SendLaterResponse, SendMessageResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Send a message to a channel.
    ///
    /// Command-shaped text (matching a registered hook prefix) is rewritten
    /// by its hook before storage. Empty text succeeds without storing
    /// anything.
    #[instrument(skip(self, token, text))]
    pub fn send(
        &self,
        token: &str,
        channel_id: ChannelId,
        text: String,
    ) -> ServiceResult<SendMessageResponse> {
        let actor = self.ctx.resolve(token)?;
        let text = self.apply_hooks(actor, channel_id, text);
        let message_id = self.ctx.store().send_message(actor, channel_id, text)?;
        Ok(SendMessageResponse { message_id })
    }

    /// One page (50 messages) of a channel's log, newest first, with
    /// reaction slots annotated for the caller
    pub fn list(
        &self,
        token: &str,
        channel_id: ChannelId,
        start: usize,
    ) -> ServiceResult<MessagePageResponse> {
        let actor = self.ctx.resolve(token)?;
        let page = self.ctx.store().list_messages(actor, channel_id, start)?;
        Ok(MessagePageResponse::for_viewer(page, actor))
    }

    /// Edit a message; empty text removes it instead
    #[instrument(skip(self, token, text))]
    pub fn edit(&self, token: &str, message_id: MessageId, text: String) -> ServiceResult<()> {
        let actor = self.ctx.resolve(token)?;
        self.ctx.store().edit_message(actor, message_id, text)?;
        Ok(())
    }

    /// Remove a message
    #[instrument(skip(self, token))]
    pub fn remove(&self, token: &str, message_id: MessageId) -> ServiceResult<()> {
        let actor = self.ctx.resolve(token)?;
        self.ctx.store().remove_message(actor, message_id)?;
        Ok(())
    }

    /// Add a reaction
    #[instrument(skip(self, token))]
    pub fn react(&self, token: &str, message_id: MessageId, kind: u8) -> ServiceResult<()> {
        let actor = self.ctx.resolve(token)?;
        self.ctx.store().react(actor, message_id, kind)?;
        Ok(())
    }

    /// Withdraw a reaction
    #[instrument(skip(self, token))]
    pub fn unreact(&self, token: &str, message_id: MessageId, kind: u8) -> ServiceResult<()> {
        let actor = self.ctx.resolve(token)?;
        self.ctx.store().unreact(actor, message_id, kind)?;
        Ok(())
    }

    /// Pin a message
    #[instrument(skip(self, token))]
    pub fn pin(&self, token: &str, message_id: MessageId) -> ServiceResult<()> {
        let actor = self.ctx.resolve(token)?;
        self.ctx.store().pin(actor, message_id)?;
        Ok(())
    }

    /// Unpin a message
    #[instrument(skip(self, token))]
    pub fn unpin(&self, token: &str, message_id: MessageId) -> ServiceResult<()> {
        let actor = self.ctx.resolve(token)?;
        self.ctx.store().unpin(actor, message_id)?;
        Ok(())
    }

    /// Schedule a message for delivery at a future instant.
    ///
    /// Membership, length, and the deadline are validated now; the reserved
    /// id is returned immediately and the append happens when the deadline
    /// elapses. Must be called within a tokio runtime.
    #[instrument(skip(self, token, text))]
    pub fn send_later(
        &self,
        token: &str,
        channel_id: ChannelId,
        text: String,
        send_at: DateTime<Utc>,
    ) -> ServiceResult<SendLaterResponse> {
        let actor = self.ctx.resolve(token)?;

        let now = Utc::now();
        if send_at <= now {
            return Err(ServiceError::Domain(DomainError::TimeInPast));
        }
        let message_id = self
            .ctx
            .store()
            .reserve_scheduled(actor, channel_id, &text)?;

        let store = self.ctx.store_arc();
        let delay = (send_at - now).to_std().unwrap_or_default();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            store.append_scheduled(message_id, channel_id, actor, text, send_at);
        });

        info!(message_id = %message_id, channel = %channel_id, %send_at, "send scheduled");
        Ok(SendLaterResponse { message_id })
    }

    /// Run the first matching command hook over outgoing text
    fn apply_hooks(&self, actor: UserId, channel_id: ChannelId, text: String) -> String {
        for hook in self.ctx.hooks() {
            if text.starts_with(hook.prefix()) {
                return hook.on_send(actor, channel_id, &text);
            }
        }
        text
    }
}
