//! Standup aggregation: a per-channel timed window that buffers raw lines
//! and emits exactly one composed message when the window closes.
//!
//! The store records the window and the buffer; the service layer owns the
//! one-shot timer that calls [`Store::standup_flush`] at the deadline.

use chrono::{DateTime, Utc};
use huddle_core::limits::MAX_MESSAGE_LEN;
use huddle_core::{ChannelId, DomainError, Message, UserId};
use tracing::instrument;

use crate::{Store, StoreResult};

impl Store {
    /// Open a standup window closing at `finish`. Fails if one is already
    /// open. Requires membership.
    #[instrument(skip(self))]
    pub fn standup_start(
        &self,
        actor_id: UserId,
        channel_id: ChannelId,
        finish: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut ds = self.inner.lock();
        ds.require_channel(channel_id)?;
        ds.require_member(actor_id, channel_id)?;

        let now = Utc::now();
        let channel = ds.require_channel_mut(channel_id)?;
        if channel.standup_active_at(now) {
            return Err(DomainError::StandupAlreadyActive);
        }
        channel.standup_finish = Some(finish);
        tracing::info!(channel = %channel_id, %finish, "standup started");
        Ok(())
    }

    /// When the open standup window closes, if one is open. Requires
    /// membership.
    pub fn standup_status(
        &self,
        actor_id: UserId,
        channel_id: ChannelId,
    ) -> StoreResult<Option<DateTime<Utc>>> {
        let ds = self.inner.lock();
        ds.require_channel(channel_id)?;
        ds.require_member(actor_id, channel_id)?;

        let channel = ds.require_channel(channel_id)?;
        let now = Utc::now();
        Ok(channel.standup_finish.filter(|&finish| now < finish))
    }

    /// Buffer one standup line as `"<handle>: <line>"`. Requires membership
    /// and an open window; rejects empty and over-long lines.
    #[instrument(skip(self, line))]
    pub fn standup_record_line(
        &self,
        actor_id: UserId,
        channel_id: ChannelId,
        line: &str,
    ) -> StoreResult<()> {
        let mut ds = self.inner.lock();
        ds.require_channel(channel_id)?;
        ds.require_member(actor_id, channel_id)?;

        let now = Utc::now();
        let active = ds
            .require_channel(channel_id)?
            .standup_active_at(now);
        if !active {
            return Err(DomainError::StandupNotActive);
        }
        if line.chars().count() > MAX_MESSAGE_LEN {
            return Err(DomainError::MessageTooLong {
                max: MAX_MESSAGE_LEN,
            });
        }
        if line.is_empty() {
            return Err(DomainError::EmptyMessage);
        }

        let handle = ds.require_user(actor_id)?.handle.clone();
        if let Some(log) = ds.logs.get_mut(&channel_id) {
            if !log.standup_buffer.is_empty() {
                log.standup_buffer.push('\n');
            }
            log.standup_buffer.push_str(&handle);
            log.standup_buffer.push_str(": ");
            log.standup_buffer.push_str(line);
        }
        Ok(())
    }

    /// Timer-side close of a standup window: emit the buffered lines as one
    /// message authored by the user who started the standup, timestamped at
    /// the recorded close instant. A silent no-op when the channel is gone;
    /// an empty buffer produces no message.
    #[instrument(skip(self))]
    pub fn standup_flush(
        &self,
        channel_id: ChannelId,
        starter_id: UserId,
        finish: DateTime<Utc>,
    ) {
        let mut ds = self.inner.lock();
        if !ds.channels.contains_key(&channel_id) {
            tracing::debug!(channel = %channel_id, "standup target gone; dropping buffer");
            return;
        }

        let buffer = ds
            .logs
            .get_mut(&channel_id)
            .map(|log| std::mem::take(&mut log.standup_buffer))
            .unwrap_or_default();
        if buffer.is_empty() {
            return;
        }

        let id = ds.alloc_message_id();
        ds.append_message(Message::new(id, channel_id, starter_id, buffer, finish));
        tracing::info!(channel = %channel_id, message_id = %id, "standup flushed");
    }
}
