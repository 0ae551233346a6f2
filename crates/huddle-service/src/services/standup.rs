//! Standup service
//!
//! A per-channel timed collection window: `start` opens the window and arms
//! a one-shot flush timer, `send` buffers handle-prefixed lines, and the
//! flush emits the buffer as one ordinary message authored by whoever
//! started the window.

use chrono::Utc;
use huddle_core::{ChannelId, DomainError};
use tracing::{info, instrument};

use crate::dto::{StandupStartResponse, StandupStatusResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Standup service
pub struct StandupService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> StandupService<'a> {
    /// Create a new StandupService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Open a standup window lasting `length_seconds`, arming the one-shot
    /// flush at its close. Fails while any exclusive timed activity (a
    /// standup or a hook-driven one) is running in the channel. Must be
    /// called within a tokio runtime.
    #[instrument(skip(self, token))]
    pub fn start(
        &self,
        token: &str,
        channel_id: ChannelId,
        length_seconds: u32,
    ) -> ServiceResult<StandupStartResponse> {
        let actor = self.ctx.resolve(token)?;

        if self.ctx.store().standup_status(actor, channel_id)?.is_some() {
            return Err(ServiceError::Domain(DomainError::StandupAlreadyActive));
        }
        for hook in self.ctx.hooks() {
            if hook.is_exclusive_active(channel_id) {
                return Err(ServiceError::Domain(DomainError::ExclusiveActivityActive(
                    hook.prefix().to_string(),
                )));
            }
        }

        let finish = Utc::now() + chrono::Duration::seconds(i64::from(length_seconds));
        self.ctx.store().standup_start(actor, channel_id, finish)?;

        let store = self.ctx.store_arc();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_secs(u64::from(length_seconds))).await;
            store.standup_flush(channel_id, actor, finish);
        });

        info!(channel = %channel_id, %finish, "standup window opened");
        Ok(StandupStartResponse { finish_at: finish })
    }

    /// Whether a standup window is open, and when it closes
    pub fn active(&self, token: &str, channel_id: ChannelId) -> ServiceResult<StandupStatusResponse> {
        let actor = self.ctx.resolve(token)?;
        let finish = self.ctx.store().standup_status(actor, channel_id)?;
        Ok(StandupStatusResponse {
            is_active: finish.is_some(),
            finish_at: finish,
        })
    }

    /// Buffer one line into the open standup window. Lines addressed to a
    /// registered command hook are rejected.
    #[instrument(skip(self, token, line))]
    pub fn send(&self, token: &str, channel_id: ChannelId, line: &str) -> ServiceResult<()> {
        let actor = self.ctx.resolve(token)?;

        if self.ctx.store().standup_status(actor, channel_id)?.is_none() {
            return Err(ServiceError::Domain(DomainError::StandupNotActive));
        }
        for hook in self.ctx.hooks() {
            if line.starts_with(hook.prefix()) {
                return Err(ServiceError::Domain(DomainError::CommandNotAllowed(
                    hook.prefix().to_string(),
                )));
            }
        }

        self.ctx.store().standup_record_line(actor, channel_id, line)?;
        Ok(())
    }
}
