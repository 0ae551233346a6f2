//! Channel service
//!
//! Channel lifecycle and membership, driven by the caller's session token.
//! All invariant-preserving work happens inside the store's atomic
//! operations; this layer resolves identity and shapes responses.

use huddle_core::{ChannelId, UserId, Visibility};
use tracing::instrument;
use validator::Validate;

use crate::dto::{
    ChannelCreatedResponse, ChannelDetailsResponse, ChannelSummary, CreateChannelRequest,
};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Channel service
pub struct ChannelService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChannelService<'a> {
    /// Create a new ChannelService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a channel owned by the caller
    #[instrument(skip(self, token, request), fields(name = %request.name))]
    pub fn create(
        &self,
        token: &str,
        request: CreateChannelRequest,
    ) -> ServiceResult<ChannelCreatedResponse> {
        request.validate()?;
        let actor = self.ctx.resolve(token)?;
        let channel_id = self.ctx.store().create_channel(
            actor,
            request.name,
            Visibility::from_is_public(request.is_public),
        )?;
        Ok(ChannelCreatedResponse { channel_id })
    }

    /// Channels the caller belongs to, in creation order
    pub fn list(&self, token: &str) -> ServiceResult<Vec<ChannelSummary>> {
        let actor = self.ctx.resolve(token)?;
        Ok(self
            .ctx
            .store()
            .channels_of(actor)?
            .iter()
            .map(ChannelSummary::from)
            .collect())
    }

    /// Every channel, in creation order, regardless of membership
    pub fn list_all(&self, token: &str) -> ServiceResult<Vec<ChannelSummary>> {
        self.ctx.resolve(token)?;
        Ok(self
            .ctx
            .store()
            .all_channels()
            .iter()
            .map(ChannelSummary::from)
            .collect())
    }

    /// Channel details with member profiles. Requires membership.
    pub fn details(&self, token: &str, channel_id: ChannelId) -> ServiceResult<ChannelDetailsResponse> {
        let actor = self.ctx.resolve(token)?;
        let details = self.ctx.store().channel_details(actor, channel_id)?;
        Ok(ChannelDetailsResponse::from(details))
    }

    /// Invite a user; they are added immediately
    #[instrument(skip(self, token))]
    pub fn invite(&self, token: &str, channel_id: ChannelId, target_id: UserId) -> ServiceResult<()> {
        let actor = self.ctx.resolve(token)?;
        self.ctx.store().invite(actor, channel_id, target_id)?;
        Ok(())
    }

    /// Join a channel
    #[instrument(skip(self, token))]
    pub fn join(&self, token: &str, channel_id: ChannelId) -> ServiceResult<()> {
        let actor = self.ctx.resolve(token)?;
        self.ctx.store().join(actor, channel_id)?;
        Ok(())
    }

    /// Leave a channel
    #[instrument(skip(self, token))]
    pub fn leave(&self, token: &str, channel_id: ChannelId) -> ServiceResult<()> {
        let actor = self.ctx.resolve(token)?;
        self.ctx.store().leave(actor, channel_id)?;
        Ok(())
    }

    /// Grant channel ownership to a user
    #[instrument(skip(self, token))]
    pub fn add_owner(&self, token: &str, channel_id: ChannelId, target_id: UserId) -> ServiceResult<()> {
        let actor = self.ctx.resolve(token)?;
        self.ctx.store().add_owner(actor, channel_id, target_id)?;
        Ok(())
    }

    /// Revoke a user's channel ownership
    #[instrument(skip(self, token))]
    pub fn remove_owner(
        &self,
        token: &str,
        channel_id: ChannelId,
        target_id: UserId,
    ) -> ServiceResult<()> {
        let actor = self.ctx.resolve(token)?;
        self.ctx.store().remove_owner(actor, channel_id, target_id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::RegisterRequest;
    use crate::services::{AuthService, ServiceError};
    use huddle_common::AppConfig;
    use huddle_core::DomainError;

    fn register(ctx: &ServiceContext, email: &str, first: &str) -> (String, UserId) {
        let auth = AuthService::new(ctx)
            .register(RegisterRequest {
                email: email.into(),
                password: "hunter2".into(),
                name_first: first.into(),
                name_last: "Person".into(),
            })
            .unwrap();
        (auth.token, auth.user_id)
    }

    fn create(ctx: &ServiceContext, token: &str, name: &str, is_public: bool) -> ChannelId {
        ChannelService::new(ctx)
            .create(
                token,
                CreateChannelRequest {
                    name: name.into(),
                    is_public,
                },
            )
            .unwrap()
            .channel_id
    }

    #[test]
    fn test_create_list_and_details() {
        let ctx = ServiceContext::new(&AppConfig::for_tests());
        let (ada, _) = register(&ctx, "a@example.com", "Ada");
        let (grace, _) = register(&ctx, "b@example.com", "Grace");
        let service = ChannelService::new(&ctx);

        let ch = create(&ctx, &ada, "general", true);
        create(&ctx, &grace, "other", true);

        let mine = service.list(&ada).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].name, "general");
        assert_eq!(service.list_all(&ada).unwrap().len(), 2);

        let details = service.details(&ada, ch).unwrap();
        assert_eq!(details.name, "general");
        assert_eq!(details.owner_members.len(), 1);
        assert_eq!(details.all_members.len(), 1);
        assert_eq!(details.all_members[0].name_first, "Ada");

        // non-member cannot read details
        assert!(matches!(
            service.details(&grace, ch).unwrap_err(),
            ServiceError::Domain(DomainError::NotMember { .. })
        ));
    }

    #[test]
    fn test_create_rejects_long_name_at_request_validation() {
        let ctx = ServiceContext::new(&AppConfig::for_tests());
        let (ada, _) = register(&ctx, "a@example.com", "Ada");
        let err = ChannelService::new(&ctx)
            .create(
                &ada,
                CreateChannelRequest {
                    name: "x".repeat(21),
                    is_public: true,
                },
            )
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn test_invite_leave_flow() {
        let ctx = ServiceContext::new(&AppConfig::for_tests());
        let (ada, ada_id) = register(&ctx, "a@example.com", "Ada");
        let (grace, grace_id) = register(&ctx, "b@example.com", "Grace");
        let service = ChannelService::new(&ctx);

        let ch = create(&ctx, &ada, "general", true);
        service.invite(&ada, ch, grace_id).unwrap();

        // B leaves; A remains sole owner and member
        service.leave(&grace, ch).unwrap();
        let details = service.details(&ada, ch).unwrap();
        assert_eq!(details.all_members.len(), 1);
        assert_eq!(details.owner_members[0].user_id, ada_id);

        // sole member leaves; the channel ceases to exist
        service.leave(&ada, ch).unwrap();
        assert!(matches!(
            service.join(&grace, ch).unwrap_err(),
            ServiceError::Domain(DomainError::ChannelNotFound(_))
        ));
    }

    #[test]
    fn test_private_join_and_owner_management() {
        let ctx = ServiceContext::new(&AppConfig::for_tests());
        let (_ada, _) = register(&ctx, "a@example.com", "Ada"); // global owner
        let (grace, _) = register(&ctx, "b@example.com", "Grace");
        let (edsger, edsger_id) = register(&ctx, "c@example.com", "Edsger");
        let service = ChannelService::new(&ctx);

        let ch = create(&ctx, &grace, "secret", false);
        assert!(matches!(
            service.join(&edsger, ch).unwrap_err(),
            ServiceError::Domain(DomainError::PrivateChannel)
        ));

        service.invite(&grace, ch, edsger_id).unwrap();
        service.add_owner(&grace, ch, edsger_id).unwrap();
        service.remove_owner(&grace, ch, edsger_id).unwrap();
        assert!(matches!(
            service.remove_owner(&grace, ch, edsger_id).unwrap_err(),
            ServiceError::Domain(DomainError::NotAnOwner)
        ));
    }
}
