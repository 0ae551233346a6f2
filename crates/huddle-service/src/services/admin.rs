//! Admin service
//!
//! Global role management: only global owners may change another user's
//! global permission.

use huddle_core::{DomainError, GlobalRole, UserId};
use tracing::instrument;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Admin service
pub struct AdminService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AdminService<'a> {
    /// Create a new AdminService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Set a user's global permission by numeric id (1 = owner, 2 = member)
    #[instrument(skip(self, token))]
    pub fn change_permission(
        &self,
        token: &str,
        target_id: UserId,
        permission_id: u8,
    ) -> ServiceResult<()> {
        let actor = self.ctx.resolve(token)?;
        let role = GlobalRole::from_u8(permission_id)
            .ok_or(ServiceError::Domain(DomainError::InvalidPermission(
                permission_id,
            )))?;
        self.ctx.store().set_global_role(actor, target_id, role)?;
        Ok(())
    }
}
