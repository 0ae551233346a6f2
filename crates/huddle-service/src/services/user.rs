//! User profile service
//!
//! Profile reads and edits: names, email, handle, and the full user listing.

use huddle_core::limits::{MAX_NAME_LEN, MIN_NAME_LEN};
use huddle_core::{DomainError, UserId};
use tracing::instrument;
use validator::ValidateEmail;

use crate::dto::UserProfileResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Names may contain letters, spaces, and dashes, 1-50 characters.
pub(crate) fn is_valid_name(name: &str) -> bool {
    let len = name.chars().count();
    (MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len)
        && name.chars().all(|c| c.is_alphabetic() || c == ' ' || c == '-')
}

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Public profile of any user
    pub fn profile(&self, token: &str, user_id: UserId) -> ServiceResult<UserProfileResponse> {
        self.ctx.resolve(token)?;
        let user = self.ctx.store().user(user_id)?;
        Ok(UserProfileResponse::from(&user))
    }

    /// Every profile, in registration order
    pub fn all(&self, token: &str) -> ServiceResult<Vec<UserProfileResponse>> {
        self.ctx.resolve(token)?;
        Ok(self
            .ctx
            .store()
            .all_users()
            .iter()
            .map(UserProfileResponse::from)
            .collect())
    }

    /// Update the caller's first and last name
    #[instrument(skip(self, token, name_first, name_last))]
    pub fn set_name(&self, token: &str, name_first: String, name_last: String) -> ServiceResult<()> {
        let actor = self.ctx.resolve(token)?;
        if !is_valid_name(&name_first) || !is_valid_name(&name_last) {
            return Err(ServiceError::Domain(DomainError::InvalidName));
        }
        self.ctx.store().set_user_name(actor, name_first, name_last)?;
        Ok(())
    }

    /// Update the caller's email address
    #[instrument(skip(self, token, email))]
    pub fn set_email(&self, token: &str, email: String) -> ServiceResult<()> {
        let actor = self.ctx.resolve(token)?;
        if !email.validate_email() {
            return Err(ServiceError::Domain(DomainError::InvalidEmail));
        }
        self.ctx.store().set_user_email(actor, email)?;
        Ok(())
    }

    /// Update the caller's display handle
    #[instrument(skip(self, token, handle))]
    pub fn set_handle(&self, token: &str, handle: String) -> ServiceResult<()> {
        let actor = self.ctx.resolve(token)?;
        self.ctx.store().set_user_handle(actor, handle)?;
        Ok(())
    }
}
