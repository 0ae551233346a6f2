//! Authentication service
//!
//! Handles user registration, login, and logout. Registration derives the
//! unique handle and grants the first account the global owner role (both
//! inside the store's atomic registration op); both registration and login
//! leave the user with an active session token.

use huddle_common::{hash_password, validate_password_strength};
use huddle_core::DomainError;
use huddle_store::NewUser;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dto::{AuthResponse, LoginRequest, LogoutResponse, RegisterRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::user::is_valid_name;

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new user and log them in
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        request.validate()?;
        if !is_valid_name(&request.name_first) || !is_valid_name(&request.name_last) {
            return Err(ServiceError::Domain(DomainError::InvalidName));
        }
        validate_password_strength(&request.password)?;

        let password_hash = hash_password(&request.password)?;
        let user = self.ctx.store().create_user(NewUser {
            email: request.email,
            password_hash,
            name_first: request.name_first,
            name_last: request.name_last,
        })?;

        let fresh = self.ctx.tokens().issue(user.id, &user.email)?;
        let token = self.ctx.store().activate_session(user.id, fresh)?;

        info!(user_id = %user.id, "user registered");
        Ok(AuthResponse {
            user_id: user.id,
            token,
        })
    }

    /// Log in with email and password.
    ///
    /// Logging in while already logged in returns the existing token.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        request.validate()?;

        let user = self
            .ctx
            .store()
            .find_user_by_email(&request.email)
            .ok_or_else(|| {
                warn!("login failed: unknown email");
                ServiceError::App(huddle_common::AppError::InvalidCredentials)
            })?;

        self.ctx
            .passwords()
            .verify_or_error(&request.password, &user.password_hash)?;

        let fresh = self.ctx.tokens().issue(user.id, &user.email)?;
        let token = self.ctx.store().activate_session(user.id, fresh)?;

        info!(user_id = %user.id, "user logged in");
        Ok(AuthResponse {
            user_id: user.id,
            token,
        })
    }

    /// Invalidate an active session token.
    ///
    /// Never fails: returns whether a session was actually ended.
    #[instrument(skip(self, token))]
    pub fn logout(&self, token: &str) -> LogoutResponse {
        LogoutResponse {
            is_success: self.ctx.store().end_session(token),
        }
    }
}
