//! Request DTOs for the service boundary
//!
//! Multi-field inputs implement `Deserialize` and `Validate`; single-value
//! operations take plain arguments instead.

use serde::Deserialize;
use validator::Validate;

/// User registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub name_first: String,

    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub name_last: String,
}

/// User login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

/// Create channel request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateChannelRequest {
    #[validate(length(max = 20, message = "Channel name must be at most 20 characters"))]
    pub name: String,

    pub is_public: bool,
}
