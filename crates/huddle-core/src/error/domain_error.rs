//! Domain errors - error types for the domain layer
//!
//! Every failure a core operation can produce falls into one of four kinds,
//! exposed through the `is_*` predicates: unauthorized, not-found,
//! invalid-argument, and forbidden. The glue layer maps those kinds to its
//! transport's status scheme.

use thiserror::Error;

use crate::value_objects::{ChannelId, MessageId, UserId};

/// Domain layer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // =========================================================================
    // Unauthorized
    // =========================================================================
    #[error("Invalid or inactive session token")]
    InvalidToken,

    // =========================================================================
    // Not Found
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Channel not found: {0}")]
    ChannelNotFound(ChannelId),

    #[error("Message not found: {0}")]
    MessageNotFound(MessageId),

    // =========================================================================
    // Invalid Argument
    // =========================================================================
    #[error("Channel name too long: max {max} characters")]
    NameTooLong { max: usize },

    #[error("Message too long: max {max} characters")]
    MessageTooLong { max: usize },

    #[error("Message is empty")]
    EmptyMessage,

    #[error("Start {start} exceeds message count {count}")]
    StartBeyondHistory { start: usize, count: usize },

    #[error("Unsupported reaction kind: {0}")]
    InvalidReactKind(u8),

    #[error("Message already reacted by this user")]
    AlreadyReacted,

    #[error("No active reaction from this user")]
    NotReacted,

    #[error("Message already pinned")]
    AlreadyPinned,

    #[error("Message is not pinned")]
    NotPinned,

    #[error("User is already a channel owner")]
    AlreadyOwner,

    #[error("User is not a channel owner")]
    NotAnOwner,

    #[error("Scheduled time is in the past")]
    TimeInPast,

    #[error("A standup is already active in this channel")]
    StandupAlreadyActive,

    #[error("No standup is active in this channel")]
    StandupNotActive,

    #[error("Another timed activity is active in this channel: {0}")]
    ExclusiveActivityActive(String),

    #[error("Command '{0}' cannot be sent as a standup line")]
    CommandNotAllowed(String),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Email already in use")]
    EmailTaken,

    #[error("Invalid first or last name")]
    InvalidName,

    #[error("Password too short: min {min} characters")]
    WeakPassword { min: usize },

    #[error("Handle must be {min}-{max} characters")]
    InvalidHandle { min: usize, max: usize },

    #[error("Handle already in use: {0}")]
    HandleTaken(String),

    #[error("Unknown permission id: {0}")]
    InvalidPermission(u8),

    // =========================================================================
    // Forbidden
    // =========================================================================
    #[error("User {user} is not a member of channel {channel}")]
    NotMember { user: UserId, channel: ChannelId },

    #[error("User is not a channel owner or global owner")]
    NotChannelOwner,

    #[error("User is not the message author, a channel owner, or a global owner")]
    NotMessageAuthor,

    #[error("Channel is private and user is not a global owner")]
    PrivateChannel,

    #[error("User is not a global owner")]
    NotGlobalOwner,
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidToken => "INVALID_TOKEN",

            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::ChannelNotFound(_) => "UNKNOWN_CHANNEL",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",

            Self::NameTooLong { .. } => "NAME_TOO_LONG",
            Self::MessageTooLong { .. } => "MESSAGE_TOO_LONG",
            Self::EmptyMessage => "EMPTY_MESSAGE",
            Self::StartBeyondHistory { .. } => "START_BEYOND_HISTORY",
            Self::InvalidReactKind(_) => "INVALID_REACT_KIND",
            Self::AlreadyReacted => "ALREADY_REACTED",
            Self::NotReacted => "NOT_REACTED",
            Self::AlreadyPinned => "ALREADY_PINNED",
            Self::NotPinned => "NOT_PINNED",
            Self::AlreadyOwner => "ALREADY_OWNER",
            Self::NotAnOwner => "NOT_AN_OWNER",
            Self::TimeInPast => "TIME_IN_PAST",
            Self::StandupAlreadyActive => "STANDUP_ALREADY_ACTIVE",
            Self::StandupNotActive => "STANDUP_NOT_ACTIVE",
            Self::ExclusiveActivityActive(_) => "ACTIVITY_ACTIVE",
            Self::CommandNotAllowed(_) => "COMMAND_NOT_ALLOWED",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::InvalidName => "INVALID_NAME",
            Self::WeakPassword { .. } => "WEAK_PASSWORD",
            Self::InvalidHandle { .. } => "INVALID_HANDLE",
            Self::HandleTaken(_) => "HANDLE_TAKEN",
            Self::InvalidPermission(_) => "INVALID_PERMISSION",

            Self::NotMember { .. } => "NOT_MEMBER",
            Self::NotChannelOwner => "NOT_CHANNEL_OWNER",
            Self::NotMessageAuthor => "NOT_MESSAGE_AUTHOR",
            Self::PrivateChannel => "PRIVATE_CHANNEL",
            Self::NotGlobalOwner => "NOT_GLOBAL_OWNER",
        }
    }

    /// Bad, expired, or absent credentials
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::InvalidToken)
    }

    /// Reference to an id that does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::ChannelNotFound(_) | Self::MessageNotFound(_)
        )
    }

    /// Authenticated but lacking rights for the operation
    pub fn is_forbidden(&self) -> bool {
        matches!(
            self,
            Self::NotMember { .. }
                | Self::NotChannelOwner
                | Self::NotMessageAuthor
                | Self::PrivateChannel
                | Self::NotGlobalOwner
        )
    }

    /// Malformed input or an invalid state transition
    pub fn is_invalid_argument(&self) -> bool {
        !self.is_unauthorized() && !self.is_not_found() && !self.is_forbidden()
    }
}
