//! Response DTOs for the service boundary
//!
//! Plain serializable views over domain entities. Message views are built
//! per-viewer so the `me` flag on each reaction slot reflects the caller.

use chrono::{DateTime, Utc};
use huddle_core::{Channel, ChannelId, Message, MessageId, User, UserId};
use huddle_store::{ChannelDetails, MessagePage};
use serde::Serialize;

/// Registration/login result
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub user_id: UserId,
    pub token: String,
}

/// Logout result
#[derive(Debug, Clone, Serialize)]
pub struct LogoutResponse {
    pub is_success: bool,
}

/// Public profile view of a user
#[derive(Debug, Clone, Serialize)]
pub struct UserProfileResponse {
    pub user_id: UserId,
    pub email: String,
    pub name_first: String,
    pub name_last: String,
    pub handle: String,
    pub avatar_url: Option<String>,
}

impl From<&User> for UserProfileResponse {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            name_first: user.name_first.clone(),
            name_last: user.name_last.clone(),
            handle: user.handle.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

/// Member entry in channel details
#[derive(Debug, Clone, Serialize)]
pub struct MemberProfile {
    pub user_id: UserId,
    pub name_first: String,
    pub name_last: String,
    pub avatar_url: Option<String>,
}

impl From<&User> for MemberProfile {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            name_first: user.name_first.clone(),
            name_last: user.name_last.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

/// Channel list entry
#[derive(Debug, Clone, Serialize)]
pub struct ChannelSummary {
    pub channel_id: ChannelId,
    pub name: String,
}

impl From<&Channel> for ChannelSummary {
    fn from(channel: &Channel) -> Self {
        Self {
            channel_id: channel.id,
            name: channel.name.clone(),
        }
    }
}

/// Channel creation result
#[derive(Debug, Clone, Serialize)]
pub struct ChannelCreatedResponse {
    pub channel_id: ChannelId,
}

/// Channel details with resolved member profiles
#[derive(Debug, Clone, Serialize)]
pub struct ChannelDetailsResponse {
    pub name: String,
    pub owner_members: Vec<MemberProfile>,
    pub all_members: Vec<MemberProfile>,
}

impl From<ChannelDetails> for ChannelDetailsResponse {
    fn from(details: ChannelDetails) -> Self {
        Self {
            name: details.name,
            owner_members: details.owner_members.iter().map(MemberProfile::from).collect(),
            all_members: details.all_members.iter().map(MemberProfile::from).collect(),
        }
    }
}

/// One reaction slot as seen by the requesting user
#[derive(Debug, Clone, Serialize)]
pub struct ReactionView {
    pub kind: u8,
    pub user_ids: Vec<UserId>,
    /// Whether the requesting user is among the reactors
    pub me: bool,
}

/// One message as seen by the requesting user
#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    pub message_id: MessageId,
    pub channel_id: ChannelId,
    pub author_id: UserId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub is_pinned: bool,
    pub reactions: Vec<ReactionView>,
}

impl MessageView {
    /// Build the viewer-specific projection of a message
    pub fn for_viewer(message: &Message, viewer: UserId) -> Self {
        Self {
            message_id: message.id,
            channel_id: message.channel_id,
            author_id: message.author_id,
            text: message.text.clone(),
            created_at: message.created_at,
            is_pinned: message.is_pinned,
            reactions: message
                .reactions
                .iter()
                .map(|slot| ReactionView {
                    kind: slot.kind,
                    user_ids: slot.user_ids.clone(),
                    me: slot.contains(viewer),
                })
                .collect(),
        }
    }
}

/// One page of a channel's log, newest first
#[derive(Debug, Clone, Serialize)]
pub struct MessagePageResponse {
    pub messages: Vec<MessageView>,
    pub start: usize,
    /// `start + 50`, or `-1` when no further page exists
    pub end: i64,
}

impl MessagePageResponse {
    pub fn for_viewer(page: MessagePage, viewer: UserId) -> Self {
        Self {
            messages: page
                .messages
                .iter()
                .map(|m| MessageView::for_viewer(m, viewer))
                .collect(),
            start: page.start,
            end: page.end,
        }
    }
}

/// Ordinary send result; `None` for the empty-text no-op
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageResponse {
    pub message_id: Option<MessageId>,
}

/// Deferred send result
#[derive(Debug, Clone, Serialize)]
pub struct SendLaterResponse {
    pub message_id: MessageId,
}

/// Standup start result
#[derive(Debug, Clone, Serialize)]
pub struct StandupStartResponse {
    pub finish_at: DateTime<Utc>,
}

/// Standup activity probe result
#[derive(Debug, Clone, Serialize)]
pub struct StandupStatusResponse {
    pub is_active: bool,
    pub finish_at: Option<DateTime<Utc>>,
}

/// Search result
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub messages: Vec<MessageView>,
}
