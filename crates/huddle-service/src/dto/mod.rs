//! Data transfer objects for the service boundary

pub mod requests;
pub mod responses;

pub use requests::{CreateChannelRequest, LoginRequest, RegisterRequest};
pub use responses::{
    AuthResponse, ChannelCreatedResponse, ChannelDetailsResponse, ChannelSummary, LogoutResponse,
    MemberProfile, MessagePageResponse, MessageView, ReactionView, SearchResponse,
    SendLaterResponse, SendMessageResponse, StandupStartResponse, StandupStatusResponse,
    UserProfileResponse,
};
