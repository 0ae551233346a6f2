//! Test helpers
//!
//! `TestApp` wraps a fresh `ServiceContext` over an empty store and exposes
//! the per-concern services the way the glue layer would construct them.

use huddle_common::AppConfig;
use huddle_core::ChannelId;
use huddle_service::dto::{AuthResponse, CreateChannelRequest};
use huddle_service::{
    AdminService, AuthService, ChannelService, MessageService, SearchService, ServiceContext,
    StandupService, UserService,
};

use crate::fixtures::register_request;

/// One isolated application instance per test
pub struct TestApp {
    pub ctx: ServiceContext,
}

impl TestApp {
    /// Start an app over a fresh store
    #[must_use]
    pub fn new() -> Self {
        huddle_common::try_init_tracing().ok();
        Self {
            ctx: ServiceContext::new(&AppConfig::for_tests()),
        }
    }

    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(&self.ctx)
    }

    pub fn users(&self) -> UserService<'_> {
        UserService::new(&self.ctx)
    }

    pub fn admin(&self) -> AdminService<'_> {
        AdminService::new(&self.ctx)
    }

    pub fn channels(&self) -> ChannelService<'_> {
        ChannelService::new(&self.ctx)
    }

    pub fn messages(&self) -> MessageService<'_> {
        MessageService::new(&self.ctx)
    }

    pub fn standups(&self) -> StandupService<'_> {
        StandupService::new(&self.ctx)
    }

    pub fn search(&self) -> SearchService<'_> {
        SearchService::new(&self.ctx)
    }

    /// Register a user with a unique email and return their session
    pub fn register(&self, name_first: &str, name_last: &str) -> AuthResponse {
        self.auth()
            .register(register_request(name_first, name_last))
            .expect("registration failed")
    }

    /// Create a channel and return its id
    pub fn create_channel(&self, token: &str, name: &str, is_public: bool) -> ChannelId {
        self.channels()
            .create(
                token,
                CreateChannelRequest {
                    name: name.to_string(),
                    is_public,
                },
            )
            .expect("channel creation failed")
            .channel_id
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
