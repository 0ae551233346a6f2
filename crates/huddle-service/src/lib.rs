//! # huddle-service
//!
//! Application layer containing business logic, services, and DTOs.
//!
//! Every public operation takes the caller's raw session token, resolves it
//! through the identity resolver first, and then drives the store's atomic
//! operations. Deferred sends and standup flushes are one-shot tokio timers
//! that re-enter the store like any other concurrent caller.

pub mod dto;
pub mod services;

pub use services::{
    AdminService, AuthService, ChannelService, CommandHook, MessageService, SearchService,
    ServiceContext, ServiceError, ServiceResult, StandupService, UserService,
};
