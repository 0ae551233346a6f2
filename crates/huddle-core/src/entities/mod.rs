//! Entities - core domain objects with identity

mod channel;
mod message;
mod user;

pub use channel::{Channel, Visibility};
pub use message::{Message, ReactionSlot};
pub use user::{GlobalRole, User};
