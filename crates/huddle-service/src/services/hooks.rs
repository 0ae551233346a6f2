//! In-band command hooks.
//!
//! Some deployments route special behavior through ordinary messages with a
//! leading command token (a poll bot, a ticket opener). The core message
//! path stays oblivious to any particular convention: hooks registered on
//! the [`super::ServiceContext`] get to rewrite matching messages before
//! they are stored, and may declare an exclusive timed activity that blocks
//! standups (and that standup lines may not address).

use huddle_core::{ChannelId, UserId};

/// A pluggable pre-processor for command-shaped messages.
pub trait CommandHook: Send + Sync {
    /// Leading token that marks a message as this hook's command,
    /// e.g. `"/poll"`.
    fn prefix(&self) -> &str;

    /// Rewrite an incoming command message into the text actually stored.
    /// A failing hook returns its error text; the message path stores
    /// whatever comes back.
    fn on_send(&self, actor_id: UserId, channel_id: ChannelId, text: &str) -> String;

    /// Whether this hook is running an exclusive timed activity in the
    /// channel. While true, a standup cannot start there.
    fn is_exclusive_active(&self, channel_id: ChannelId) -> bool {
        let _ = channel_id;
        false
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::CommandHook;
    use huddle_core::{ChannelId, UserId};
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Hook used by service tests: echoes commands back and can flag an
    /// exclusive activity.
    #[derive(Default)]
    pub struct EchoHook {
        pub exclusive: AtomicBool,
    }

    impl CommandHook for EchoHook {
        fn prefix(&self) -> &str {
            "/echo"
        }

        fn on_send(&self, _actor_id: UserId, _channel_id: ChannelId, text: &str) -> String {
            format!("echo: {}", text.trim_start_matches("/echo").trim_start())
        }

        fn is_exclusive_active(&self, _channel_id: ChannelId) -> bool {
            self.exclusive.load(Ordering::SeqCst)
        }
    }
}
