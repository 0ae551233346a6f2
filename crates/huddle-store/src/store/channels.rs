//! Channel lifecycle and membership operations.
//!
//! The membership invariants live here: a channel never survives with zero
//! members, a sole remaining member is promoted to sole owner, and an
//! owner-less channel promotes its longest-standing member. Each operation
//! runs under one lock acquisition, so the invariants hold at every
//! observable point.

use huddle_core::limits::MAX_CHANNEL_NAME_LEN;
use huddle_core::{Channel, ChannelId, DomainError, User, UserId, Visibility};
use tracing::instrument;

use crate::dataset::ChannelLog;
use crate::{Store, StoreResult};

/// Channel detail view: name plus resolved owner/member profiles
#[derive(Debug, Clone)]
pub struct ChannelDetails {
    pub name: String,
    pub owner_members: Vec<User>,
    pub all_members: Vec<User>,
}

impl Store {
    /// Create a channel with the creator as sole owner and member
    #[instrument(skip(self, name))]
    pub fn create_channel(
        &self,
        creator_id: UserId,
        name: String,
        visibility: Visibility,
    ) -> StoreResult<ChannelId> {
        if name.chars().count() > MAX_CHANNEL_NAME_LEN {
            return Err(DomainError::NameTooLong {
                max: MAX_CHANNEL_NAME_LEN,
            });
        }

        let mut ds = self.inner.lock();
        ds.require_user(creator_id)?;

        let id = ds.alloc_channel_id();
        ds.channels
            .insert(id, Channel::new(id, name, visibility, creator_id));
        ds.channel_order.push(id);
        ds.logs.insert(id, ChannelLog::default());

        tracing::info!(channel_id = %id, creator = %creator_id, "channel created");
        Ok(id)
    }

    /// Fetch a channel by id
    pub fn channel(&self, channel_id: ChannelId) -> StoreResult<Channel> {
        let ds = self.inner.lock();
        ds.require_channel(channel_id).cloned()
    }

    /// Channels the user belongs to, in creation order
    pub fn channels_of(&self, user_id: UserId) -> StoreResult<Vec<Channel>> {
        let ds = self.inner.lock();
        ds.require_user(user_id)?;
        Ok(ds
            .channel_order
            .iter()
            .filter_map(|id| ds.channels.get(id))
            .filter(|channel| channel.is_member(user_id))
            .cloned()
            .collect())
    }

    /// Every channel, in creation order, regardless of caller
    pub fn all_channels(&self) -> Vec<Channel> {
        let ds = self.inner.lock();
        ds.channel_order
            .iter()
            .filter_map(|id| ds.channels.get(id))
            .cloned()
            .collect()
    }

    /// Invite a user into a channel. The actor must be a member; inviting an
    /// existing member is a no-op. A global owner joins the owner set too.
    #[instrument(skip(self))]
    pub fn invite(
        &self,
        actor_id: UserId,
        channel_id: ChannelId,
        target_id: UserId,
    ) -> StoreResult<()> {
        let mut ds = self.inner.lock();
        ds.require_channel(channel_id)?;
        ds.require_member(actor_id, channel_id)?;
        ds.require_user(target_id)?;

        let target_is_global_owner = ds.is_global_owner(target_id);
        let channel = ds.require_channel_mut(channel_id)?;
        if !channel.is_member(target_id) {
            if target_is_global_owner {
                channel.add_owner(target_id);
            }
            channel.add_member(target_id);
            tracing::info!(channel = %channel_id, target = %target_id, "member invited");
        }
        Ok(())
    }

    /// Join a channel. Private channels admit only global owners, who also
    /// receive channel ownership on entry.
    #[instrument(skip(self))]
    pub fn join(&self, actor_id: UserId, channel_id: ChannelId) -> StoreResult<()> {
        let mut ds = self.inner.lock();
        let actor_is_global_owner = ds.is_global_owner(actor_id);
        let channel = ds.require_channel_mut(channel_id)?;

        if channel.is_member(actor_id) {
            return Ok(());
        }
        if channel.is_private() && !actor_is_global_owner {
            return Err(DomainError::PrivateChannel);
        }
        if actor_is_global_owner {
            channel.add_owner(actor_id);
        }
        channel.add_member(actor_id);
        tracing::info!(channel = %channel_id, user = %actor_id, "member joined");
        Ok(())
    }

    /// Leave a channel, then re-establish the membership invariants:
    /// delete the channel if it emptied, otherwise promote a sole remaining
    /// member or (if the owner set emptied) the longest-standing member.
    #[instrument(skip(self))]
    pub fn leave(&self, actor_id: UserId, channel_id: ChannelId) -> StoreResult<()> {
        let mut ds = self.inner.lock();
        ds.require_channel(channel_id)?;
        ds.require_member(actor_id, channel_id)?;

        let emptied = {
            let channel = ds.require_channel_mut(channel_id)?;
            channel.remove_member(actor_id);
            if channel.member_count() == 0 {
                true
            } else {
                channel.repair_ownership();
                false
            }
        };

        if emptied {
            ds.delete_channel(channel_id);
            tracing::info!(channel = %channel_id, "last member left; channel deleted");
        } else {
            tracing::info!(channel = %channel_id, user = %actor_id, "member left");
        }
        Ok(())
    }

    /// Grant channel ownership. Requires elevated rights on the actor.
    #[instrument(skip(self))]
    pub fn add_owner(
        &self,
        actor_id: UserId,
        channel_id: ChannelId,
        target_id: UserId,
    ) -> StoreResult<()> {
        let mut ds = self.inner.lock();
        let channel = ds.require_channel(channel_id)?;
        let already_owner = channel.is_owner(target_id);
        let actor_elevated = ds.has_elevated_rights(actor_id, channel);
        ds.require_user(target_id)?;

        if already_owner {
            return Err(DomainError::AlreadyOwner);
        }
        if !actor_elevated {
            return Err(DomainError::NotChannelOwner);
        }
        ds.require_channel_mut(channel_id)?.add_owner(target_id);
        tracing::info!(channel = %channel_id, target = %target_id, "owner added");
        Ok(())
    }

    /// Revoke channel ownership. Requires elevated rights on the actor.
    #[instrument(skip(self))]
    pub fn remove_owner(
        &self,
        actor_id: UserId,
        channel_id: ChannelId,
        target_id: UserId,
    ) -> StoreResult<()> {
        let mut ds = self.inner.lock();
        let channel = ds.require_channel(channel_id)?;
        let target_is_owner = channel.is_owner(target_id);
        let actor_elevated = ds.has_elevated_rights(actor_id, channel);
        ds.require_user(target_id)?;

        if !target_is_owner {
            return Err(DomainError::NotAnOwner);
        }
        if !actor_elevated {
            return Err(DomainError::NotChannelOwner);
        }
        ds.require_channel_mut(channel_id)?.remove_owner(target_id);
        tracing::info!(channel = %channel_id, target = %target_id, "owner removed");
        Ok(())
    }

    /// Channel details with member profiles resolved. Requires membership.
    pub fn channel_details(
        &self,
        actor_id: UserId,
        channel_id: ChannelId,
    ) -> StoreResult<ChannelDetails> {
        let ds = self.inner.lock();
        ds.require_channel(channel_id)?;
        ds.require_member(actor_id, channel_id)?;

        let channel = ds.require_channel(channel_id)?;
        let resolve = |ids: &[UserId]| -> Vec<User> {
            ids.iter()
                .filter_map(|id| ds.users.get(id))
                .cloned()
                .collect()
        };
        Ok(ChannelDetails {
            name: channel.name.clone(),
            owner_members: resolve(&channel.owner_members),
            all_members: resolve(&channel.all_members),
        })
    }
}
