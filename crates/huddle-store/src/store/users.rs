//! User account operations: registration, sessions, profiles, global roles.

use huddle_core::limits::{MAX_HANDLE_LEN, MIN_HANDLE_LEN};
use huddle_core::{DomainError, GlobalRole, User, UserId};
use rand::Rng;
use tracing::instrument;

use crate::dataset::Dataset;
use crate::{Store, StoreResult};

/// Input for registering a user. The password arrives pre-hashed; the store
/// never sees plaintext credentials.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name_first: String,
    pub name_last: String,
}

impl Store {
    /// Register a new user.
    ///
    /// Rejects duplicate emails, derives a unique lowercase handle from the
    /// concatenated name, and grants the global owner role to the very first
    /// account.
    #[instrument(skip(self, new_user), fields(email = %new_user.email))]
    pub fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        let mut ds = self.inner.lock();

        if ds.users.values().any(|u| u.email == new_user.email) {
            return Err(DomainError::EmailTaken);
        }

        let handle = generate_handle(&ds, &new_user.name_first, &new_user.name_last);
        let role = if ds.is_first_user() {
            GlobalRole::Owner
        } else {
            GlobalRole::Member
        };

        let id = ds.alloc_user_id();
        let user = User::new(
            id,
            new_user.email,
            new_user.password_hash,
            new_user.name_first,
            new_user.name_last,
            handle,
            role,
        );
        ds.users.insert(id, user.clone());
        ds.user_order.push(id);

        tracing::info!(user_id = %id, "user registered");
        Ok(user)
    }

    /// Look up a user by email (for login)
    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        let ds = self.inner.lock();
        ds.users.values().find(|u| u.email == email).cloned()
    }

    /// Fetch a user by id
    pub fn user(&self, user_id: UserId) -> StoreResult<User> {
        let ds = self.inner.lock();
        ds.require_user(user_id).cloned()
    }

    /// Every user, in registration order
    pub fn all_users(&self) -> Vec<User> {
        let ds = self.inner.lock();
        ds.user_order
            .iter()
            .filter_map(|id| ds.users.get(id))
            .cloned()
            .collect()
    }

    /// Activate a session for the user.
    ///
    /// If the user already holds an active token it is returned unchanged
    /// (logging in while logged in re-uses the session); otherwise the
    /// freshly-issued token is recorded and indexed.
    #[instrument(skip(self, fresh_token))]
    pub fn activate_session(&self, user_id: UserId, fresh_token: String) -> StoreResult<String> {
        let mut ds = self.inner.lock();
        ds.require_user(user_id)?;

        if let Some(existing) = ds.users[&user_id].token.clone() {
            return Ok(existing);
        }

        ds.tokens.insert(fresh_token.clone(), user_id);
        if let Some(user) = ds.users.get_mut(&user_id) {
            user.log_in(fresh_token.clone());
        }
        tracing::info!(user_id = %user_id, "session activated");
        Ok(fresh_token)
    }

    /// Invalidate an active session token. Returns whether a session was
    /// actually ended.
    #[instrument(skip(self, token))]
    pub fn end_session(&self, token: &str) -> bool {
        let mut ds = self.inner.lock();
        match ds.tokens.remove(token) {
            Some(user_id) => {
                if let Some(user) = ds.users.get_mut(&user_id) {
                    user.log_out();
                }
                tracing::info!(user_id = %user_id, "session ended");
                true
            }
            None => false,
        }
    }

    /// Resolve a session token to its user. Fails closed: unknown and
    /// logged-out tokens are rejected identically.
    pub fn resolve_token(&self, token: &str) -> StoreResult<UserId> {
        let ds = self.inner.lock();
        ds.tokens
            .get(token)
            .copied()
            .ok_or(DomainError::InvalidToken)
    }

    /// Update a user's first and last name
    #[instrument(skip(self, name_first, name_last))]
    pub fn set_user_name(
        &self,
        user_id: UserId,
        name_first: String,
        name_last: String,
    ) -> StoreResult<()> {
        let mut ds = self.inner.lock();
        ds.require_user(user_id)?;
        if let Some(user) = ds.users.get_mut(&user_id) {
            user.set_name(name_first, name_last);
        }
        Ok(())
    }

    /// Update a user's email; rejects an address already in use by anyone
    #[instrument(skip(self, email))]
    pub fn set_user_email(&self, user_id: UserId, email: String) -> StoreResult<()> {
        let mut ds = self.inner.lock();
        ds.require_user(user_id)?;
        if ds.users.values().any(|u| u.email == email) {
            return Err(DomainError::EmailTaken);
        }
        if let Some(user) = ds.users.get_mut(&user_id) {
            user.set_email(email);
        }
        Ok(())
    }

    /// Update a user's handle; enforces the 3-20 character bound and
    /// uniqueness across all users
    #[instrument(skip(self, handle))]
    pub fn set_user_handle(&self, user_id: UserId, handle: String) -> StoreResult<()> {
        let mut ds = self.inner.lock();
        ds.require_user(user_id)?;

        let len = handle.chars().count();
        if !(MIN_HANDLE_LEN..=MAX_HANDLE_LEN).contains(&len) {
            return Err(DomainError::InvalidHandle {
                min: MIN_HANDLE_LEN,
                max: MAX_HANDLE_LEN,
            });
        }
        if ds.users.values().any(|u| u.handle == handle) {
            return Err(DomainError::HandleTaken(handle));
        }
        if let Some(user) = ds.users.get_mut(&user_id) {
            user.set_handle(handle);
        }
        Ok(())
    }

    /// Change a user's global role. The actor must be a global owner.
    #[instrument(skip(self))]
    pub fn set_global_role(
        &self,
        actor_id: UserId,
        target_id: UserId,
        role: GlobalRole,
    ) -> StoreResult<()> {
        let mut ds = self.inner.lock();
        ds.require_user(actor_id)?;
        ds.require_user(target_id)?;
        if !ds.is_global_owner(actor_id) {
            return Err(DomainError::NotGlobalOwner);
        }
        if let Some(user) = ds.users.get_mut(&target_id) {
            user.role = role;
        }
        tracing::info!(target = %target_id, ?role, "global role changed");
        Ok(())
    }
}

/// Derive a unique lowercase handle from the concatenated name, truncated to
/// the handle limit (keeping the tail), de-conflicted by appending digits.
fn generate_handle(ds: &Dataset, name_first: &str, name_last: &str) -> String {
    let mut source = format!("{name_first}{name_last}").to_lowercase();
    loop {
        let candidate = tail_chars(&source, MAX_HANDLE_LEN);
        let taken = candidate.is_empty() || ds.users.values().any(|u| u.handle == candidate);
        if !taken {
            return candidate;
        }
        source.push_str(&rand::thread_rng().gen_range(0..1000).to_string());
    }
}

/// Last `max` characters of a string (whole string if shorter)
fn tail_chars(s: &str, max: usize) -> String {
    let count = s.chars().count();
    s.chars().skip(count.saturating_sub(max)).collect()
}
