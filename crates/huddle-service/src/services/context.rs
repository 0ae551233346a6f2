//! Service context - dependency container for services
//!
//! Holds the shared store, the token and password services, and the
//! registered command hooks. A clone is cheap; every service borrows one
//! context, and timer tasks capture the store `Arc` directly.

use std::sync::Arc;

use huddle_common::{AppConfig, PasswordService, TokenService};
use huddle_core::{DomainError, UserId};
use huddle_store::Store;

use super::error::{ServiceError, ServiceResult};
use super::hooks::CommandHook;

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    store: Arc<Store>,
    tokens: TokenService,
    passwords: PasswordService,
    hooks: Vec<Arc<dyn CommandHook>>,
}

impl ServiceContext {
    /// Create a context with a fresh, empty store
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self::with_store(config, Store::new_shared())
    }

    /// Create a context over an existing store
    #[must_use]
    pub fn with_store(config: &AppConfig, store: Arc<Store>) -> Self {
        Self {
            store,
            tokens: TokenService::new(&config.auth.token_secret),
            passwords: PasswordService::new(),
            hooks: Vec::new(),
        }
    }

    /// Register an in-band command hook
    pub fn register_hook(&mut self, hook: Arc<dyn CommandHook>) {
        self.hooks.push(hook);
    }

    /// Get the shared store
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Clone the store handle (for timer tasks)
    pub fn store_arc(&self) -> Arc<Store> {
        Arc::clone(&self.store)
    }

    /// Get the token service
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Get the password service
    pub fn passwords(&self) -> &PasswordService {
        &self.passwords
    }

    /// Registered command hooks, in registration order
    pub fn hooks(&self) -> &[Arc<dyn CommandHook>] {
        &self.hooks
    }

    /// Identity resolver: map a session token to its user, failing closed.
    ///
    /// Verifies the token signature, then requires it to be the user's
    /// currently-active token. Logged-out and never-issued tokens are
    /// rejected identically. Side-effect-free.
    pub fn resolve(&self, token: &str) -> ServiceResult<UserId> {
        let claims = self
            .tokens
            .decode(token)
            .map_err(|_| ServiceError::Domain(DomainError::InvalidToken))?;
        let claimed = claims
            .user_id()
            .map_err(|_| ServiceError::Domain(DomainError::InvalidToken))?;

        let active = self.store.resolve_token(token)?;
        if active != claimed {
            return Err(ServiceError::Domain(DomainError::InvalidToken));
        }
        Ok(active)
    }

    /// Full reset: discard all users, channels, messages, standup and
    /// session state. Exposed for test isolation; pending timers fire into
    /// the store's channel-gone no-op paths.
    pub fn clear(&self) {
        self.store.clear();
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("store", &"Store")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}
