//! Async traits shared across all feegate crates.
//!
//! Cross-crate abstractions are defined here so that higher layers depend
//! only on `feegate-types`, not on each other.

use crate::{GateError, SessionTokens};
use async_trait::async_trait;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, GateError>;

/// Persistent storage for the session token pair.
///
/// The gateway never manages persistence itself: it reads tokens through
/// this trait at send time (so a concurrent refresh is always observed) and
/// writes through it only on refresh, login, and logout.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Current access token, if a session exists.
    async fn access_token(&self) -> Result<Option<String>>;
    /// Current refresh token, if a session exists.
    async fn refresh_token(&self) -> Result<Option<String>>;
    /// Persist a new token pair, replacing any existing session.
    async fn save(&self, tokens: &SessionTokens) -> Result<()>;
    /// Destroy the session.
    async fn clear(&self) -> Result<()>;
}

/// Callback invoked by the gateway exactly once per irrecoverable refresh
/// failure. Injected at construction so the gateway never depends on the
/// auth/UI layer above it.
pub type LogoutHook = std::sync::Arc<dyn Fn() + Send + Sync>;
