//! In-memory session store backed by a `Mutex<Option<SessionTokens>>`.

use async_trait::async_trait;
use feegate_types::{Result, SessionStore, SessionTokens};
use std::sync::Mutex;

/// An in-memory [`SessionStore`] implementation for testing and ephemeral use.
pub struct InMemorySessionStore {
    tokens: Mutex<Option<SessionTokens>>,
}

impl InMemorySessionStore {
    /// Creates a new store with no session.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tokens: Mutex::new(None),
        }
    }

    /// Creates a store pre-seeded with a token pair.
    #[must_use]
    pub fn with_tokens(tokens: SessionTokens) -> Self {
        Self {
            tokens: Mutex::new(Some(tokens)),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn access_token(&self) -> Result<Option<String>> {
        Ok(self.tokens.lock().unwrap().as_ref().map(|t| t.access.clone()))
    }

    async fn refresh_token(&self) -> Result<Option<String>> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .as_ref()
            .map(|t| t.refresh.clone()))
    }

    async fn save(&self, tokens: &SessionTokens) -> Result<()> {
        *self.tokens.lock().unwrap() = Some(tokens.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.tokens.lock().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_store() {
        let store = InMemorySessionStore::new();
        assert!(store.access_token().await.unwrap().is_none());
        assert!(store.refresh_token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_and_read() {
        let store = InMemorySessionStore::new();
        store
            .save(&SessionTokens::new("acc", "ref"))
            .await
            .unwrap();
        assert_eq!(store.access_token().await.unwrap().unwrap(), "acc");
        assert_eq!(store.refresh_token().await.unwrap().unwrap(), "ref");
    }

    #[tokio::test]
    async fn test_overwrite() {
        let store = InMemorySessionStore::with_tokens(SessionTokens::new("first", "r1"));
        store
            .save(&SessionTokens::new("second", "r2"))
            .await
            .unwrap();
        assert_eq!(store.access_token().await.unwrap().unwrap(), "second");
    }

    #[tokio::test]
    async fn test_clear() {
        let store = InMemorySessionStore::with_tokens(SessionTokens::new("acc", "ref"));
        store.clear().await.unwrap();
        assert!(store.access_token().await.unwrap().is_none());
    }
}
