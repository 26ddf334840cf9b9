//! JSON-file session store, used by the CLI so login survives between runs.

use async_trait::async_trait;
use feegate_types::{GateError, Result, SessionStore, SessionTokens};
use std::path::{Path, PathBuf};

/// A [`SessionStore`] persisting the token pair as a JSON file.
///
/// A missing or unreadable file reads as "no session"; `clear` removes the
/// file. Parent directories are created on first save.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Creates a store backed by the given file path. The file is not
    /// touched until the first `save`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_tokens(&self) -> Option<SessionTokens> {
        let bytes = tokio::fs::read(&self.path).await.ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(tokens) => Some(tokens),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring corrupt session file");
                None
            }
        }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn access_token(&self) -> Result<Option<String>> {
        Ok(self.read_tokens().await.map(|t| t.access))
    }

    async fn refresh_token(&self) -> Result<Option<String>> {
        Ok(self.read_tokens().await.map(|t| t.refresh))
    }

    async fn save(&self, tokens: &SessionTokens) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| GateError::Store(format!("create {}: {e}", parent.display())))?;
        }
        let json = serde_json::to_vec_pretty(tokens)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| GateError::Store(format!("write {}: {e}", self.path.display())))
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(GateError::Store(format!(
                "remove {}: {e}",
                self.path.display()
            ))),
        }
    }
}
