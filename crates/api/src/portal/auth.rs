//! Login, profile, and logout.

use super::Portal;
use crate::endpoints;
use crate::models::UserProfile;
use feegate_gateway::RequestDescriptor;
use feegate_types::{Envelope, Result, SessionTokens};
use serde_json::json;

impl Portal {
    /// Authenticates with username/password and persists the issued token
    /// pair to the session store.
    ///
    /// # Errors
    ///
    /// [`feegate_types::GateError::Http`] on invalid credentials, or a store
    /// error if the tokens cannot be persisted.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let desc = RequestDescriptor::post(endpoints::LOGIN)
            .with_body(json!({ "username": username, "password": password }))
            .with_cancel_key("auth:login");
        let env: Envelope<SessionTokens> = self.gateway.fetch(desc).await?;
        self.gateway.store().save(&env.data).await?;
        tracing::info!(username, "logged in");
        Ok(())
    }

    /// Authenticates with a Google ID token.
    ///
    /// # Errors
    ///
    /// As [`Portal::login`].
    pub async fn login_with_google(&self, id_token: &str) -> Result<()> {
        let desc = RequestDescriptor::post(endpoints::GOOGLE_AUTH)
            .with_body(json!({ "token": id_token }))
            .with_cancel_key("auth:google");
        let env: Envelope<SessionTokens> = self.gateway.fetch(desc).await?;
        self.gateway.store().save(&env.data).await?;
        Ok(())
    }

    /// The authenticated user's profile.
    ///
    /// # Errors
    ///
    /// Gateway errors; a 401 follows the usual refresh-and-retry path.
    pub async fn profile(&self) -> Result<UserProfile> {
        let desc = RequestDescriptor::get(endpoints::PROFILE).with_cancel_key("auth:profile");
        let env: Envelope<UserProfile> = self.gateway.fetch(desc).await?;
        Ok(env.data)
    }

    /// Ends the session locally and drops all memoized data.
    ///
    /// # Errors
    ///
    /// A store error if the session cannot be cleared.
    pub async fn logout(&self) -> Result<()> {
        self.gateway.store().clear().await?;
        self.clear_caches();
        tracing::info!("logged out");
        Ok(())
    }
}
