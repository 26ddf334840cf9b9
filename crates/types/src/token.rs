//! Session token pair issued by the backend at login.

use serde::{Deserialize, Serialize};

/// Access/refresh token pair, as returned by the login and refresh endpoints.
///
/// The access token is short-lived and attached to every authenticated
/// request; the refresh token is longer-lived and used exactly to mint a new
/// access token. Created at login, replaced on refresh, destroyed on logout
/// or irrecoverable refresh failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access: String,
    pub refresh: String,
}

impl SessionTokens {
    /// Create a token pair from the given access and refresh tokens.
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }

    /// Replace the access token, keeping the refresh token.
    ///
    /// The refresh endpoint may omit the refresh token from its response, in
    /// which case the previous one stays valid.
    #[must_use]
    pub fn with_access(mut self, access: impl Into<String>) -> Self {
        self.access = access.into();
        self
    }
}
