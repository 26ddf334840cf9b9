//! The gateway client: dispatch, supersession, and the 401 refresh protocol.

use crate::descriptor::RequestDescriptor;
use feegate_types::{Envelope, GateError, LogoutHook, Result, SessionStore, SessionTokens};
use serde::Deserialize;
use serde_json::Value;
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, Ordering},
    },
};
use tokio_util::sync::CancellationToken;

/// Refresh endpoint path, relative to the base URL. The refresh call is
/// dispatched directly, outside the keyed registry and without a bearer
/// header, so it can never be superseded or intercepted itself.
pub const REFRESH_ENDPOINT: &str = "api/v1/token/refresh/";

/// One in-flight request's slot in the registry.
#[derive(Clone)]
struct Flight {
    id: u64,
    token: CancellationToken,
}

/// HTTP client over the fee-management backend.
///
/// Owns its in-flight registry, so independent client instances never share
/// cancellation state. Credentials are read through the injected
/// [`SessionStore`] at send time and the logout hook is invoked exactly once
/// per irrecoverable refresh failure.
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
    on_logout: LogoutHook,
    flights: Mutex<HashMap<String, Flight>>,
    flight_seq: AtomicU64,
    refresh_gate: tokio::sync::Mutex<()>,
}

/// Payload of a successful refresh response. The backend may omit the
/// refresh token, in which case the previous one stays valid.
#[derive(Debug, Deserialize)]
struct RefreshData {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

impl GatewayClient {
    /// Creates a client for the given base URL with a default HTTP client.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        store: Arc<dyn SessionStore>,
        on_logout: LogoutHook,
    ) -> Self {
        Self::with_http(reqwest::Client::new(), base_url, store, on_logout)
    }

    /// Creates a client reusing an existing `reqwest::Client` (connection
    /// pool, timeouts).
    #[must_use]
    pub fn with_http(
        http: reqwest::Client,
        base_url: impl Into<String>,
        store: Arc<dyn SessionStore>,
        on_logout: LogoutHook,
    ) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            http,
            base_url,
            store,
            on_logout,
            flights: Mutex::new(HashMap::new()),
            flight_seq: AtomicU64::new(0),
            refresh_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// The session store this client reads credentials through.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    // ── Public contract ──────────────────────────────────────────────────

    /// Issues one HTTP call described by `descriptor`.
    ///
    /// Any in-flight request under the same cancellation key is cancelled
    /// first. Resolves with the decoded JSON body on 2xx (`Value::Null` for
    /// empty bodies). A 401 triggers a token refresh and a single retry; the
    /// retry's outcome is final.
    ///
    /// # Errors
    ///
    /// [`GateError::Cancelled`] if superseded or cancelled,
    /// [`GateError::Auth`] if the refresh step fails,
    /// [`GateError::Http`] for other non-2xx responses, and
    /// [`GateError::Transport`] for network failures.
    pub async fn request(&self, descriptor: RequestDescriptor) -> Result<Value> {
        let key = descriptor.effective_key();
        let flight = self.begin_flight(&key);
        tracing::debug!(
            method = %descriptor.method,
            path = %descriptor.path,
            key = %key,
            "dispatching request"
        );
        let result = self.run(&descriptor, &key, &flight).await;
        self.finish_flight(&key, flight.id);
        result
    }

    /// Like [`GatewayClient::request`], deserializing the response body.
    ///
    /// # Errors
    ///
    /// As [`GatewayClient::request`], plus [`GateError::Serialization`] if
    /// the body does not match `T`.
    pub async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<T> {
        let value = self.request(descriptor).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Cancels the in-flight request under `key`, if any. Idempotent.
    pub fn cancel(&self, key: &str) {
        let mut flights = self.flights.lock().unwrap();
        if let Some(flight) = flights.remove(key) {
            tracing::debug!(key, "cancelling in-flight request");
            flight.token.cancel();
        }
    }

    /// Returns `true` if a request is currently in flight under `key`.
    #[must_use]
    pub fn inflight(&self, key: &str) -> bool {
        self.flights.lock().unwrap().contains_key(key)
    }

    // ── Registry ─────────────────────────────────────────────────────────

    /// Registers a fresh flight under `key`, superseding any existing one.
    ///
    /// Cancel-then-insert happens under a single lock acquisition, so for a
    /// given key the previous request is always cancelled before the new one
    /// owns the slot.
    fn begin_flight(&self, key: &str) -> Flight {
        let mut flights = self.flights.lock().unwrap();
        if let Some(old) = flights.remove(key) {
            tracing::debug!(key, "superseding in-flight request");
            old.token.cancel();
        }
        let flight = Flight {
            id: self.flight_seq.fetch_add(1, Ordering::Relaxed),
            token: CancellationToken::new(),
        };
        flights.insert(key.to_string(), flight.clone());
        flight
    }

    /// Removes the registry entry for `key` only if it still belongs to this
    /// flight. A newer flight's entry is never evicted by a stale cleanup.
    fn finish_flight(&self, key: &str, id: u64) {
        let mut flights = self.flights.lock().unwrap();
        if flights.get(key).is_some_and(|f| f.id == id) {
            flights.remove(key);
        }
    }

    /// Classifies a cancellation: if the registry now holds a different
    /// flight for this key, a newer request superseded us (auto-cancel);
    /// otherwise it was an external `cancel` call.
    fn cancelled_error(&self, key: &str, flight_id: u64) -> GateError {
        let flights = self.flights.lock().unwrap();
        let auto = flights.get(key).is_some_and(|f| f.id != flight_id);
        tracing::debug!(key, auto, "request cancelled");
        GateError::Cancelled {
            key: key.to_string(),
            auto,
        }
    }

    // ── Dispatch ─────────────────────────────────────────────────────────

    async fn run(
        &self,
        descriptor: &RequestDescriptor,
        key: &str,
        flight: &Flight,
    ) -> Result<Value> {
        // Read the token at send time: a concurrent refresh must be observed.
        let bearer = self.store.access_token().await?;
        match self.send_once(descriptor, key, flight, bearer.as_deref()).await {
            Err(GateError::Http { status: 401, .. }) => {
                // Single-shot recovery: refresh, then re-send exactly once.
                // The retry's outcome is final; a second 401 surfaces as a
                // plain HTTP error, never another refresh.
                self.refresh_access_token(bearer).await?;
                let bearer = self.store.access_token().await?;
                self.send_once(descriptor, key, flight, bearer.as_deref())
                    .await
            }
            other => other,
        }
    }

    async fn send_once(
        &self,
        descriptor: &RequestDescriptor,
        key: &str,
        flight: &Flight,
        bearer: Option<&str>,
    ) -> Result<Value> {
        let mut req = self
            .http
            .request(descriptor.method.clone(), self.url(&descriptor.path));
        if let Some(access) = bearer {
            req = req.bearer_auth(access);
        }
        if let Some(query) = &descriptor.query {
            req = req.query(query);
        }
        if let Some(body) = &descriptor.body {
            req = req.json(body);
        }

        tokio::select! {
            // Cancellation wins ties: a superseded response is never acted on.
            biased;
            () = flight.token.cancelled() => Err(self.cancelled_error(key, flight.id)),
            result = Self::execute(req) => result,
        }
    }

    async fn execute(req: reqwest::RequestBuilder) -> Result<Value> {
        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            let bytes = resp.bytes().await?;
            if bytes.is_empty() {
                Ok(Value::Null)
            } else {
                Ok(serde_json::from_slice(&bytes)?)
            }
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(GateError::Http {
                status: status.as_u16(),
                body,
            })
        }
    }

    // ── 401 refresh protocol ─────────────────────────────────────────────

    /// Mints a new access token from the stored refresh token.
    ///
    /// `rejected` is the access token the failed request carried. Refreshes
    /// are single-flight: concurrent 401s queue on a gate, and a caller that
    /// finds the rejected token already replaced skips the network call and
    /// proceeds straight to its retry. An irrecoverable failure clears the
    /// session and invokes the logout hook once.
    async fn refresh_access_token(&self, rejected: Option<String>) -> Result<()> {
        let _gate = self.refresh_gate.lock().await;

        let current = self.store.access_token().await?;
        if current.is_some() && current != rejected {
            tracing::debug!("access token already refreshed by a concurrent request");
            return Ok(());
        }

        let Some(refresh) = self.store.refresh_token().await? else {
            // Nothing to tear down: no logout, no store clear.
            return Err(GateError::Auth("no refresh token".into()));
        };

        tracing::info!("access token rejected, refreshing session");
        match self.post_refresh(&refresh).await {
            Ok(tokens) => {
                self.store.save(&tokens).await?;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "token refresh failed, ending session");
                if let Err(clear_err) = self.store.clear().await {
                    tracing::warn!(error = %clear_err, "failed to clear session store");
                }
                (self.on_logout)();
                Err(GateError::Auth(format!("token refresh failed: {e}")))
            }
        }
    }

    async fn post_refresh(&self, refresh: &str) -> Result<SessionTokens> {
        let resp = self
            .http
            .post(self.url(REFRESH_ENDPOINT))
            .json(&serde_json::json!({ "refresh": refresh }))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GateError::Http {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = resp.bytes().await?;
        let envelope: Envelope<RefreshData> = serde_json::from_slice(&bytes)?;
        let next_refresh = envelope.data.refresh.unwrap_or_else(|| refresh.to_string());
        Ok(SessionTokens::new(envelope.data.access, next_refresh))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }
}
