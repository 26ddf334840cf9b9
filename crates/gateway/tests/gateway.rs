//! Integration tests for the gateway client against in-process mock backends.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use feegate_gateway::{GatewayClient, RequestDescriptor};
use feegate_store::InMemorySessionStore;
use feegate_types::{GateError, LogoutHook, SessionStore, SessionTokens};
use serde_json::{Value, json};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

/// Binds a mock backend on an ephemeral port and returns its base URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/")
}

fn noop_logout() -> LogoutHook {
    Arc::new(|| {})
}

fn client_with_tokens(base: &str) -> (Arc<GatewayClient>, Arc<InMemorySessionStore>) {
    let store = Arc::new(InMemorySessionStore::with_tokens(SessionTokens::new(
        "acc-1", "ref-1",
    )));
    let client = Arc::new(GatewayClient::new(
        base,
        Arc::clone(&store) as Arc<dyn SessionStore>,
        noop_logout(),
    ));
    (client, store)
}

fn slow_route() -> Router {
    Router::new().route(
        "/slow",
        get(|| async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Json(json!({"ok": true}))
        }),
    )
}

// ── Supersession & cancellation ──────────────────────────────────────────────

#[tokio::test]
async fn test_supersession_second_request_wins() {
    let base = serve(slow_route()).await;
    let (client, _) = client_with_tokens(&base);

    let first = {
        let client = Arc::clone(&client);
        tokio::spawn(async move {
            client
                .request(RequestDescriptor::get("slow").with_cancel_key("k"))
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    let second = client
        .request(RequestDescriptor::get("slow").with_cancel_key("k"))
        .await;

    let first_err = first.await.unwrap().unwrap_err();
    assert!(
        first_err.is_auto_cancel(),
        "superseded request must be flagged auto-cancel, got: {first_err}"
    );
    assert_eq!(second.unwrap()["ok"], true);
}

#[tokio::test]
async fn test_manual_cancel_is_not_auto() {
    let base = serve(slow_route()).await;
    let (client, _) = client_with_tokens(&base);

    let pending = {
        let client = Arc::clone(&client);
        tokio::spawn(async move {
            client
                .request(RequestDescriptor::get("slow").with_cancel_key("k"))
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    client.cancel("k");

    let err = pending.await.unwrap().unwrap_err();
    assert!(err.is_cancelled());
    assert!(!err.is_auto_cancel());
}

#[tokio::test]
async fn test_key_isolation() {
    let base = serve(slow_route()).await;
    let (client, _) = client_with_tokens(&base);

    let a = {
        let client = Arc::clone(&client);
        tokio::spawn(async move {
            client
                .request(RequestDescriptor::get("slow").with_cancel_key("a"))
                .await
        })
    };
    let b = {
        let client = Arc::clone(&client);
        tokio::spawn(async move {
            client
                .request(RequestDescriptor::get("slow").with_cancel_key("b"))
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    client.cancel("a");

    assert!(a.await.unwrap().unwrap_err().is_cancelled());
    assert_eq!(b.await.unwrap().unwrap()["ok"], true);
}

#[tokio::test]
async fn test_cancel_unknown_key_is_noop() {
    let base = serve(slow_route()).await;
    let (client, _) = client_with_tokens(&base);
    client.cancel("nonexistent-key");

    // an unrelated request still completes normally
    let result = client
        .request(RequestDescriptor::get("slow").with_cancel_key("k"))
        .await;
    assert_eq!(result.unwrap()["ok"], true);
}

#[tokio::test]
async fn test_superseded_settlement_never_evicts_newer_entry() {
    let base = serve(slow_route()).await;
    let (client, _) = client_with_tokens(&base);

    let first = {
        let client = Arc::clone(&client);
        tokio::spawn(async move {
            client
                .request(RequestDescriptor::get("slow").with_cancel_key("k"))
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    let second = {
        let client = Arc::clone(&client);
        tokio::spawn(async move {
            client
                .request(RequestDescriptor::get("slow").with_cancel_key("k"))
                .await
        })
    };

    // first settles (auto-cancelled) while second is still in flight;
    // its cleanup must leave second's registry slot intact
    assert!(first.await.unwrap().unwrap_err().is_auto_cancel());
    assert!(client.inflight("k"));

    assert_eq!(second.await.unwrap().unwrap()["ok"], true);
    assert!(!client.inflight("k"));
}

// ── Auth header & body decoding ──────────────────────────────────────────────

fn echo_auth_route() -> Router {
    Router::new().route(
        "/echo",
        get(|headers: HeaderMap| async move {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string);
            Json(json!({"auth": auth}))
        }),
    )
}

#[tokio::test]
async fn test_bearer_attached_when_session_exists() {
    let base = serve(echo_auth_route()).await;
    let (client, _) = client_with_tokens(&base);
    let body = client.request(RequestDescriptor::get("echo")).await.unwrap();
    assert_eq!(body["auth"], "Bearer acc-1");
}

#[tokio::test]
async fn test_no_bearer_without_session() {
    let base = serve(echo_auth_route()).await;
    let client = GatewayClient::new(
        &base,
        Arc::new(InMemorySessionStore::new()),
        noop_logout(),
    );
    let body = client.request(RequestDescriptor::get("echo")).await.unwrap();
    assert_eq!(body["auth"], Value::Null);
}

#[tokio::test]
async fn test_empty_body_decodes_as_null() {
    let app = Router::new().route("/gone", get(|| async { StatusCode::NO_CONTENT }));
    let base = serve(app).await;
    let (client, _) = client_with_tokens(&base);
    let body = client.request(RequestDescriptor::get("gone")).await.unwrap();
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_http_error_preserves_status_and_body() {
    let app = Router::new().route(
        "/bad",
        post(|| async {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({"errors": {"amount_paid": ["must be positive"]}})),
            )
        }),
    );
    let base = serve(app).await;
    let (client, _) = client_with_tokens(&base);
    let err = client
        .request(RequestDescriptor::post("bad"))
        .await
        .unwrap_err();
    match err {
        GateError::Http { status, body } => {
            assert_eq!(status, 422);
            assert!(body.contains("must be positive"));
        }
        other => panic!("expected http error, got {other}"),
    }
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    // bind then drop to get a port with nothing listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (client, _) = client_with_tokens(&format!("http://{addr}/"));
    let err = client
        .request(RequestDescriptor::get("thing"))
        .await
        .unwrap_err();
    assert!(matches!(err, GateError::Transport(_)), "got {err}");
}

// ── 401 refresh protocol ─────────────────────────────────────────────────────

struct AuthBackend {
    /// Bearer token the resource endpoint accepts; anything else 401s.
    /// `None` means every request is denied.
    accept_bearer: Option<String>,
    hits: AtomicUsize,
    refreshes: AtomicUsize,
    refresh_ok: bool,
    seen_refresh_token: Mutex<Option<String>>,
    seen_bearer: Mutex<Option<String>>,
}

impl AuthBackend {
    fn new(accept_bearer: Option<&str>, refresh_ok: bool) -> Arc<Self> {
        Arc::new(Self {
            accept_bearer: accept_bearer.map(ToString::to_string),
            hits: AtomicUsize::new(0),
            refreshes: AtomicUsize::new(0),
            refresh_ok,
            seen_refresh_token: Mutex::new(None),
            seen_bearer: Mutex::new(None),
        })
    }

    fn router(self: &Arc<Self>) -> Router {
        Router::new()
            .route(
                "/thing",
                get(
                    |State(backend): State<Arc<AuthBackend>>, headers: HeaderMap| async move {
                        let bearer = headers
                            .get("authorization")
                            .and_then(|v| v.to_str().ok())
                            .map(ToString::to_string);
                        *backend.seen_bearer.lock().unwrap() = bearer.clone();
                        backend.hits.fetch_add(1, Ordering::SeqCst);
                        let accepted = match (&backend.accept_bearer, bearer.as_deref()) {
                            (Some(t), Some(b)) => b == format!("Bearer {t}"),
                            _ => false,
                        };
                        if accepted {
                            (StatusCode::OK, Json(json!({"value": 42})))
                        } else {
                            (
                                StatusCode::UNAUTHORIZED,
                                Json(json!({"detail": "token expired"})),
                            )
                        }
                    },
                ),
            )
            .route(
                "/api/v1/token/refresh/",
                post(
                    |State(backend): State<Arc<AuthBackend>>, Json(body): Json<Value>| async move {
                        backend.refreshes.fetch_add(1, Ordering::SeqCst);
                        *backend.seen_refresh_token.lock().unwrap() =
                            body["refresh"].as_str().map(ToString::to_string);
                        if backend.refresh_ok {
                            (
                                StatusCode::OK,
                                Json(json!({
                                    "status_code": 200,
                                    "message": "ok",
                                    "data": {"access": "acc-2", "refresh": "ref-2"},
                                    "errors": null
                                })),
                            )
                        } else {
                            (
                                StatusCode::UNAUTHORIZED,
                                Json(json!({"detail": "refresh expired"})),
                            )
                        }
                    },
                ),
            )
            .with_state(Arc::clone(self))
    }
}

#[tokio::test]
async fn test_single_retry_on_401() {
    let backend = AuthBackend::new(Some("acc-2"), true);
    let base = serve(backend.router()).await;
    let (client, store) = client_with_tokens(&base);

    let body = client
        .request(RequestDescriptor::get("thing"))
        .await
        .unwrap();

    assert_eq!(body["value"], 42);
    assert_eq!(backend.refreshes.load(Ordering::SeqCst), 1);
    assert_eq!(
        backend.seen_refresh_token.lock().unwrap().as_deref(),
        Some("ref-1")
    );
    // the retry carried the freshly minted token
    assert_eq!(
        backend.seen_bearer.lock().unwrap().as_deref(),
        Some("Bearer acc-2")
    );
    assert_eq!(store.access_token().await.unwrap().unwrap(), "acc-2");
    assert_eq!(store.refresh_token().await.unwrap().unwrap(), "ref-2");
}

#[tokio::test]
async fn test_refresh_failure_triggers_logout_once() {
    let backend = AuthBackend::new(None, false);
    let base = serve(backend.router()).await;

    let store = Arc::new(InMemorySessionStore::with_tokens(SessionTokens::new(
        "acc-1", "ref-1",
    )));
    let logouts = Arc::new(AtomicUsize::new(0));
    let hook: LogoutHook = {
        let logouts = Arc::clone(&logouts);
        Arc::new(move || {
            logouts.fetch_add(1, Ordering::SeqCst);
        })
    };
    let client = GatewayClient::new(&base, Arc::clone(&store) as Arc<dyn SessionStore>, hook);

    let err = client
        .request(RequestDescriptor::get("thing"))
        .await
        .unwrap_err();

    assert!(matches!(err, GateError::Auth(_)), "got {err}");
    assert_eq!(logouts.load(Ordering::SeqCst), 1);
    assert!(store.access_token().await.unwrap().is_none());
}

#[tokio::test]
async fn test_no_second_retry_on_persistent_401() {
    let backend = AuthBackend::new(None, true);
    let base = serve(backend.router()).await;
    let (client, _) = client_with_tokens(&base);

    let err = client
        .request(RequestDescriptor::get("thing"))
        .await
        .unwrap_err();

    // exactly one refresh, and the retried 401 surfaces as a plain HTTP error
    assert_eq!(backend.refreshes.load(Ordering::SeqCst), 1);
    assert!(matches!(err, GateError::Http { status: 401, .. }), "got {err}");
    assert_eq!(backend.hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_401_without_refresh_token_rejects_without_logout() {
    let backend = AuthBackend::new(None, true);
    let base = serve(backend.router()).await;

    let logouts = Arc::new(AtomicUsize::new(0));
    let hook: LogoutHook = {
        let logouts = Arc::clone(&logouts);
        Arc::new(move || {
            logouts.fetch_add(1, Ordering::SeqCst);
        })
    };
    let client = GatewayClient::new(&base, Arc::new(InMemorySessionStore::new()), hook);

    let err = client
        .request(RequestDescriptor::get("thing"))
        .await
        .unwrap_err();

    assert!(matches!(err, GateError::Auth(_)), "got {err}");
    assert_eq!(backend.refreshes.load(Ordering::SeqCst), 0);
    assert_eq!(logouts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_concurrent_401s_share_one_refresh() {
    let backend = AuthBackend::new(Some("acc-2"), true);
    let base = serve(backend.router()).await;
    let (client, _) = client_with_tokens(&base);

    let a = {
        let client = Arc::clone(&client);
        tokio::spawn(async move {
            client
                .request(RequestDescriptor::get("thing").with_cancel_key("a"))
                .await
        })
    };
    let b = {
        let client = Arc::clone(&client);
        tokio::spawn(async move {
            client
                .request(RequestDescriptor::get("thing").with_cancel_key("b"))
                .await
        })
    };

    let a = a.await.unwrap();
    let b = b.await.unwrap();
    assert_eq!(a.unwrap()["value"], 42);
    assert_eq!(b.unwrap()["value"], 42);
    // the second 401 found the token already replaced and skipped its refresh
    assert_eq!(backend.refreshes.load(Ordering::SeqCst), 1);
}
