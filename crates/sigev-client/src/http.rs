//! # HTTP Transport
//!
//! The shared API client every service goes through.
//!
//! ## Request Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Request Pipeline                                 │
//! │                                                                         │
//! │  service call                                                           │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  in-flight guard ──── identical mutation already running? reject        │
//! │      │                (GETs are never guarded; views may overlap)       │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  bearer attach ────── Authorization: Bearer <token> (when stored)       │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  send ∥ cancel ────── view-scope CancellationToken wins the race        │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  status check ─────── 401 on business endpoint: clear token,            │
//! │      │                broadcast SessionEvent::Expired                   │
//! │      ▼                                                                  │
//! │  decode                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::endpoints;
use crate::error::{ApiError, ApiResult};
use crate::token::TokenStore;

// =============================================================================
// Session Events
// =============================================================================

/// Broadcast session state, observed via a watch channel.
///
/// `Expired` is the forced-logout signal: the transport already cleared
/// the token and every subscriber should drop to the login view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Normal operation (also the initial state).
    Active,
    /// The user logged out deliberately.
    LoggedOut,
    /// The server rejected the token on a business endpoint.
    Expired,
}

// =============================================================================
// In-Flight Guard
// =============================================================================

/// Removes its key from the in-flight set when the request finishes,
/// whichever way it finishes.
struct InFlight<'a> {
    keys: &'a Mutex<HashSet<String>>,
    key: String,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut guard = self
            .keys
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.remove(&self.key);
    }
}

// =============================================================================
// API Client
// =============================================================================

/// Shared HTTP client for the SIGEV-PYME API.
///
/// Cheap to share behind an `Arc`; all interior state is synchronized.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
    session_tx: watch::Sender<SessionEvent>,
    in_flight: Mutex<HashSet<String>>,
}

impl ApiClient {
    /// Builds a client from configuration and a token store.
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::Config(format!("http client: {}", e)))?;

        let (session_tx, _) = watch::channel(SessionEvent::Active);

        Ok(ApiClient {
            http,
            base_url: config.base_url().to_string(),
            tokens,
            session_tx,
            in_flight: Mutex::new(HashSet::new()),
        })
    }

    /// Subscribes to session state changes.
    pub fn session_events(&self) -> watch::Receiver<SessionEvent> {
        self.session_tx.subscribe()
    }

    /// Whether a token is currently stored (not the same as "valid";
    /// only the server can say that).
    pub fn has_token(&self) -> bool {
        self.tokens.load().is_some()
    }

    /// Stores a fresh token and marks the session active.
    pub fn adopt_token(&self, token: &str) -> ApiResult<()> {
        self.tokens.store(token)?;
        let _ = self.session_tx.send(SessionEvent::Active);
        Ok(())
    }

    /// Drops the session: token cleared, event broadcast.
    pub fn clear_session(&self, event: SessionEvent) -> ApiResult<()> {
        self.tokens.clear()?;
        let _ = self.session_tx.send(event);
        Ok(())
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        cancel: &CancellationToken,
    ) -> ApiResult<T> {
        let req = self.http.get(self.url(path));
        let resp = self.dispatch("GET", path, req, cancel).await?;
        Self::decode(resp).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        cancel: &CancellationToken,
    ) -> ApiResult<T> {
        let req = self.http.post(self.url(path)).json(body);
        let resp = self.dispatch("POST", path, req, cancel).await?;
        Self::decode(resp).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        cancel: &CancellationToken,
    ) -> ApiResult<T> {
        let req = self.http.put(self.url(path)).json(body);
        let resp = self.dispatch("PUT", path, req, cancel).await?;
        Self::decode(resp).await
    }

    /// POST with no request body; the response body, if any, is
    /// discarded. Used for fire-and-acknowledge endpoints like logout.
    pub async fn post_empty(&self, path: &str, cancel: &CancellationToken) -> ApiResult<()> {
        let req = self.http.post(self.url(path));
        self.dispatch("POST", path, req, cancel).await?;
        Ok(())
    }

    /// DELETE; the response body, if any, is discarded.
    pub async fn delete(&self, path: &str, cancel: &CancellationToken) -> ApiResult<()> {
        let req = self.http.delete(self.url(path));
        self.dispatch("DELETE", path, req, cancel).await?;
        Ok(())
    }

    // =========================================================================
    // Pipeline
    // =========================================================================

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Registers a mutation in the in-flight set, rejecting duplicates.
    ///
    /// Only POST/PUT/DELETE are guarded: the concern is a double-click
    /// submitting the same create twice, not two views reading the same
    /// list at once.
    fn begin(&self, verb: &str, path: &str) -> ApiResult<Option<InFlight<'_>>> {
        if !is_mutating(verb) {
            return Ok(None);
        }
        let key = format!("{} {}", verb, path);
        let mut guard = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !guard.insert(key.clone()) {
            debug!(%key, "Rejected duplicate in-flight request");
            return Err(ApiError::RequestInFlight(key));
        }
        Ok(Some(InFlight {
            keys: &self.in_flight,
            key,
        }))
    }

    async fn dispatch(
        &self,
        verb: &str,
        path: &str,
        req: reqwest::RequestBuilder,
        cancel: &CancellationToken,
    ) -> ApiResult<reqwest::Response> {
        let _in_flight = self.begin(verb, path)?;

        let req = match self.tokens.load() {
            Some(token) => req.bearer_auth(token),
            None => req,
        };

        debug!(%verb, %path, "API request");
        let resp = tokio::select! {
            _ = cancel.cancelled() => {
                debug!(%verb, %path, "Request cancelled by view scope");
                return Err(ApiError::Cancelled);
            }
            result = req.send() => result.map_err(ApiError::from_transport)?,
        };

        self.check_status(path, resp).await
    }

    /// Maps non-success statuses to the error taxonomy, with the 401
    /// forced-logout side effect for business endpoints.
    async fn check_status(
        &self,
        path: &str,
        resp: reqwest::Response,
    ) -> ApiResult<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let code = status.as_u16();

        if code == 401 {
            if path.contains("/login") {
                return Err(ApiError::InvalidCredentials);
            }
            if endpoints::is_auth_endpoint(path) {
                return Err(ApiError::Unauthorized);
            }
            warn!(%path, "Token rejected on business endpoint, forcing logout");
            self.clear_session(SessionEvent::Expired)?;
            return Err(ApiError::SessionExpired);
        }

        if status.is_server_error() {
            warn!(%path, status = code, "Server error");
            return Err(ApiError::Server { status: code });
        }

        let body = resp.text().await.unwrap_or_default();
        Err(ApiError::Api {
            status: code,
            message: extract_message(&body),
        })
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> ApiResult<T> {
        let body = resp.text().await.map_err(ApiError::from_transport)?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Verbs whose duplicates the in-flight guard rejects.
fn is_mutating(verb: &str) -> bool {
    matches!(verb, "POST" | "PUT" | "DELETE")
}

/// Pulls a human-readable message out of an error body.
///
/// The server answers with `{"message": "..."}` on validation failures
/// and RFC 7807 `{"title": "..."}` on framework-level rejections. A
/// body matching neither comes back empty and the caller's
/// `user_message()` falls through to the generic phrase.
fn extract_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return String::new();
    };
    for key in ["message", "title", "error"] {
        if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
            return msg.to_string();
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::MemoryTokenStore;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn test_client() -> ApiClient {
        ApiClient::new(&ClientConfig::default(), Arc::new(MemoryTokenStore::new())).unwrap()
    }

    fn client_for(base_url: &str) -> ApiClient {
        let mut config = ClientConfig::default();
        config.api.base_url = base_url.to_string();
        ApiClient::new(&config, Arc::new(MemoryTokenStore::new())).unwrap()
    }

    /// Accepts exactly one connection and answers it with a canned
    /// HTTP response. Returns the base URL to point the client at.
    async fn one_shot_server(status: &'static str, body: &'static str) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 8192];
            let _ = sock.read(&mut buf).await;
            let resp = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = sock.write_all(resp.as_bytes()).await;
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_url_join() {
        let client = test_client();
        assert_eq!(
            client.url("/api/Sale/mine"),
            "https://sigev-pyme-webapi.onrender.com/api/Sale/mine"
        );
    }

    #[test]
    fn test_in_flight_guard_rejects_duplicate_mutations() {
        let client = test_client();

        let first = client.begin("POST", "/api/Sale").unwrap();
        assert!(first.is_some());
        assert!(matches!(
            client.begin("POST", "/api/Sale"),
            Err(ApiError::RequestInFlight(_))
        ));

        // Different verb or path is fine
        client.begin("PUT", "/api/Sale").unwrap();
        client.begin("POST", "/api/Product").unwrap();

        drop(first);
        client.begin("POST", "/api/Sale").unwrap();
    }

    #[test]
    fn test_reads_are_never_guarded() {
        let client = test_client();

        // Two views fetching the same list concurrently is legitimate
        assert!(client.begin("GET", "/api/Product").unwrap().is_none());
        assert!(client.begin("GET", "/api/Product").unwrap().is_none());

        assert!(is_mutating("POST"));
        assert!(is_mutating("DELETE"));
        assert!(!is_mutating("GET"));
    }

    #[test]
    fn test_adopt_and_clear_session() {
        let client = test_client();
        let events = client.session_events();

        assert!(!client.has_token());
        client.adopt_token("tok-1").unwrap();
        assert!(client.has_token());
        assert_eq!(*events.borrow(), SessionEvent::Active);

        client.clear_session(SessionEvent::Expired).unwrap();
        assert!(!client.has_token());
        assert_eq!(*events.borrow(), SessionEvent::Expired);
    }

    #[tokio::test]
    async fn test_401_on_business_endpoint_forces_logout() {
        let base = one_shot_server("401 Unauthorized", "{}").await;
        let client = client_for(&base);
        client.adopt_token("tok-stale").unwrap();
        let events = client.session_events();

        let cancel = CancellationToken::new();
        let err = client
            .get::<Vec<serde_json::Value>>(crate::endpoints::PRODUCT, &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::SessionExpired));
        assert!(!client.has_token());
        assert_eq!(*events.borrow(), SessionEvent::Expired);
    }

    #[tokio::test]
    async fn test_401_on_login_leaves_session_alone() {
        let base = one_shot_server("401 Unauthorized", "{}").await;
        let client = client_for(&base);
        client.adopt_token("tok-existing").unwrap();

        let cancel = CancellationToken::new();
        let err = client
            .post::<_, serde_json::Value>(
                crate::endpoints::AUTH_LOGIN,
                &serde_json::json!({"email": "x@y.pe", "password": "bad"}),
                &cancel,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::InvalidCredentials));
        assert!(client.has_token());
        assert_eq!(*client.session_events().borrow(), SessionEvent::Active);
    }

    #[tokio::test]
    async fn test_401_on_me_is_unauthorized_without_side_effects() {
        let base = one_shot_server("401 Unauthorized", "{}").await;
        let client = client_for(&base);
        client.adopt_token("tok-stale").unwrap();

        let cancel = CancellationToken::new();
        let err = client
            .get::<serde_json::Value>(crate::endpoints::AUTH_ME, &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Unauthorized));
        // The caller owns the decision; the transport touched nothing
        assert!(client.has_token());
    }

    #[tokio::test]
    async fn test_error_body_message_passes_through() {
        let base =
            one_shot_server("400 Bad Request", r#"{"message":"El RUC ya está registrado"}"#).await;
        let client = client_for(&base);

        let cancel = CancellationToken::new();
        let err = client
            .post::<_, serde_json::Value>(
                crate::endpoints::COMPANY,
                &serde_json::json!({}),
                &cancel,
            )
            .await
            .unwrap_err();

        match err {
            ApiError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "El RUC ya está registrado");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_extract_message() {
        assert_eq!(
            extract_message(r#"{"message":"El RUC ya está registrado"}"#),
            "El RUC ya está registrado"
        );
        assert_eq!(extract_message(r#"{"title":"Bad Request"}"#), "Bad Request");
        assert_eq!(extract_message("not json"), "");
        assert_eq!(extract_message(r#"{"other":"x"}"#), "");
    }
}
