//! # Session Manager
//!
//! Login, registration, logout and profile updates.
//!
//! ## Login Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Login Flow                                     │
//! │                                                                         │
//! │  login(email, password)                                                 │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  POST /api/Auth/login ──── 401: InvalidCredentials, nothing stored      │
//! │      │                                                                  │
//! │      ▼ token                                                            │
//! │  store token, session Active                                            │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  GET /api/Auth/user/me ─── failed? fall back to the synthesized user    │
//! │      │                     (the session is still valid; the profile     │
//! │      ▼                     fetch just lost the race)                    │
//! │  cache user, return                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Synthesized Fallback User
//! When the profile probe fails right after a successful login, the
//! session proceeds with a placeholder built from the login email:
//! id `"temp"`, username = the email's local part, manager role,
//! active, no company. The next successful refresh replaces it.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use sigev_core::types::{User, UserRole, USER_STATUS_ACTIVE};

use crate::endpoints;
use crate::error::ApiResult;
use crate::http::{ApiClient, SessionEvent};
use crate::user_cache::CurrentUser;

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Body for `POST /api/Auth/register`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub user_name: String,

    pub email: String,

    pub password: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
}

/// The fields a profile edit can change. The update endpoint itself
/// requires the complete user record, so these are merged over the
/// cached profile before sending (see [`merged_profile`]).
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub user_name: String,

    pub telefono: Option<String>,

    pub direccion: Option<String>,
}

/// Response from the login and register endpoints. Some deployments
/// embed the user, some only return the token.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    token: String,

    #[serde(default)]
    user: Option<User>,
}

// =============================================================================
// Session Manager
// =============================================================================

/// Drives the session lifecycle against the auth endpoints.
pub struct SessionManager {
    client: Arc<ApiClient>,
    users: Arc<CurrentUser>,
}

impl SessionManager {
    pub fn new(client: Arc<ApiClient>, users: Arc<CurrentUser>) -> Self {
        SessionManager { client, users }
    }

    /// Logs in and returns the cached user (real or synthesized).
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        cancel: &CancellationToken,
    ) -> ApiResult<User> {
        let auth: AuthResponse = self
            .client
            .post(endpoints::AUTH_LOGIN, &LoginRequest { email, password }, cancel)
            .await?;

        self.client.adopt_token(&auth.token)?;
        info!("Login accepted");

        let user = self.resolve_user(auth.user, email, cancel).await;
        self.users.set(user.clone()).await;
        Ok(user)
    }

    /// Registers a new account. When the server returns a token the
    /// session starts immediately, exactly like a login.
    pub async fn register(
        &self,
        request: &RegisterRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<User> {
        let auth: AuthResponse = self
            .client
            .post(endpoints::AUTH_REGISTER, request, cancel)
            .await?;

        self.client.adopt_token(&auth.token)?;
        info!(user_name = %request.user_name, "Registration accepted");

        let user = self.resolve_user(auth.user, &request.email, cancel).await;
        self.users.set(user.clone()).await;
        Ok(user)
    }

    /// Ends the session: notifies the server (best-effort; a failed
    /// call is logged and nothing more), then unconditionally clears
    /// the token and the cache and broadcasts `LoggedOut`.
    pub async fn logout(&self, cancel: &CancellationToken) -> ApiResult<()> {
        if let Err(e) = self.client.post_empty(endpoints::AUTH_LOGOUT, cancel).await {
            warn!(?e, "Server logout failed, clearing session anyway");
        }

        self.client.clear_session(SessionEvent::LoggedOut)?;
        self.users.clear().await;
        info!("Logged out");
        Ok(())
    }

    /// Updates the profile and refreshes the cache with the server's
    /// view of the result.
    ///
    /// The update endpoint rejects partial payloads, so the edited
    /// fields are merged over the current profile (cached, or fetched
    /// when the cache is empty) and the whole record is sent.
    pub async fn update_profile(
        &self,
        update: &ProfileUpdate,
        cancel: &CancellationToken,
    ) -> ApiResult<User> {
        let current = match self.users.get().await {
            Some(user) => user,
            None => self.client.get(endpoints::AUTH_ME, cancel).await?,
        };

        let payload = merged_profile(current, update);
        let user: User = self
            .client
            .put(endpoints::AUTH_UPDATE, &payload, cancel)
            .await?;
        self.users.set(user.clone()).await;
        Ok(user)
    }

    /// Uses the embedded user when present, otherwise probes `/me`,
    /// otherwise synthesizes.
    async fn resolve_user(
        &self,
        embedded: Option<User>,
        email: &str,
        cancel: &CancellationToken,
    ) -> User {
        if let Some(user) = embedded {
            return user;
        }
        match self.client.get::<User>(endpoints::AUTH_ME, cancel).await {
            Ok(user) => user,
            Err(e) => {
                warn!(?e, "Profile fetch after login failed, synthesizing user");
                synthesize_user(email)
            }
        }
    }
}

/// Applies a profile edit over the full user record the update
/// endpoint requires. Everything the form cannot touch (id, email,
/// role, estado, company link) passes through unchanged.
pub fn merged_profile(current: User, update: &ProfileUpdate) -> User {
    User {
        user_name: update.user_name.clone(),
        telefono: update.telefono.clone(),
        direccion: update.direccion.clone(),
        ..current
    }
}

/// Builds the placeholder user for a session whose profile fetch
/// failed. See the module docs for the exact shape.
pub fn synthesize_user(email: &str) -> User {
    let local_part = email.split('@').next().unwrap_or(email);
    User {
        id: "temp".to_string(),
        user_name: local_part.to_string(),
        email: email.to_string(),
        telefono: None,
        direccion: None,
        role: UserRole::Manager.code(),
        estado: USER_STATUS_ACTIVE,
        fecha_registro: chrono::Utc::now().to_rfc3339(),
        company_id: None,
        company_nombre: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesize_user_shape() {
        let user = synthesize_user("maria@tienda.pe");
        assert_eq!(user.id, "temp");
        assert_eq!(user.user_name, "maria");
        assert_eq!(user.email, "maria@tienda.pe");
        assert!(user.is_active());
        assert!(user.is_manager());
        assert_eq!(user.company_id, None);
    }

    #[test]
    fn test_synthesize_user_without_at_sign() {
        let user = synthesize_user("maria");
        assert_eq!(user.user_name, "maria");
    }

    #[test]
    fn test_merged_profile_keeps_identity_fields() {
        let current = User {
            id: "u1".into(),
            user_name: "maria".into(),
            email: "maria@tienda.pe".into(),
            telefono: None,
            direccion: None,
            role: 0,
            estado: 1,
            fecha_registro: "2024-01-15T10:30:00".into(),
            company_id: Some("c1".into()),
            company_nombre: Some("Bodega Sol".into()),
        };
        let update = ProfileUpdate {
            user_name: "maria.perez".into(),
            telefono: Some("987654321".into()),
            direccion: None,
        };

        let merged = merged_profile(current, &update);
        assert_eq!(merged.user_name, "maria.perez");
        assert_eq!(merged.telefono.as_deref(), Some("987654321"));
        // Fields the form cannot touch survive untouched
        assert_eq!(merged.id, "u1");
        assert_eq!(merged.email, "maria@tienda.pe");
        assert_eq!(merged.company_id.as_deref(), Some("c1"));
        assert_eq!(merged.role, 0);
    }

    #[tokio::test]
    async fn test_logout_clears_locally_even_when_server_fails() {
        use crate::config::ClientConfig;
        use crate::token::MemoryTokenStore;
        use crate::user_cache::CurrentUser;
        use std::sync::Arc;
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        // One-shot listener answering the logout POST with a 500
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = sock.read(&mut buf).await;
            let _ = sock
                .write_all(
                    b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                )
                .await;
        });

        let mut config = ClientConfig::default();
        config.api.base_url = format!("http://{}", addr);
        let client =
            Arc::new(ApiClient::new(&config, Arc::new(MemoryTokenStore::new())).unwrap());
        client.adopt_token("tok-1").unwrap();

        let users = Arc::new(CurrentUser::new());
        users.set(synthesize_user("maria@tienda.pe")).await;
        let session = SessionManager::new(Arc::clone(&client), Arc::clone(&users));

        let events = client.session_events();
        let cancel = tokio_util::sync::CancellationToken::new();
        session.logout(&cancel).await.unwrap();

        assert!(!client.has_token());
        assert!(!users.is_authenticated().await);
        assert_eq!(*events.borrow(), SessionEvent::LoggedOut);
    }

    #[test]
    fn test_register_request_omits_empty_optionals() {
        let req = RegisterRequest {
            user_name: "maria".into(),
            email: "maria@tienda.pe".into(),
            password: "secreto".into(),
            telefono: None,
            direccion: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("userName"));
        assert!(!json.contains("telefono"));
        assert!(!json.contains("direccion"));
    }
}
