//! # Current-User Cache
//!
//! Process-wide cache of the authenticated user's profile.
//!
//! ## Hydration Policies
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     initialize() vs refresh()                           │
//! │                                                                         │
//! │  initialize()  — app startup, token found on disk                       │
//! │  ─────────────                                                          │
//! │  • probe succeeds        → cache the user                               │
//! │  • probe answers 401     → the token is dead: clear the whole           │
//! │                            session, start logged out                    │
//! │  • probe fails otherwise → keep going logged-in-but-unhydrated;         │
//! │                            the server may just be waking up             │
//! │                                                                         │
//! │  refresh()     — explicit refetch after a mutation                      │
//! │  ───────────                                                            │
//! │  • any failure           → keep the stale user; a refresh must          │
//! │                            never log anyone out                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use sigev_core::types::User;

use crate::endpoints;
use crate::error::{ApiError, ApiResult};
use crate::http::{ApiClient, SessionEvent};

/// Shared cache of the current user. Empty means "not logged in" as
/// far as the UI is concerned.
#[derive(Debug, Default)]
pub struct CurrentUser {
    slot: RwLock<Option<User>>,
}

impl CurrentUser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone of the cached user, if any.
    pub async fn get(&self) -> Option<User> {
        self.slot.read().await.clone()
    }

    /// Replaces the cached user.
    pub async fn set(&self, user: User) {
        *self.slot.write().await = Some(user);
    }

    /// Empties the cache.
    pub async fn clear(&self) {
        *self.slot.write().await = None;
    }

    /// Authenticated means "we have a user to show", nothing stronger.
    pub async fn is_authenticated(&self) -> bool {
        self.slot.read().await.is_some()
    }

    /// Startup hydration from a previously stored token.
    ///
    /// Returns the hydrated user, or `None` when there is no usable
    /// session. Only a 401 tears the session down; other failures
    /// leave the token in place for a later retry.
    pub async fn initialize(
        &self,
        client: &ApiClient,
        cancel: &CancellationToken,
    ) -> ApiResult<Option<User>> {
        if !client.has_token() {
            debug!("No stored token, starting logged out");
            self.clear().await;
            return Ok(None);
        }

        match client.get::<User>(endpoints::AUTH_ME, cancel).await {
            Ok(user) => {
                info!(user_name = %user.user_name, "Session restored");
                self.set(user.clone()).await;
                Ok(Some(user))
            }
            Err(ApiError::Unauthorized) => {
                info!("Stored token rejected, clearing session");
                client.clear_session(SessionEvent::Expired)?;
                self.clear().await;
                Ok(None)
            }
            Err(e) => {
                warn!(?e, "Session probe failed, keeping token for retry");
                Err(e)
            }
        }
    }

    /// Refetches the profile after a mutation (company registration,
    /// profile edit). Failure keeps the stale copy.
    pub async fn refresh(
        &self,
        client: &ApiClient,
        cancel: &CancellationToken,
    ) -> ApiResult<User> {
        match client.get::<User>(endpoints::AUTH_ME, cancel).await {
            Ok(user) => {
                self.set(user.clone()).await;
                Ok(user)
            }
            Err(e) => {
                warn!(?e, "User refresh failed, keeping cached copy");
                Err(e)
            }
        }
    }
}
