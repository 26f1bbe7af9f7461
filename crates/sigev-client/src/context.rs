//! # Application Context
//!
//! Explicit wiring for everything a view needs: one context owns the
//! HTTP client, the session manager, the user cache, and the root
//! cancellation token. There is no global singleton; callers thread
//! the context (or an `Arc` of it) to wherever it is needed.
//!
//! ## Cancellation Scopes
//! ```text
//! AppContext root token
//!     ├── view_scope()  ── Inventario view
//!     ├── view_scope()  ── Nueva Venta view
//!     └── view_scope()  ── Reportes view
//!
//! Leaving a view cancels its scope: every request it started stops.
//! Shutting the app down cancels the root, which cancels all scopes.
//! ```

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::error::ApiResult;
use crate::http::ApiClient;
use crate::services::{CompanyService, ProductService, SaleService};
use crate::session::SessionManager;
use crate::token::TokenStore;
use crate::user_cache::CurrentUser;

/// The application's dependency bundle.
pub struct AppContext {
    pub config: ClientConfig,
    pub client: Arc<ApiClient>,
    pub session: SessionManager,
    pub users: Arc<CurrentUser>,
    root: CancellationToken,
}

impl AppContext {
    /// Wires up a context from configuration and a token store.
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenStore>) -> ApiResult<Self> {
        let client = Arc::new(ApiClient::new(&config, tokens)?);
        let users = Arc::new(CurrentUser::new());
        let session = SessionManager::new(Arc::clone(&client), Arc::clone(&users));

        Ok(AppContext {
            config,
            client,
            session,
            users,
            root: CancellationToken::new(),
        })
    }

    /// A child cancellation token for one view's lifetime. Cancel it
    /// when the view goes away; it dies with the root regardless.
    pub fn view_scope(&self) -> CancellationToken {
        self.root.child_token()
    }

    /// Cancels every outstanding request.
    pub fn shutdown(&self) {
        self.root.cancel();
    }

    // ===== Services =====

    pub fn companies(&self) -> CompanyService {
        CompanyService::new(Arc::clone(&self.client))
    }

    pub fn products(&self) -> ProductService {
        ProductService::new(Arc::clone(&self.client))
    }

    pub fn sales(&self) -> SaleService {
        SaleService::new(Arc::clone(&self.client))
    }
}
