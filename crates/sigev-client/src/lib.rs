//! # SIGEV-PYME API Client
//!
//! Async client for the SIGEV-PYME REST API: session lifecycle, bearer
//! token storage, a current-user cache, and typed services for the
//! company / product / sale resources.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          sigev-client                                   │
//! │                                                                         │
//! │  ┌───────────────┐   ┌───────────────┐   ┌───────────────────────────┐ │
//! │  │  AppContext   │──►│  SessionManager│──►│  CurrentUser (cache)     │ │
//! │  │  (wiring +    │   │  login/register│   │  RwLock<Option<User>>    │ │
//! │  │  cancellation)│   │  logout/profile│   │  401-aware hydrate       │ │
//! │  └───────┬───────┘   └───────┬───────┘   └───────────────────────────┘ │
//! │          │                   │                                         │
//! │  ┌───────▼───────────────────▼─────────────────────────────────────┐   │
//! │  │                        ApiClient                                │   │
//! │  │   bearer attach │ 401 forced-logout │ in-flight guard │ cancel  │   │
//! │  └───────┬─────────────────────────────────────────────────────────┘   │
//! │          │                                                             │
//! │  ┌───────▼───────┐   ┌───────────────┐   ┌───────────────────────────┐ │
//! │  │  TokenStore   │   │  endpoints    │   │  services/                │ │
//! │  │  memory/file  │   │  path builders│   │  company product sale     │ │
//! │  └───────────────┘   └───────────────┘   └───────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Session Expiry
//! A 401 on any business endpoint clears the stored token and broadcasts
//! [`SessionEvent::Expired`] on the context's watch channel, so every
//! view scope can drop to the login screen at once. Auth endpoints
//! (`/login`, `/register`, `/me`) are exempt: their 401s mean bad
//! credentials or a stale probe, not a dead session.

pub mod config;
pub mod context;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod notify;
pub mod services;
pub mod session;
pub mod token;
pub mod user_cache;

pub use config::ClientConfig;
pub use context::AppContext;
pub use error::{ApiError, ApiResult};
pub use http::{ApiClient, SessionEvent};
pub use notify::{NullNotifier, StockNotifier, TracingNotifier};
pub use session::SessionManager;
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use user_cache::CurrentUser;
