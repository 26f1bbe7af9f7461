//! # Client Error Types
//!
//! Error taxonomy for API calls, with user-facing Spanish messages.
//!
//! ## Classification
//! ```text
//! transport failed ──────────────► Network      "No se pudo conectar..."
//! 401 on /login ─────────────────► InvalidCredentials
//! 401 on /register, /me ─────────► Unauthorized (no session side effects)
//! 401 on business endpoint ──────► SessionExpired (token cleared, event sent)
//! 5xx ───────────────────────────► Server       "Error del servidor..."
//! 4xx with server message ───────► Api          (message passed through)
//! anything else ─────────────────► generic fallback
//! ```

use thiserror::Error;

/// Errors that can occur talking to the SIGEV-PYME API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server could not be reached (DNS, connect, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// Login rejected the credentials (401 on the login endpoint).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// 401 on an auth endpoint other than login. The caller decides
    /// what to do; the session is untouched.
    #[error("unauthorized")]
    Unauthorized,

    /// 401 on a business endpoint. The token has already been cleared
    /// and [`crate::http::SessionEvent::Expired`] broadcast.
    #[error("session expired")]
    SessionExpired,

    /// The server reported an internal error (5xx).
    #[error("server error (status {status})")]
    Server { status: u16 },

    /// The server rejected the request with a message worth showing.
    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The in-progress call was cancelled by its view scope.
    #[error("request cancelled")]
    Cancelled,

    /// An identical request is already in flight.
    #[error("duplicate request in flight: {0}")]
    RequestInFlight(String),

    /// Client-side validation rejected the payload before any network
    /// traffic happened.
    #[error(transparent)]
    Invalid(#[from] sigev_core::ValidationError),

    /// Configuration problem (bad URL, unreadable config file).
    #[error("configuration error: {0}")]
    Config(String),

    /// Token persistence failed.
    #[error("token store error: {0}")]
    TokenStore(#[from] std::io::Error),
}

/// Result alias for client operations.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Wraps a transport-level failure, tagging timeouts distinctly.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network(format!("tiempo de espera agotado: {}", err))
        } else {
            ApiError::Network(err.to_string())
        }
    }

    /// Message suitable for showing to the end user (Spanish).
    ///
    /// Server-provided messages pass through unchanged; everything else
    /// maps to a fixed phrase.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => {
                "No se pudo conectar con el servidor. Verifica tu conexión a internet."
                    .to_string()
            }
            ApiError::InvalidCredentials => "Credenciales incorrectas.".to_string(),
            ApiError::Unauthorized | ApiError::SessionExpired => {
                "Tu sesión ha expirado. Inicia sesión nuevamente.".to_string()
            }
            ApiError::Server { .. } => {
                "Error del servidor. Intenta nuevamente en unos minutos.".to_string()
            }
            ApiError::Api { message, .. } if !message.is_empty() => message.clone(),
            ApiError::Invalid(e) => e.to_string(),
            _ => "Ocurrió un error inesperado.".to_string(),
        }
    }

    /// True when retrying the same call might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Server { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert!(ApiError::Network("refused".into())
            .user_message()
            .contains("conectar"));
        assert_eq!(
            ApiError::InvalidCredentials.user_message(),
            "Credenciales incorrectas."
        );
        assert!(ApiError::Server { status: 500 }
            .user_message()
            .contains("servidor"));
        assert_eq!(
            ApiError::Api {
                status: 400,
                message: "El RUC ya está registrado".into()
            }
            .user_message(),
            "El RUC ya está registrado"
        );
        // Empty server message falls through to the generic phrase
        assert_eq!(
            ApiError::Api {
                status: 400,
                message: String::new()
            }
            .user_message(),
            "Ocurrió un error inesperado."
        );
    }

    #[test]
    fn test_transient_classification() {
        assert!(ApiError::Network("x".into()).is_transient());
        assert!(ApiError::Server { status: 502 }.is_transient());
        assert!(!ApiError::InvalidCredentials.is_transient());
        assert!(!ApiError::SessionExpired.is_transient());
    }
}
