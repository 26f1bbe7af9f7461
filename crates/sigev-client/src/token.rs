//! # Bearer Token Storage
//!
//! Pluggable persistence for the session's bearer token.
//!
//! ## Stores
//! ```text
//! MemoryTokenStore ── process-lifetime only (tests, throwaway sessions)
//! FileTokenStore ──── survives restarts; single file, 0600 on Unix
//! ```
//!
//! The token is opaque to the client. It is attached verbatim as
//! `Authorization: Bearer <token>` and invalidated by deleting it; no
//! expiry is parsed out of it.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};

/// Persistence interface for the session token.
///
/// Implementations are synchronous; both built-in stores complete in
/// microseconds and callers hold no async locks across these calls.
pub trait TokenStore: Send + Sync {
    /// Returns the stored token, if any.
    fn load(&self) -> Option<String>;

    /// Stores a token, replacing any previous one.
    fn store(&self, token: &str) -> ApiResult<()>;

    /// Removes the stored token. Idempotent.
    fn clear(&self) -> ApiResult<()>;
}

// =============================================================================
// Memory Store
// =============================================================================

/// In-memory token store. The token dies with the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.lock().ok()?.clone()
    }

    fn store(&self, token: &str) -> ApiResult<()> {
        if let Ok(mut guard) = self.token.lock() {
            *guard = Some(token.to_string());
        }
        Ok(())
    }

    fn clear(&self) -> ApiResult<()> {
        if let Ok(mut guard) = self.token.lock() {
            *guard = None;
        }
        Ok(())
    }
}

// =============================================================================
// File Store
// =============================================================================

/// Token store backed by a single file under the user's data directory.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store at the platform-default location
    /// (e.g. `~/.local/share/sigev-pyme/session.token` on Linux).
    ///
    /// The `SIGEV_TOKEN_PATH` environment variable overrides the default.
    pub fn new() -> ApiResult<Self> {
        if let Ok(path) = std::env::var("SIGEV_TOKEN_PATH") {
            return Ok(Self::at(PathBuf::from(path)));
        }
        let dirs = directories::ProjectDirs::from("pe", "sigev", "sigev-pyme")
            .ok_or_else(|| ApiError::Config("no home directory available".into()))?;
        Ok(Self::at(dirs.data_dir().join("session.token")))
    }

    /// Creates a store at an explicit path (used by tests).
    pub fn at(path: PathBuf) -> Self {
        FileTokenStore { path }
    }

    /// The backing file path.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(?e, path = ?self.path, "Failed to read token file");
                None
            }
        }
    }

    fn store(&self, token: &str) -> ApiResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        debug!(path = ?self.path, "Session token stored");
        Ok(())
    }

    fn clear(&self) -> ApiResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = ?self.path, "Session token cleared");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.load(), None);

        store.store("tok-123").unwrap();
        assert_eq!(store.load(), Some("tok-123".to_string()));

        store.store("tok-456").unwrap();
        assert_eq!(store.load(), Some("tok-456".to_string()));

        store.clear().unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::at(dir.path().join("nested").join("session.token"));

        assert_eq!(store.load(), None);

        store.store("tok-abc").unwrap();
        assert_eq!(store.load(), Some("tok-abc".to_string()));

        store.clear().unwrap();
        assert_eq!(store.load(), None);

        // Clearing again is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_ignores_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.token");
        std::fs::write(&path, "  tok-xyz\n").unwrap();

        let store = FileTokenStore::at(path);
        assert_eq!(store.load(), Some("tok-xyz".to_string()));
    }

    #[test]
    fn test_token_path_env_override() {
        // No other test touches this variable, so set/remove is safe.
        std::env::set_var("SIGEV_TOKEN_PATH", "/tmp/sigev-test/override.token");
        let store = FileTokenStore::new().unwrap();
        std::env::remove_var("SIGEV_TOKEN_PATH");

        assert_eq!(
            store.path(),
            &PathBuf::from("/tmp/sigev-test/override.token")
        );
    }

    #[test]
    fn test_file_store_empty_file_is_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.token");
        std::fs::write(&path, "\n").unwrap();

        let store = FileTokenStore::at(path);
        assert_eq!(store.load(), None);
    }
}
