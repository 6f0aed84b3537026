// Session collaborator for authenticated requests.
// Provides the bearer token and the forced-logout hook used on fetch failures.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Result, TableError};
use crate::paths;

/// Environment variable that seeds the stored token.
pub const TOKEN_ENV: &str = "TABSYNC_TOKEN";

/// Source of the bearer token and owner of the logged-in state.
pub trait Session: Send + Sync {
    /// Current bearer token, if logged in.
    fn current_token(&self) -> Option<String>;

    /// Drop the current session.
    fn logout(&self);
}

/// Session persisted as a token file.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Token file in the platform cache directory.
    pub fn default_location() -> Result<Self> {
        paths::token_path()
            .map(Self::new)
            .ok_or(TableError::MissingConfig)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store a token, replacing any existing one.
    pub fn store(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically via temp file
        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(token.trim().as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }

    /// Seed the token file from `TABSYNC_TOKEN` when it is set.
    pub fn seed_from_env(&self) -> Result<bool> {
        match std::env::var(TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => {
                self.store(&token)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        let token = contents.trim();
        Ok((!token.is_empty()).then(|| token.to_string()))
    }
}

impl Session for TokenFile {
    fn current_token(&self) -> Option<String> {
        match self.read() {
            Ok(token) => token,
            Err(e) => {
                log::warn!("failed to read token from {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn logout(&self) {
        if self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                log::warn!("failed to remove token {}: {}", self.path.display(), e);
                return;
            }
        }
        log::info!("session cleared");
    }
}

/// In-memory session, for embedding with an externally managed token.
#[derive(Debug, Default)]
pub struct StaticSession {
    token: Mutex<Option<String>>,
    logouts: AtomicUsize,
}

impl StaticSession {
    pub fn new(token: Option<&str>) -> Self {
        Self {
            token: Mutex::new(token.map(str::to_string)),
            logouts: AtomicUsize::new(0),
        }
    }

    /// Number of times `logout` has been called.
    pub fn logout_count(&self) -> usize {
        self.logouts.load(Ordering::SeqCst)
    }
}

impl Session for StaticSession {
    fn current_token(&self) -> Option<String> {
        self.token.lock().ok().and_then(|token| token.clone())
    }

    fn logout(&self) {
        if let Ok(mut token) = self.token.lock() {
            *token = None;
        }
        self.logouts.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_store_and_read_token() {
        let temp_dir = TempDir::new().unwrap();
        let session = TokenFile::new(temp_dir.path().join("nested").join("token"));

        assert_eq!(session.current_token(), None);

        session.store("  abc123\n").unwrap();
        assert_eq!(session.current_token(), Some("abc123".to_string()));
    }

    #[test]
    fn test_logout_removes_token() {
        let temp_dir = TempDir::new().unwrap();
        let session = TokenFile::new(temp_dir.path().join("token"));
        session.store("abc123").unwrap();

        session.logout();
        assert_eq!(session.current_token(), None);
        assert!(!session.path().exists());

        // Logging out twice is harmless.
        session.logout();
    }

    #[test]
    fn test_blank_token_file_is_logged_out() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("token");
        fs::write(&path, "   \n").unwrap();

        assert_eq!(TokenFile::new(path).current_token(), None);
    }

    #[test]
    fn test_static_session_counts_logouts() {
        let session = StaticSession::new(Some("t"));
        assert_eq!(session.current_token(), Some("t".to_string()));

        session.logout();
        assert_eq!(session.current_token(), None);
        assert_eq!(session.logout_count(), 1);
    }
}
