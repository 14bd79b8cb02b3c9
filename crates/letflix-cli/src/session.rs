//! File-backed session storage.
//!
//! Holds the bearer token and the logged-in username in `session.toml`.
//! The API client reads the token through [`TokenStore`] on every authorized
//! call; only the login form writes it.

use std::fs::OpenOptions;
#[cfg(unix)]
use std::fs::Permissions;
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use letflix_api::TokenStore;
use serde::{Deserialize, Serialize};

/// Permission bits of `session.toml`: the bearer token is readable by its owner only.
#[cfg(unix)]
const OWNER_ONLY: u32 = 0o600;

/// Persisted session state.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    /// Username of the logged-in user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Bearer token issued at login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Receives the outcome of a successful login.
pub trait SessionSink {
    /// Records `username` and `token` as the active session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be stored.
    fn sign_in(&self, username: &str, token: &str) -> Result<()>;
}

/// Session stored in a TOML file.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Creates a store backed by `path`. The file is created on first write.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the session. Returns an empty session if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Session> {
        if !self.path.exists() {
            return Ok(Session::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", self.path.display()))
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content =
            toml::to_string_pretty(session).context("failed to serialize session to TOML")?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(OWNER_ONLY);
        let mut file = options
            .open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        // `mode` only applies when the file is created.
        #[cfg(unix)]
        file.set_permissions(Permissions::from_mode(OWNER_ONLY))
            .with_context(|| format!("failed to restrict {}", self.path.display()))?;
        file.write_all(content.as_bytes())
            .with_context(|| format!("failed to write {}", self.path.display()))
    }

    /// Username of the active session, if any.
    #[must_use]
    pub fn username(&self) -> Option<String> {
        match self.load() {
            Ok(session) => session.username,
            Err(err) => {
                tracing::warn!("Ignoring unreadable session: {err:#}");
                None
            }
        }
    }

    /// Removes the session file. Returns `false` when there was no session.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn sign_out(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&self.path)
            .with_context(|| format!("failed to remove {}", self.path.display()))?;
        Ok(true)
    }
}

impl TokenStore for SessionStore {
    fn token(&self) -> Option<String> {
        match self.load() {
            Ok(session) => session.token,
            Err(err) => {
                tracing::warn!("Ignoring unreadable session: {err:#}");
                None
            }
        }
    }

    fn set_token(&self, token: &str) -> Result<()> {
        let mut session = self.load()?;
        session.token = Some(String::from(token));
        self.save(&session)
    }

    fn clear(&self) -> Result<()> {
        let mut session = self.load()?;
        session.token = None;
        self.save(&session)
    }
}

impl SessionSink for SessionStore {
    fn sign_in(&self, username: &str, token: &str) -> Result<()> {
        self.save(&Session {
            username: Some(String::from(username)),
            token: Some(String::from(token)),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_missing_file_is_empty_session() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.toml"));

        // Act & Assert
        assert_eq!(store.load().unwrap(), Session::default());
        assert_eq!(store.token(), None);
        assert_eq!(store.username(), None);
    }

    #[test]
    fn test_sign_in_persists_username_and_token() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        let store = SessionStore::new(path.clone());

        // Act
        store.sign_in("alice", "tok-123").unwrap();

        // Assert
        let reopened = SessionStore::new(path);
        assert_eq!(reopened.token().as_deref(), Some("tok-123"));
        assert_eq!(reopened.username().as_deref(), Some("alice"));
    }

    #[test]
    fn test_set_and_clear_token_keep_username() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.toml"));
        store.sign_in("alice", "old").unwrap();

        // Act
        store.set_token("new").unwrap();
        let replaced = store.token();
        store.clear().unwrap();

        // Assert
        assert_eq!(replaced.as_deref(), Some("new"));
        assert_eq!(store.token(), None);
        assert_eq!(store.username().as_deref(), Some("alice"));
    }

    #[test]
    fn test_sign_out_removes_file() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.toml"));
        store.sign_in("alice", "tok").unwrap();

        // Act
        let first = store.sign_out().unwrap();
        let second = store.sign_out().unwrap();

        // Assert
        assert!(first);
        assert!(!second);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_corrupt_file_yields_no_token() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        std::fs::write(&path, "token = [").unwrap();
        let store = SessionStore::new(path);

        // Act & Assert
        assert!(store.load().is_err());
        assert_eq!(store.token(), None);
    }

    #[test]
    fn test_set_token_keeps_corrupt_file() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        std::fs::write(&path, "username = [").unwrap();
        let store = SessionStore::new(path.clone());

        // Act
        let set = store.set_token("tok");
        let cleared = store.clear();

        // Assert
        assert!(set.is_err());
        assert!(cleared.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "username = [");
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_is_owner_only() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        std::fs::write(&path, "").unwrap();
        std::fs::set_permissions(&path, Permissions::from_mode(0o644)).unwrap();
        let store = SessionStore::new(path.clone());

        // Act
        store.sign_in("alice", "secret-bearer").unwrap();

        // Assert
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0, "session.toml mode = {mode:o}");
        assert_eq!(store.token().as_deref(), Some("secret-bearer"));
    }
}
