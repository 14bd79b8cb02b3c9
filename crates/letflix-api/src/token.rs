//! Session token storage.
//!
//! The client reads the bearer token from a [`TokenStore`] on every
//! authorized call and never writes it; storing the token after login is up
//! to the caller.

use std::sync::{PoisonError, RwLock};

use anyhow::Result;

/// Storage for the bearer token obtained at login.
#[allow(clippy::module_name_repetitions)]
pub trait TokenStore: Send + Sync + std::fmt::Debug {
    /// Returns the stored token, if any.
    fn token(&self) -> Option<String>;

    /// Replaces the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set_token(&self, token: &str) -> Result<()>;

    /// Removes the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn clear(&self) -> Result<()>;
}

/// In-process token store.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `token`.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_token(&self, token: &str) -> Result<()> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(String::from(token));
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
