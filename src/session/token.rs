//! Persisted bearer token.

use std::path::{Path, PathBuf};

use crate::ports::FileSystem;

const TOKEN_FILE: &str = "token";

/// Stores the bearer token in `<state_dir>/token`.
///
/// All I/O goes through the filesystem port so the store works with live,
/// recording and replaying adapters.
pub struct TokenStore<'a> {
    fs: &'a dyn FileSystem,
    path: PathBuf,
}

impl<'a> TokenStore<'a> {
    /// Creates a store under `state_dir`.
    #[must_use]
    pub fn new(fs: &'a dyn FileSystem, state_dir: &Path) -> Self {
        Self { fs, path: state_dir.join(TOKEN_FILE) }
    }

    /// The stored token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the token file exists but cannot be read.
    pub fn load(&self) -> Result<Option<String>, String> {
        if !self.fs.exists(&self.path) {
            return Ok(None);
        }
        let token = self
            .fs
            .read_to_string(&self.path)
            .map_err(|e| format!("Failed to read token {}: {e}", self.path.display()))?;
        let token = token.trim();
        Ok((!token.is_empty()).then(|| token.to_string()))
    }

    /// Replaces the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token file cannot be written.
    pub fn save(&self, token: &str) -> Result<(), String> {
        self.fs
            .write(&self.path, token)
            .map_err(|e| format!("Failed to write token {}: {e}", self.path.display()))
    }

    /// Forgets the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token file cannot be removed.
    pub fn clear(&self) -> Result<(), String> {
        self.fs
            .remove(&self.path)
            .map_err(|e| format!("Failed to remove token {}: {e}", self.path.display()))
    }
}
