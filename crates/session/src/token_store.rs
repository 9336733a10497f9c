//! Token storage.
//!
//! The token store is the single source of truth for the raw access token.
//! Only the session store writes it; everything else derives from it.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;

/// Storage for the current signed access token.
///
/// No validation happens here; a malformed token is the claims decoder's
/// problem. Storage failures degrade to "no token" and are logged, never
/// surfaced as panics.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str);
    fn clear(&self);
}

/// In-memory store for tests and explicitly ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.slot.lock().clone()
    }

    fn set(&self, token: &str) {
        *self.slot.lock() = Some(token.to_string());
    }

    fn clear(&self) {
        *self.slot.lock() = None;
    }
}

/// Name of the single file the token persists under.
const TOKEN_FILE: &str = "access.token";

/// File-backed store so a restart resumes the session without
/// re-authentication.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store the token at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store the token under the platform's per-user data directory.
    pub fn in_default_location() -> anyhow::Result<Self> {
        let dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("no user data directory available"))?
            .join("eventdesk");
        Ok(Self::new(dir.join(TOKEN_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!("failed to read token file {:?}: {err}", self.path);
                None
            }
        }
    }

    fn set(&self, token: &str) {
        if let Some(parent) = self.path.parent() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                tracing::warn!("failed to create token directory {:?}: {err}", parent);
                return;
            }
        }
        if let Err(err) = std::fs::write(&self.path, token) {
            tracing::warn!("failed to persist token to {:?}: {err}", self.path);
        }
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!("failed to remove token file {:?}: {err}", self.path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get(), None);

        store.set("abc.def.ghi");
        assert_eq!(store.get().as_deref(), Some("abc.def.ghi"));

        store.clear();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join(TOKEN_FILE));

        assert_eq!(store.get(), None);

        store.set("abc.def.ghi");
        assert_eq!(store.get().as_deref(), Some("abc.def.ghi"));

        store.clear();
        assert_eq!(store.get(), None);
        // Clearing twice is fine.
        store.clear();
    }

    #[test]
    fn file_store_ignores_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TOKEN_FILE);
        std::fs::write(&path, "  abc.def.ghi\n").unwrap();

        let store = FileTokenStore::new(&path);
        assert_eq!(store.get().as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn blank_file_reads_as_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TOKEN_FILE);
        std::fs::write(&path, "\n").unwrap();

        let store = FileTokenStore::new(&path);
        assert_eq!(store.get(), None);
    }
}
