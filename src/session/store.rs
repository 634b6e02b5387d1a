// src/session/store.rs
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Durable slot for the session token. Only session code paths write it:
/// login/register save, logout and invalidation clear.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> ClientResult<Option<String>>;
    fn save(&self, token: &str) -> ClientResult<()>;
    fn clear(&self) -> ClientResult<()>;
}

impl<T: TokenStore + ?Sized> TokenStore for std::sync::Arc<T> {
    fn load(&self) -> ClientResult<Option<String>> {
        (**self).load()
    }

    fn save(&self, token: &str) -> ClientResult<()> {
        (**self).save(token)
    }

    fn clear(&self) -> ClientResult<()> {
        (**self).clear()
    }
}

#[derive(Serialize, Deserialize)]
struct TokenFile {
    token: String,
}

/// JSON file slot, surviving restarts.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> ClientResult<Option<String>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ClientError::Storage(format!("Failed to read token: {}", e))),
        };

        // An unreadable slot behaves like an empty one
        match serde_json::from_str::<TokenFile>(&contents) {
            Ok(file) => Ok(Some(file.token)),
            Err(_) => Ok(None),
        }
    }

    fn save(&self, token: &str) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::Storage(format!("Failed to create token dir: {}", e)))?;
        }
        let contents = serde_json::to_string(&TokenFile {
            token: token.to_string(),
        })
        .map_err(|e| ClientError::Storage(format!("Failed to encode token: {}", e)))?;
        std::fs::write(&self.path, contents)
            .map_err(|e| ClientError::Storage(format!("Failed to write token: {}", e)))
    }

    fn clear(&self) -> ClientResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Storage(format!("Failed to clear token: {}", e))),
        }
    }
}

/// In-memory slot; the session does not outlive the process.
#[derive(Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> ClientResult<Option<String>> {
        Ok(self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, token: &str) -> ClientResult<()> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}
