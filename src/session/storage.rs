use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;

use super::Session;
use crate::error::ClientError;

/// Долговременное хранилище сессии (аналог localStorage браузера).
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> Result<Option<Session>, ClientError>;
    fn save(&self, session: &Session) -> Result<(), ClientError>;
    fn clear(&self) -> Result<(), ClientError>;
}

/// Сессия в JSON-файле.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<Option<Session>, ClientError> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let session = serde_json::from_slice(&raw).map_err(ClientError::SessionEncoding)?;
        debug!("Session loaded from {}", self.path.display());
        Ok(Some(session))
    }

    fn save(&self, session: &Session) -> Result<(), ClientError> {
        let raw = serde_json::to_vec_pretty(session).map_err(ClientError::SessionEncoding)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, raw)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Хранилище в памяти: для тестов и одноразовых запусков.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<Session>>,
}

impl MemoryStorage {
    pub fn with_session(session: Session) -> Self {
        Self { slot: Mutex::new(Some(session)) }
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Session>, ClientError> {
        Ok(self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, session: &Session) -> Result<(), ClientError> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}
