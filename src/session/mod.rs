//! Сессия пользователя: токен доступа и профиль.
//!
//! `SessionStore` передаётся явно в каждый компонент, которому нужна авторизация,
//! и сохраняется в `SessionStorage` между перезапусками.

pub mod storage;

pub use storage::{FileStorage, MemoryStorage, SessionStorage};

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ClientError;
use crate::models::UserSummary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserSummary,
}

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: Option<i64>,
}

impl Session {
    pub fn new(token: impl Into<String>, user: UserSummary) -> Self {
        Self { token: token.into(), user }
    }

    /// Время истечения из claim `exp`. Подпись не проверяется: это делает сервер.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<ExpiryClaims>(
            &self.token,
            &DecodingKey::from_secret(b""),
            &validation,
        )
        .ok()?;

        DateTime::from_timestamp(data.claims.exp?, 0)
    }

    /// Непрозрачные токены (не JWT) считаются бессрочными.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|exp| exp <= now)
    }
}

#[derive(Clone)]
pub struct SessionStore {
    current: Arc<RwLock<Option<Session>>>,
    storage: Arc<dyn SessionStorage>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("user", &self.user().map(|u| u.email))
            .finish()
    }
}

impl SessionStore {
    /// Пустая сессия поверх хранилища, без чтения из него.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
            storage,
        }
    }

    /// Поднимает сохранённую сессию при старте. Просроченный токен сразу удаляется.
    pub fn restore(storage: Arc<dyn SessionStorage>) -> Result<Self, ClientError> {
        let store = Self::new(storage);
        match store.storage.load()? {
            Some(session) if session.is_expired(Utc::now()) => {
                warn!("Stored session for {} has expired, discarding", session.user.email);
                store.storage.clear()?;
            }
            Some(session) => {
                info!("Restored session for {}", session.user.email);
                *store.write() = Some(session);
            }
            None => {}
        }
        Ok(store)
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::default()))
    }

    pub fn current(&self) -> Option<Session> {
        self.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<UserSummary> {
        self.read().as_ref().map(|s| s.user.clone())
    }

    pub fn user_id(&self) -> Option<i64> {
        self.read().as_ref().map(|s| s.user.id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.read().as_ref().is_some_and(|s| s.user.is_admin)
    }

    /// Сначала пишем в хранилище: если запись не удалась, сессия в памяти не меняется.
    pub fn set(&self, session: Session) -> Result<(), ClientError> {
        self.storage.save(&session)?;
        info!("Session started for {}", session.user.email);
        *self.write() = Some(session);
        Ok(())
    }

    pub fn clear(&self) -> Result<(), ClientError> {
        let previous = self.write().take();
        if let Some(session) = previous {
            info!("Session cleared for {}", session.user.email);
        }
        self.storage.clear()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<Session>> {
        self.current.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Session>> {
        self.current.write().unwrap_or_else(|e| e.into_inner())
    }
}
