pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod notifications;
pub mod api_client;
pub mod services;
pub mod routes;
pub mod controllers;

use std::sync::Arc;

use tracing::info;

use crate::config::Config;

pub use error::{ApiError, ClientError};

// Общие зависимости для всех страниц клиента
#[derive(Clone)]
pub struct ClientContext {
    pub config: Config,
    pub session: session::SessionStore,
    pub notifier: notifications::Notifier,
    pub api: api_client::ApiClient,
}

impl ClientContext {
    /// Поднимает сессию из файла, указанного в конфигурации.
    pub fn new(config: Config) -> Result<Arc<Self>, ClientError> {
        let storage = Arc::new(session::FileStorage::new(&config.session.storage_path));
        let session = session::SessionStore::restore(storage)?;
        Self::with_session(config, session)
    }

    pub fn with_session(
        config: Config,
        session: session::SessionStore,
    ) -> Result<Arc<Self>, ClientError> {
        let notifier = notifications::Notifier::new(&config.notifications);
        let api = api_client::ApiClient::new(&config.api, session.clone())?;

        info!("Client configured for {}", config.api.base_url);
        Ok(Arc::new(Self {
            config,
            session,
            notifier,
            api,
        }))
    }
}
