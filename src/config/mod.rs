use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ClientError;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub notifications: NotificationConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub environment: String,
    pub rust_log: String,
}

// Настройки REST API кинотеатра
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

// Где хранится токен и профиль между перезапусками
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub storage_path: PathBuf,
}

// Настройки уведомлений об ошибках
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    pub timeout_seconds: u64,
    pub channel_capacity: usize,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl NotificationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Config {
    /// Значения по умолчанию, затем `cinema.toml` (если есть), затем переменные `CINEMA_*`.
    ///
    /// Вложенные ключи задаются через `__`: `CINEMA_API__BASE_URL=https://example.org/api`.
    pub fn load() -> Result<Self, ClientError> {
        let settings = Self::defaults()?
            .add_source(::config::File::with_name("cinema").required(false))
            .add_source(
                ::config::Environment::with_prefix("CINEMA")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Конфигурация для указанного API без чтения файлов и окружения.
    pub fn for_base_url(base_url: &str) -> Result<Self, ClientError> {
        let settings = Self::defaults()?
            .set_override("api.base_url", base_url)?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    fn defaults() -> Result<::config::ConfigBuilder<::config::builder::DefaultState>, ClientError> {
        Ok(::config::Config::builder()
            .set_default("app.environment", "development")?
            .set_default("app.rust_log", "cinema_client=debug,reqwest=info")?
            .set_default("api.base_url", "http://localhost:8080/api")?
            .set_default("api.timeout_seconds", 30)?
            .set_default("session.storage_path", ".cinema-session.json")?
            .set_default("notifications.timeout_seconds", 6)?
            .set_default("notifications.channel_capacity", 64)?)
    }
}
