//! error.rs
//!
//! Единый тип ошибок клиента. Любой вызов к API, к хранилищу сессии или к конфигурации
//! возвращает `ClientError`, а решение о том, что показать пользователю, принимает
//! `Notifier::surface`.

use reqwest::StatusCode;
use serde::Deserialize;

/// Тело ошибки, которое отдаёт сервер (Spring ProblemDetail или `{message}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Problem {
    pub title: Option<String>,
    pub detail: Option<String>,
    pub message: Option<String>,
}

/// Неуспешный HTTP-ответ, приведённый к паре заголовок/сообщение.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub title: String,
    pub message: String,
    /// `true`, если сервер прислал разбираемое тело с `detail` или `message`.
    pub structured: bool,
}

impl ApiError {
    pub const DEFAULT_TITLE: &'static str = "Request failed";

    /// Разбирает тело ответа. Без `detail`/`message` остаётся сообщение вида "404 Not Found".
    pub fn from_body(status: StatusCode, body: &[u8]) -> Self {
        let problem = serde_json::from_slice::<Problem>(body).unwrap_or_default();
        let detail = problem.detail.or(problem.message);

        Self {
            status,
            title: problem
                .title
                .unwrap_or_else(|| Self::DEFAULT_TITLE.to_string()),
            structured: detail.is_some(),
            message: detail.unwrap_or_else(|| status_line(status)),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.title, self.status.as_u16(), self.message)
    }
}

/// "409 Conflict"
pub fn status_line(status: StatusCode) -> String {
    format!(
        "{} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or_default()
    )
    .trim_end()
    .to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Сетевой сбой: DNS, TLS, обрыв соединения, таймаут.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Api(ApiError),

    /// Ответ не разобрался как JSON ожидаемой формы.
    #[error("malformed {context} response: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// JSON разобрался, но не прошёл проверку схемы.
    #[error("invalid {context} response: {source}")]
    Schema {
        context: &'static str,
        #[source]
        source: validator::ValidationErrors,
    },

    #[error("not logged in")]
    Unauthenticated,

    #[error("session expired")]
    SessionExpired,

    #[error("operation cancelled: view was torn down")]
    Cancelled,

    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("session storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("session encoding error: {0}")]
    SessionEncoding(#[source] serde_json::Error),

    #[error("failed to encode query: {0}")]
    Query(#[from] serde_urlencoded::ser::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api(e) => Some(e.status),
            _ => None,
        }
    }

    pub fn is_status(&self, status: StatusCode) -> bool {
        self.status() == Some(status)
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, ClientError::Decode { .. } | ClientError::Schema { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }
}

impl From<ApiError> for ClientError {
    fn from(e: ApiError) -> Self {
        ClientError::Api(e)
    }
}
