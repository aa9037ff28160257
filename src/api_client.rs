use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::config::ApiConfig;
use crate::error::{ApiError, ClientError};
use crate::models::Schema;
use crate::session::SessionStore;

/// Нужен ли запросу токен текущей сессии.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
}

/// Клиент REST API кинотеатра
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: SessionStore) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // === Чтение без авторизации ===

    pub async fn get<T>(&self, path: &str) -> Result<T, ClientError>
    where
        T: DeserializeOwned + Schema,
    {
        let builder = self.request(Method::GET, path, Access::Public)?;
        let body = self.execute(builder, Access::Public).await?;
        decode(&body)
    }

    pub async fn get_query<Q, T>(&self, path: &str, query: &Q) -> Result<T, ClientError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned + Schema,
    {
        self.get(&with_query(path, query)?).await
    }

    /// POST без токена: вход и регистрация.
    pub async fn post_public<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Schema,
    {
        let builder = self.request(Method::POST, path, Access::Public)?.json(body);
        let body = self.execute(builder, Access::Public).await?;
        decode(&body)
    }

    // === Запросы с токеном ===

    pub async fn get_authed<T>(&self, path: &str) -> Result<T, ClientError>
    where
        T: DeserializeOwned + Schema,
    {
        let builder = self.request(Method::GET, path, Access::Authenticated)?;
        let body = self.execute(builder, Access::Authenticated).await?;
        decode(&body)
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Schema,
    {
        self.send_json(Method::POST, path, body).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Schema,
    {
        self.send_json(Method::PUT, path, body).await
    }

    /// Запрос с телом, ответ которого не нужен: после записи страница всё равно перечитывает список.
    pub async fn send<B>(&self, method: Method, path: &str, body: &B) -> Result<(), ClientError>
    where
        B: Serialize + ?Sized,
    {
        let builder = self.request(method, path, Access::Authenticated)?.json(body);
        self.execute(builder, Access::Authenticated).await?;
        Ok(())
    }

    /// POST с токеном; тело ответа возвращается как есть, без проверки схемы.
    pub async fn post_raw<B>(&self, path: &str, body: &B) -> Result<Vec<u8>, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::POST, path, Access::Authenticated)?.json(body);
        self.execute(builder, Access::Authenticated).await
    }

    /// Тело ответа не читается: сервер отвечает 204 или возвращает удалённую запись.
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let builder = self.request(Method::DELETE, path, Access::Authenticated)?;
        self.execute(builder, Access::Authenticated).await?;
        Ok(())
    }

    pub async fn patch(&self, path: &str) -> Result<(), ClientError> {
        let builder = self.request(Method::PATCH, path, Access::Authenticated)?;
        self.execute(builder, Access::Authenticated).await?;
        Ok(())
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Schema,
    {
        let builder = self.request(method, path, Access::Authenticated)?.json(body);
        let body = self.execute(builder, Access::Authenticated).await?;
        decode(&body)
    }

    // === Общая часть ===

    fn request(&self, method: Method, path: &str, access: Access) -> Result<RequestBuilder, ClientError> {
        let url = self.url(path);
        debug!("{} {}", method, url);
        let builder = self.http.request(method, url);

        match access {
            Access::Public => Ok(builder),
            Access::Authenticated => {
                let token = self.session.token().ok_or(ClientError::Unauthenticated)?;
                Ok(builder.bearer_auth(token))
            }
        }
    }

    /// Отправляет запрос и возвращает тело успешного ответа.
    ///
    /// 401 на запрос с токеном означает, что сервер больше не принимает сессию:
    /// она очищается, а вызывающий получает `SessionExpired`.
    async fn execute(&self, builder: RequestBuilder, access: Access) -> Result<Vec<u8>, ClientError> {
        let response = builder.send().await.map_err(|e| {
            error!("Request failed before response: {:?}", e);
            ClientError::Transport(e)
        })?;

        let status = response.status();
        let url = response.url().clone();
        let body = response.bytes().await?.to_vec();

        if status.is_success() {
            return Ok(body);
        }

        if status == StatusCode::UNAUTHORIZED && access == Access::Authenticated {
            warn!("{} rejected the session token, logging out", url);
            if let Err(e) = self.session.clear() {
                error!("Failed to clear rejected session: {}", e);
            }
            return Err(ClientError::SessionExpired);
        }

        let api_error = ApiError::from_body(status, &body);
        warn!("{} -> {}", url, api_error);
        Err(api_error.into())
    }
}

/// Разбирает JSON и проверяет схему ответа.
pub fn decode<T>(body: &[u8]) -> Result<T, ClientError>
where
    T: DeserializeOwned + Schema,
{
    let context = std::any::type_name::<T>();
    let value: T = serde_json::from_slice(body).map_err(|source| {
        error!("Malformed {} response: {}", context, source);
        ClientError::Decode { context, source }
    })?;
    value.check().map_err(|source| {
        error!("Invalid {} response: {}", context, source);
        ClientError::Schema { context, source }
    })?;
    Ok(value)
}

/// "/movies" + {query: "dune"} -> "/movies?query=dune"
pub fn with_query<Q>(path: &str, query: &Q) -> Result<String, ClientError>
where
    Q: Serialize + ?Sized,
{
    let encoded = serde_urlencoded::to_string(query)?;
    Ok(if encoded.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, encoded)
    })
}
