//! auth.rs
//!
//! Вход, регистрация и выход. Сервер выдаёт токен доступа и профиль,
//! которые сохраняются в `SessionStore`.

use serde::Serialize;
use tracing::info;

use crate::api_client::ApiClient;
use crate::error::ClientError;
use crate::models::{AuthResponse, UserSummary};
use crate::session::{Session, SessionStore};

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct SignupRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    session: SessionStore,
}

impl AuthService {
    pub fn new(api: ApiClient, session: SessionStore) -> Self {
        Self { api, session }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<UserSummary, ClientError> {
        info!("Logging in as {}", email);
        let response: AuthResponse = self
            .api
            .post_public("/auth/login", &LoginRequest { email, password })
            .await?;
        self.start_session(response)
    }

    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserSummary, ClientError> {
        info!("Signing up {}", email);
        let response: AuthResponse = self
            .api
            .post_public("/auth/signup", &SignupRequest { username, email, password })
            .await?;
        self.start_session(response)
    }

    pub fn logout(&self) -> Result<(), ClientError> {
        self.session.clear()
    }

    fn start_session(&self, response: AuthResponse) -> Result<UserSummary, ClientError> {
        let user = response.user.clone();
        self.session.set(Session::new(response.access_token, response.user))?;
        Ok(user)
    }
}
