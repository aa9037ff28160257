//! Формы входа и регистрации.

use std::sync::Arc;

use tracing::warn;

use crate::error::ClientError;
use crate::notifications::Fallback;
use crate::routes::Route;
use crate::services::AuthService;
use crate::ClientContext;

pub const LOGIN_FAILED: &str = "Login failed";
pub const SIGNUP_FAILED: &str = "Signup failed";

pub struct LoginPage {
    ctx: Arc<ClientContext>,
    auth: AuthService,
    session_expired: bool,
    pub email: String,
    pub password: String,
    error: Option<String>,
}

impl LoginPage {
    /// `session_expired` соответствует `/login?session=expired`.
    pub fn new(ctx: Arc<ClientContext>, session_expired: bool) -> Self {
        let auth = AuthService::new(ctx.api.clone(), ctx.session.clone());
        Self {
            ctx,
            auth,
            session_expired,
            email: String::new(),
            password: String::new(),
            error: None,
        }
    }

    /// Баннер над формой, если пользователя выкинуло по истечении сессии.
    pub fn banner(&self) -> Option<&'static str> {
        self.session_expired
            .then_some(crate::notifications::SESSION_EXPIRED_MESSAGE)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// При успехе возвращает страницу, на которую нужно перейти: всегда главную.
    pub async fn submit(&mut self) -> Result<Route, ClientError> {
        self.error = None;
        match self.auth.login(self.email.trim(), &self.password).await {
            Ok(_) => Ok(Route::Home),
            Err(e) => {
                warn!("Login failed for {}: {}", self.email, e);
                self.error = Some(LOGIN_FAILED.to_string());
                self.ctx.notifier.surface(&e, Fallback::Silent);
                Err(e)
            }
        }
    }
}

pub struct SignupPage {
    ctx: Arc<ClientContext>,
    auth: AuthService,
    pub username: String,
    pub email: String,
    pub password: String,
    error: Option<String>,
}

impl SignupPage {
    pub fn new(ctx: Arc<ClientContext>) -> Self {
        let auth = AuthService::new(ctx.api.clone(), ctx.session.clone());
        Self {
            ctx,
            auth,
            username: String::new(),
            email: String::new(),
            password: String::new(),
            error: None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn submit(&mut self) -> Result<Route, ClientError> {
        self.error = None;
        match self
            .auth
            .signup(self.username.trim(), self.email.trim(), &self.password)
            .await
        {
            Ok(_) => Ok(Route::Home),
            Err(e) => {
                warn!("Signup failed for {}: {}", self.email, e);
                self.error = Some(SIGNUP_FAILED.to_string());
                self.ctx.notifier.surface(&e, Fallback::Silent);
                Err(e)
            }
        }
    }
}
