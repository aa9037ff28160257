use serde::{Deserialize, Serialize};
use validator::Validate;

/// Профиль текущего пользователя, как его возвращают `/auth/login` и `/auth/signup`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    #[validate(email)]
    pub email: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[validate(length(min = 1))]
    pub access_token: String,
    #[validate(nested)]
    pub user: UserSummary,
}

/// Строка таблицы пользователей в админке.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: i64,
    pub username: Option<String>,
    #[validate(email)]
    pub email: String,
    pub is_admin: bool,
}

impl AdminUser {
    pub fn role(&self) -> &'static str {
        if self.is_admin { "ADMIN" } else { "USER" }
    }

    /// Роль, которую получит пользователь после переключения.
    pub fn toggled_role(&self) -> &'static str {
        if self.is_admin { "USER" } else { "ADMIN" }
    }
}
