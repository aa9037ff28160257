use std::sync::Arc;

use tracing::info;

use super::reported;
use crate::controllers::scope::{TeardownHandle, ViewScope};
use crate::error::ClientError;
use crate::models::AdminUser;
use crate::ClientContext;

pub struct AdminUsersPage {
    ctx: Arc<ClientContext>,
    scope: ViewScope,
    users: Vec<AdminUser>,
}

impl AdminUsersPage {
    pub fn new(ctx: Arc<ClientContext>) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            users: Vec::new(),
        }
    }

    pub fn users(&self) -> &[AdminUser] {
        &self.users
    }

    pub fn teardown_handle(&self) -> TeardownHandle {
        self.scope.handle()
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        let result = self
            .scope
            .run(self.ctx.api.get_authed::<Vec<AdminUser>>("/admin/users"))
            .await;
        self.users = reported(&self.ctx.notifier, result)?;
        Ok(())
    }

    /// ADMIN <-> USER
    pub async fn toggle_role(&mut self, user: &AdminUser) -> Result<(), ClientError> {
        let role = user.toggled_role();
        let path = format!("/admin/users/{}/role/{}", user.id, role);
        let result = self.scope.run(self.ctx.api.patch(&path)).await;
        reported(&self.ctx.notifier, result)?;

        info!("User {} is now {}", user.id, role);
        self.load().await
    }

    pub async fn delete(&mut self, user_id: i64) -> Result<(), ClientError> {
        let path = format!("/admin/users/{}", user_id);
        let result = self.scope.run(self.ctx.api.delete(&path)).await;
        reported(&self.ctx.notifier, result)?;

        info!("User {} deleted", user_id);
        self.load().await
    }
}
