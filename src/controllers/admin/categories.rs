use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::reported;
use crate::controllers::scope::{TeardownHandle, ViewScope};
use crate::error::ClientError;
use crate::models::Category;
use crate::ClientContext;

#[derive(Debug, Serialize)]
struct CategoryRequest<'a> {
    name: &'a str,
}

pub struct AdminCategoriesPage {
    ctx: Arc<ClientContext>,
    scope: ViewScope,
    categories: Vec<Category>,
    pub new_name: String,
    editing: Option<(i64, String)>,
}

impl AdminCategoriesPage {
    pub fn new(ctx: Arc<ClientContext>) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            categories: Vec::new(),
            new_name: String::new(),
            editing: None,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn teardown_handle(&self) -> TeardownHandle {
        self.scope.handle()
    }

    pub fn editing(&self) -> Option<i64> {
        self.editing.as_ref().map(|(id, _)| *id)
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        let result = self
            .scope
            .run(self.ctx.api.get::<Vec<Category>>("/categories"))
            .await;
        self.categories = reported(&self.ctx.notifier, result)?;
        Ok(())
    }

    /// Пустое имя игнорируется: возвращает `false` без запроса.
    pub async fn create(&mut self) -> Result<bool, ClientError> {
        let name = self.new_name.trim().to_string();
        if name.is_empty() {
            return Ok(false);
        }

        let request = CategoryRequest { name: &name };
        let result = self
            .scope
            .run(self.ctx.api.send(reqwest::Method::POST, "/admin/categories", &request))
            .await;
        reported(&self.ctx.notifier, result)?;

        info!("Category {:?} created", name);
        self.new_name.clear();
        self.load().await?;
        Ok(true)
    }

    pub fn start_edit(&mut self, category: &Category) {
        self.editing = Some((category.id, category.name.clone()));
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn set_edit_name(&mut self, name: impl Into<String>) {
        if let Some((_, current)) = self.editing.as_mut() {
            *current = name.into();
        }
    }

    pub async fn save_edit(&mut self) -> Result<bool, ClientError> {
        let Some((id, name)) = self.editing.clone() else {
            return Ok(false);
        };
        let name = name.trim();
        if name.is_empty() {
            return Ok(false);
        }

        let path = format!("/admin/categories/{}", id);
        let request = CategoryRequest { name };
        let result = self
            .scope
            .run(self.ctx.api.send(reqwest::Method::PUT, &path, &request))
            .await;
        reported(&self.ctx.notifier, result)?;

        self.editing = None;
        self.load().await?;
        Ok(true)
    }

    pub async fn delete(&mut self, id: i64) -> Result<(), ClientError> {
        let path = format!("/admin/categories/{}", id);
        let result = self.scope.run(self.ctx.api.delete(&path)).await;
        reported(&self.ctx.notifier, result)?;

        info!("Category {} deleted", id);
        self.load().await
    }
}
