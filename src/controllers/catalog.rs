use std::sync::Arc;

use tracing::info;

use super::scope::{TeardownHandle, ViewScope};
use crate::error::ClientError;
use crate::models::{Category, Movie, MovieQuery, Page};
use crate::notifications::Fallback;
use crate::ClientContext;

pub const MOVIES_LOAD_FAILED: &str = "Failed to load movies";
pub const CATEGORIES_LOAD_FAILED: &str = "Failed to load categories";

/// Главная страница: поиск по названию и фильтр по категории.
pub struct CatalogPage {
    ctx: Arc<ClientContext>,
    scope: ViewScope,
    query: MovieQuery,
    categories: Vec<Category>,
    movies: Vec<Movie>,
}

impl CatalogPage {
    pub fn new(ctx: Arc<ClientContext>) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            query: MovieQuery::default(),
            categories: Vec::new(),
            movies: Vec::new(),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn query(&self) -> &MovieQuery {
        &self.query
    }

    pub fn teardown_handle(&self) -> TeardownHandle {
        self.scope.handle()
    }

    /// Категории загружаются один раз, фильмы - на каждое изменение фильтра.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let categories = self
            .scope
            .run(self.ctx.api.get::<Vec<Category>>("/categories"))
            .await;

        match categories {
            Ok(categories) => self.categories = categories,
            Err(ClientError::Cancelled) => return Err(ClientError::Cancelled),
            Err(e) => {
                self.ctx.notifier.surface(&e, Fallback::Message(CATEGORIES_LOAD_FAILED));
            }
        }

        self.load_movies().await
    }

    /// Пустая строка поиска снимает фильтр.
    pub async fn set_search(&mut self, text: &str) -> Result<(), ClientError> {
        let text = text.trim();
        self.query.query = (!text.is_empty()).then(|| text.to_string());
        self.load_movies().await
    }

    pub async fn set_category(&mut self, category_id: Option<i64>) -> Result<(), ClientError> {
        self.query.category_id = category_id;
        self.load_movies().await
    }

    async fn load_movies(&mut self) -> Result<(), ClientError> {
        let result = self
            .scope
            .run(self.ctx.api.get_query::<_, Page<Movie>>("/movies", &self.query))
            .await;

        match result {
            Ok(page) => {
                info!("Catalog: {} movies ({} total)", page.content.len(), page.total_elements);
                self.movies = page.content;
                Ok(())
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(e) => {
                self.movies.clear();
                self.ctx.notifier.surface(&e, Fallback::Message(MOVIES_LOAD_FAILED));
                Err(e)
            }
        }
    }
}
