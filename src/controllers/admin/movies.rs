//! Фильмы: постраничная таблица, форма создания и редактирование строки.

use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::Method;
use serde::Serialize;
use tracing::info;

use super::reported;
use crate::controllers::scope::{TeardownHandle, ViewScope};
use crate::error::ClientError;
use crate::models::{Category, Movie, MovieQuery, Page};
use crate::ClientContext;

/// Поля формы фильма в том виде, в каком их редактирует администратор.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieForm {
    pub title: String,
    pub duration: Option<i32>,
    pub description: String,
    pub release_date: Option<NaiveDate>,
    pub image_url: String,
    pub category_id: Option<i64>,
}

/// Тело `POST /admin/movies` и `PUT /admin/movies/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRequest {
    pub title: String,
    pub duration: i32,
    pub description: String,
    pub release_date: NaiveDate,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    pub category_id: i64,
}

impl MovieForm {
    pub fn from_movie(movie: &Movie) -> Self {
        Self {
            title: movie.title.clone(),
            duration: Some(movie.duration),
            description: movie.description.clone().unwrap_or_default(),
            release_date: movie.release_date,
            image_url: movie.image_url.clone().unwrap_or_default(),
            category_id: movie.category.as_ref().map(|c| c.id),
        }
    }

    /// Название, длительность, дата выхода и категория обязательны.
    pub fn is_complete(&self) -> bool {
        self.request().is_some()
    }

    /// Строковые поля обрезаются; `None`, пока форма не заполнена.
    pub fn request(&self) -> Option<MovieRequest> {
        let title = self.title.trim();
        if title.is_empty() {
            return None;
        }
        Some(MovieRequest {
            title: title.to_string(),
            duration: self.duration.filter(|d| *d > 0)?,
            description: self.description.trim().to_string(),
            release_date: self.release_date?,
            image_url: self.image_url.trim().to_string(),
            category_id: self.category_id?,
        })
    }
}

/// Страница, на которую надо перейти после удаления одной строки.
/// Если удалена последняя строка не первой страницы, шаг назад.
pub fn page_after_delete(page: u32, rows_on_page: usize) -> u32 {
    let remaining = rows_on_page.max(1) - 1;
    if remaining == 0 && page > 0 {
        page - 1
    } else {
        page
    }
}

pub struct AdminMoviesPage {
    ctx: Arc<ClientContext>,
    scope: ViewScope,
    categories: Vec<Category>,
    page: u32,
    movies: Option<Page<Movie>>,
    pub form: MovieForm,
    editing: Option<(i64, MovieForm)>,
}

impl AdminMoviesPage {
    pub fn new(ctx: Arc<ClientContext>) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            categories: Vec::new(),
            page: 0,
            movies: None,
            form: MovieForm::default(),
            editing: None,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn movies(&self) -> Option<&Page<Movie>> {
        self.movies.as_ref()
    }

    pub fn editing(&self) -> Option<i64> {
        self.editing.as_ref().map(|(id, _)| *id)
    }

    pub fn edit_form(&mut self) -> Option<&mut MovieForm> {
        self.editing.as_mut().map(|(_, form)| form)
    }

    pub fn teardown_handle(&self) -> TeardownHandle {
        self.scope.handle()
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        let result = self
            .scope
            .run(self.ctx.api.get::<Vec<Category>>("/categories"))
            .await;
        self.categories = reported(&self.ctx.notifier, result)?;
        self.goto(0).await
    }

    pub async fn goto(&mut self, page: u32) -> Result<(), ClientError> {
        let query = MovieQuery::page(page);
        let result = self
            .scope
            .run(self.ctx.api.get_query::<_, Page<Movie>>("/movies", &query))
            .await;
        let movies = reported(&self.ctx.notifier, result)?;

        self.page = page;
        self.movies = Some(movies);
        Ok(())
    }

    /// Незаполненная форма не отправляется (`Ok(false)`).
    pub async fn create(&mut self) -> Result<bool, ClientError> {
        let Some(request) = self.form.request() else {
            return Ok(false);
        };

        let result = self
            .scope
            .run(self.ctx.api.send(Method::POST, "/admin/movies", &request))
            .await;
        reported(&self.ctx.notifier, result)?;

        info!("Movie {:?} created", request.title);
        self.form = MovieForm::default();
        self.goto(0).await?;
        Ok(true)
    }

    pub fn start_edit(&mut self, movie: &Movie) {
        self.editing = Some((movie.id, MovieForm::from_movie(movie)));
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub async fn save_edit(&mut self) -> Result<bool, ClientError> {
        let Some((id, request)) = self
            .editing
            .as_ref()
            .and_then(|(id, form)| Some((*id, form.request()?)))
        else {
            return Ok(false);
        };

        let path = format!("/admin/movies/{}", id);
        let result = self
            .scope
            .run(self.ctx.api.send(Method::PUT, &path, &request))
            .await;
        reported(&self.ctx.notifier, result)?;

        info!("Movie {} updated", id);
        self.editing = None;
        self.goto(self.page).await?;
        Ok(true)
    }

    pub async fn delete(&mut self, movie_id: i64) -> Result<(), ClientError> {
        let path = format!("/admin/movies/{}", movie_id);
        let result = self.scope.run(self.ctx.api.delete(&path)).await;
        reported(&self.ctx.notifier, result)?;

        let rows = self.movies.as_ref().map_or(1, |p| p.content.len());
        let target = page_after_delete(self.page, rows);
        info!("Movie {} deleted, showing page {}", movie_id, target);
        self.goto(target).await
    }
}
