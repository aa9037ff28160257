//! Залы и сеансы на выбранную дату.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Method;
use serde::Serialize;
use tracing::{info, warn};

use super::reported;
use crate::controllers::scope::{TeardownHandle, ViewScope};
use crate::error::ClientError;
use crate::models::{Movie, MovieQuery, Page, Screening, Theater};
use crate::ClientContext;

/// Для выбора фильма в форме сеанса читается не больше стольких страниц `/movies`.
pub const MOVIE_PICKER_PAGES: u32 = 5;

#[derive(Debug, Serialize)]
struct DateQuery {
    date: NaiveDate,
}

#[derive(Debug, Serialize)]
struct EmptyBody {}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreeningForm {
    pub movie_id: Option<i64>,
    pub theater_id: Option<i64>,
    pub datetime: Option<DateTime<Utc>>,
    pub ticket_price: Option<f64>,
}

/// Тело `POST /admin/screenings` и `PUT /admin/screenings/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningRequest {
    pub movie_id: i64,
    pub theater_id: i64,
    pub datetime: DateTime<Utc>,
    pub ticket_price: f64,
}

impl ScreeningForm {
    pub fn from_screening(screening: &Screening) -> Self {
        Self {
            movie_id: Some(screening.movie_id),
            theater_id: Some(screening.theater_id),
            datetime: Some(screening.datetime),
            ticket_price: Some(screening.ticket_price),
        }
    }

    pub fn request(&self) -> Option<ScreeningRequest> {
        Some(ScreeningRequest {
            movie_id: self.movie_id?,
            theater_id: self.theater_id?,
            datetime: self.datetime?,
            ticket_price: self.ticket_price.filter(|p| *p > 0.0)?,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.request().is_some()
    }
}

pub struct AdminTheatersPage {
    ctx: Arc<ClientContext>,
    scope: ViewScope,
    theaters: Vec<Theater>,
    movies: Vec<Movie>,
    date: NaiveDate,
    screenings: Vec<Screening>,
    pub form: ScreeningForm,
    editing: Option<(i64, ScreeningForm)>,
}

impl AdminTheatersPage {
    /// Дата по умолчанию - сегодняшняя по UTC.
    pub fn new(ctx: Arc<ClientContext>) -> Self {
        Self::with_date(ctx, Utc::now().date_naive())
    }

    pub fn with_date(ctx: Arc<ClientContext>, date: NaiveDate) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            theaters: Vec::new(),
            movies: Vec::new(),
            date,
            screenings: Vec::new(),
            form: ScreeningForm::default(),
            editing: None,
        }
    }

    pub fn theaters(&self) -> &[Theater] {
        &self.theaters
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn screenings(&self) -> &[Screening] {
        &self.screenings
    }

    pub fn editing(&self) -> Option<i64> {
        self.editing.as_ref().map(|(id, _)| *id)
    }

    pub fn edit_form(&mut self) -> Option<&mut ScreeningForm> {
        self.editing.as_mut().map(|(_, form)| form)
    }

    pub fn teardown_handle(&self) -> TeardownHandle {
        self.scope.handle()
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.load_theaters().await?;
        self.load_movies().await?;
        self.load_screenings().await
    }

    pub async fn set_date(&mut self, date: NaiveDate) -> Result<(), ClientError> {
        self.date = date;
        self.load_screenings().await
    }

    async fn load_theaters(&mut self) -> Result<(), ClientError> {
        let result = self
            .scope
            .run(self.ctx.api.get::<Vec<Theater>>("/theaters"))
            .await;
        self.theaters = reported(&self.ctx.notifier, result)?;
        Ok(())
    }

    async fn load_screenings(&mut self) -> Result<(), ClientError> {
        let query = DateQuery { date: self.date };
        let result = self
            .scope
            .run(self.ctx.api.get_query::<_, Vec<Screening>>("/screenings", &query))
            .await;
        self.screenings = reported(&self.ctx.notifier, result)?;
        Ok(())
    }

    /// Первые страницы каталога; ошибка на середине оставляет то, что успели прочитать.
    async fn load_movies(&mut self) -> Result<(), ClientError> {
        let mut movies = Vec::new();
        for page in 0..MOVIE_PICKER_PAGES {
            let query = MovieQuery::page(page);
            let result = self
                .scope
                .run(self.ctx.api.get_query::<_, Page<Movie>>("/movies", &query))
                .await;

            let chunk = match result {
                Ok(chunk) => chunk,
                Err(ClientError::Cancelled) => return Err(ClientError::Cancelled),
                Err(e) => {
                    warn!("Movie picker stopped at page {}: {}", page, e);
                    break;
                }
            };
            if chunk.content.is_empty() {
                break;
            }
            let last = !chunk.has_next();
            movies.extend(chunk.content);
            if last {
                break;
            }
        }

        self.movies = movies;
        Ok(())
    }

    /* ---------- theaters ---------- */

    /// Зал создаётся пустым телом; номер назначает сервер.
    pub async fn create_theater(&mut self) -> Result<(), ClientError> {
        let result = self
            .scope
            .run(self.ctx.api.send(Method::POST, "/admin/theaters", &EmptyBody {}))
            .await;
        reported(&self.ctx.notifier, result)?;
        self.load_theaters().await
    }

    /// Сеансы удалённого зала тоже пропадают, поэтому перечитываются оба списка.
    pub async fn delete_theater(&mut self, theater_id: i64) -> Result<(), ClientError> {
        let path = format!("/admin/theaters/{}", theater_id);
        let result = self.scope.run(self.ctx.api.delete(&path)).await;
        reported(&self.ctx.notifier, result)?;

        info!("Theater {} deleted", theater_id);
        self.load_theaters().await?;
        self.load_screenings().await
    }

    /* ---------- screenings ---------- */

    pub async fn create_screening(&mut self) -> Result<bool, ClientError> {
        let Some(request) = self.form.request() else {
            return Ok(false);
        };

        let result = self
            .scope
            .run(self.ctx.api.send(Method::POST, "/admin/screenings", &request))
            .await;
        reported(&self.ctx.notifier, result)?;

        info!("Screening created: movie {} in theater {} at {}", request.movie_id, request.theater_id, request.datetime);
        self.form = ScreeningForm::default();
        self.load_screenings().await?;
        Ok(true)
    }

    pub fn start_edit(&mut self, screening: &Screening) {
        self.editing = Some((screening.id, ScreeningForm::from_screening(screening)));
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

        let path = format!("/admin/screenings/{}", id);
        let result = self
            .scope
            .run(self.ctx.api.send(Method::PUT, &path, &request))
            .await;
        reported(&self.ctx.notifier, result)?;

        self.editing = None;
        self.load_screenings().await?;
        Ok(true)
    }

    pub async fn delete_screening(&mut self, screening_id: i64) -> Result<(), ClientError> {
        let path = format!("/admin/screenings/{}", screening_id);
        let result = self.scope.run(self.ctx.api.delete(&path)).await;
        reported(&self.ctx.notifier, result)?;
        self.load_screenings().await
    }
}
