//! Список сеансов фильма на выбранную дату.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use super::scope::{TeardownHandle, ViewScope};
use crate::error::ClientError;
use crate::models::Screening;
use crate::notifications::Fallback;
use crate::routes::Route;
use crate::ClientContext;

pub const LOAD_FAILED: &str = "Failed to load screenings";

#[derive(Debug, Serialize)]
struct DateQuery {
    date: NaiveDate,
}

/// Строка списка: ссылка на выбор мест есть только у доступного сеанса.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningEntry<'a> {
    pub screening: &'a Screening,
    pub unavailable: bool,
    pub link: Option<Route>,
}

pub struct ScreeningsPage {
    ctx: Arc<ClientContext>,
    scope: ViewScope,
    movie_id: i64,
    date: NaiveDate,
    screenings: Vec<Screening>,
}

impl ScreeningsPage {
    /// Дата по умолчанию - сегодняшняя по местному календарю, а не по UTC.
    pub fn new(ctx: Arc<ClientContext>, movie_id: i64) -> Self {
        Self::with_date(ctx, movie_id, Local::now().date_naive())
    }

    pub fn with_date(ctx: Arc<ClientContext>, movie_id: i64, date: NaiveDate) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            movie_id,
            date,
            screenings: Vec::new(),
        }
    }

    pub fn movie_id(&self) -> i64 {
        self.movie_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn screenings(&self) -> &[Screening] {
        &self.screenings
    }

    pub fn teardown_handle(&self) -> TeardownHandle {
        self.scope.handle()
    }

    pub fn teardown(&self) {
        self.scope.teardown();
    }

    /// Полностью заменяет список. При ошибке список пуст, а ошибка уже показана.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let path = format!("/movies/{}/screenings", self.movie_id);
        let query = DateQuery { date: self.date };
        let result = self
            .scope
            .run(self.ctx.api.get_query::<_, Vec<Screening>>(&path, &query))
            .await;

        match result {
            Ok(screenings) => {
                info!("Loaded {} screenings for movie {} on {}", screenings.len(), self.movie_id, self.date);
                self.screenings = screenings;
                Ok(())
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(e) => {
                self.screenings.clear();
                self.ctx.notifier.surface(&e, Fallback::Message(LOAD_FAILED));
                Err(e)
            }
        }
    }

    pub async fn set_date(&mut self, date: NaiveDate) -> Result<(), ClientError> {
        self.date = date;
        self.load().await
    }

    pub async fn set_movie(&mut self, movie_id: i64) -> Result<(), ClientError> {
        self.movie_id = movie_id;
        self.load().await
    }

    /// Доступность считается на момент отрисовки `now` и без запроса не пересчитывается.
    pub fn entries(&self, now: DateTime<Utc>) -> Vec<ScreeningEntry<'_>> {
        self.screenings
            .iter()
            .map(|screening| {
                let unavailable = screening.is_unavailable(now);
                ScreeningEntry {
                    screening,
                    unavailable,
                    link: (!unavailable).then(|| Route::Seats {
                        movie_id: self.movie_id,
                        screening_id: screening.id,
                    }),
                }
            })
            .collect()
    }
}
