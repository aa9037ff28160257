//! Карточка фильма и отзывы.
//!
//! У пользователя не больше одного отзыва на фильм: если отзыв уже есть, отправка
//! заменяет его (`PUT`), иначе создаёт новый (`POST`). После любой успешной записи
//! список отзывов перечитывается целиком.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use tracing::info;

use super::scope::{TeardownHandle, ViewScope};
use crate::error::ClientError;
use crate::models::{Movie, Review, ReviewDraft};
use crate::notifications::Fallback;
use crate::routes::Route;
use crate::ClientContext;

pub const LOGIN_TO_REVIEW: &str = "Please login to review.";
pub const NOT_ELIGIBLE: &str = "You can only review movies you've seen.";
pub const SUBMIT_FAILED: &str = "Failed to submit review";
pub const DELETE_FAILED: &str = "Failed to delete review";
pub const MOVIE_LOAD_FAILED: &str = "Failed to load movie";
pub const REVIEWS_LOAD_FAILED: &str = "Failed to load reviews";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    Created,
    Updated,
    Deleted,
    /// Нет сессии: запрос не отправлялся.
    LoginRequired,
    /// 403 на отправку: пользователь не был на сеансе этого фильма.
    NotEligible,
    NothingToDelete,
    Rejected,
}

pub struct MovieDetailPage {
    ctx: Arc<ClientContext>,
    scope: ViewScope,
    movie_id: i64,
    movie: Option<Movie>,
    reviews: Vec<Review>,
    draft: ReviewDraft,
}

impl MovieDetailPage {
    pub fn new(ctx: Arc<ClientContext>, movie_id: i64) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            movie_id,
            movie: None,
            reviews: Vec::new(),
            draft: ReviewDraft::default(),
        }
    }

    pub fn movie(&self) -> Option<&Movie> {
        self.movie.as_ref()
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn draft(&self) -> &ReviewDraft {
        &self.draft
    }

    pub fn screenings_route(&self) -> Route {
        Route::Screenings(self.movie_id)
    }

    pub fn teardown_handle(&self) -> TeardownHandle {
        self.scope.handle()
    }

    pub fn my_review(&self) -> Option<&Review> {
        let user_id = self.ctx.session.user_id()?;
        self.reviews.iter().find(|r| r.user_id == user_id)
    }

    /// Оценка ограничивается диапазоном 1..=5.
    pub fn set_rating(&mut self, rating: u8) {
        self.draft.rating = rating.clamp(1, 5);
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.draft.text = text.into();
    }

    /// Фильм и отзывы загружаются независимо; черновик заполняется из своего отзыва.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let movie_path = format!("/movies/{}", self.movie_id);
        let (movie, reviews) = tokio::join!(
            self.scope.run(self.ctx.api.get::<Movie>(&movie_path)),
            self.scope.run(self.fetch_reviews()),
        );

        let movie_result = match movie {
            Ok(movie) => {
                self.movie = Some(movie);
                Ok(())
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(e) => {
                self.ctx.notifier.surface(&e, Fallback::Message(MOVIE_LOAD_FAILED));
                Err(e)
            }
        };

        let reviews_result = match reviews {
            Ok(reviews) => {
                self.reviews = reviews;
                self.draft = self.my_review().map(ReviewDraft::from).unwrap_or_default();
                Ok(())
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(e) => {
                self.ctx.notifier.surface(&e, Fallback::Message(REVIEWS_LOAD_FAILED));
                Err(e)
            }
        };

        movie_result.and(reviews_result)
    }

    pub async fn submit_review(&mut self) -> Result<ReviewOutcome, ClientError> {
        if !self.ctx.session.is_authenticated() {
            self.ctx.notifier.notify(LOGIN_TO_REVIEW);
            return Ok(ReviewOutcome::LoginRequired);
        }

        let (method, outcome) = if self.my_review().is_some() {
            (Method::PUT, ReviewOutcome::Updated)
        } else {
            (Method::POST, ReviewOutcome::Created)
        };
        info!("{} review for movie {} (rating {})", method, self.movie_id, self.draft.rating);

        let path = self.reviews_path();
        let result = self
            .scope
            .run(self.ctx.api.send(method, &path, &self.draft))
            .await;

        match result {
            Ok(()) => {
                self.refresh_reviews().await?;
                Ok(outcome)
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            // 403 на запись отзыва: не был на сеансе
            Err(e) if e.is_status(StatusCode::FORBIDDEN) => {
                self.ctx.notifier.notify(NOT_ELIGIBLE);
                Ok(ReviewOutcome::NotEligible)
            }
            Err(e) => {
                self.ctx.notifier.surface(&e, Fallback::Message(SUBMIT_FAILED));
                Ok(ReviewOutcome::Rejected)
            }
        }
    }

    pub async fn delete_review(&mut self) -> Result<ReviewOutcome, ClientError> {
        if !self.ctx.session.is_authenticated() || self.my_review().is_none() {
            return Ok(ReviewOutcome::NothingToDelete);
        }

        let path = self.reviews_path();
        match self.scope.run(self.ctx.api.delete(&path)).await {
            Ok(()) => {
                info!("Deleted own review for movie {}", self.movie_id);
                self.draft = ReviewDraft::default();
                self.refresh_reviews().await?;
                Ok(ReviewOutcome::Deleted)
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(e) => {
                self.ctx.notifier.surface(&e, Fallback::Message(DELETE_FAILED));
                Ok(ReviewOutcome::Rejected)
            }
        }
    }

    /// Запись уже прошла, поэтому ошибка перечтения только показывается.
    async fn refresh_reviews(&mut self) -> Result<(), ClientError> {
        match self.scope.run(self.fetch_reviews()).await {
            Ok(reviews) => {
                self.reviews = reviews;
                Ok(())
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(e) => {
                self.ctx.notifier.surface(&e, Fallback::Message(REVIEWS_LOAD_FAILED));
                Ok(())
            }
        }
    }

    async fn fetch_reviews(&self) -> Result<Vec<Review>, ClientError> {
        self.ctx.api.get::<Vec<Review>>(&self.reviews_path()).await
    }

    fn reviews_path(&self) -> String {
        format!("/movies/{}/reviews", self.movie_id)
    }
}
