use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::scope::{TeardownHandle, ViewScope};
use crate::error::ClientError;
use crate::models::Booking;
use crate::notifications::Fallback;
use crate::ClientContext;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BookingFilter {
    #[default]
    Upcoming,
    Past,
    All,
}

/* ---------- filtering ---------- */

/// upcoming: сеанс не раньше `now`, по возрастанию времени;
/// past: сеанс раньше `now`, по убыванию; all: всё по убыванию.
pub fn filter_bookings<'a>(
    bookings: &'a [Booking],
    filter: BookingFilter,
    now: DateTime<Utc>,
) -> Vec<&'a Booking> {
    let mut visible: Vec<&Booking> = bookings
        .iter()
        .filter(|b| match filter {
            BookingFilter::Upcoming => b.screening_datetime >= now,
            BookingFilter::Past => b.screening_datetime < now,
            BookingFilter::All => true,
        })
        .collect();

    match filter {
        BookingFilter::Upcoming => visible.sort_by_key(|b| b.screening_datetime),
        BookingFilter::Past | BookingFilter::All => {
            visible.sort_by(|a, b| b.screening_datetime.cmp(&a.screening_datetime))
        }
    }
    visible
}

/* ---------- page ---------- */

pub struct BookingHistoryPage {
    ctx: Arc<ClientContext>,
    scope: ViewScope,
    bookings: Vec<Booking>,
    filter: BookingFilter,
}

impl BookingHistoryPage {
    pub fn new(ctx: Arc<ClientContext>) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            bookings: Vec::new(),
            filter: BookingFilter::default(),
        }
    }

    pub fn teardown_handle(&self) -> TeardownHandle {
        self.scope.handle()
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn filter(&self) -> BookingFilter {
        self.filter
    }

    /// Загружается один раз; фильтры работают по загруженному списку.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let result = self
            .scope
            .run(self.ctx.api.get_authed::<Vec<Booking>>("/bookings/me"))
            .await;

        match result {
            Ok(bookings) => {
                info!("Loaded {} bookings", bookings.len());
                self.bookings = bookings;
                Ok(())
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(e) => {
                self.ctx.notifier.surface(&e, Fallback::Status);
                Err(e)
            }
        }
    }

    pub fn set_filter(&mut self, filter: BookingFilter) {
        self.filter = filter;
    }

    pub fn visible(&self, now: DateTime<Utc>) -> Vec<&Booking> {
        filter_bookings(&self.bookings, self.filter, now)
    }
}
