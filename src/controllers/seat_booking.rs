//! seat_booking.rs
//!
//! Выбор мест и оформление бронирования.
//!
//! Состояния страницы:
//! 1.  **Selecting**: начальное; пользователь отмечает свободные места.
//! 2.  **Submitting**: запрос `POST /bookings` в полёте.
//! 3.  **Booked**: бронь создана, страница уходит на историю бронирований.
//!
//! Ответ 409 означает, что часть мест заняли параллельно: выбор очищается, карта мест
//! перечитывается с сервера, и только после этого можно выбирать снова.

use std::sync::Arc;

use tracing::{info, warn};

use super::scope::{TeardownHandle, ViewScope};
use crate::error::ClientError;
use crate::api_client::decode;
use crate::models::seat::MAX_SEAT_NUMBER;
use crate::models::{BookingReceipt, BookingRequest, Screening, Seat};
use crate::notifications::Fallback;
use crate::routes::Route;
use crate::ClientContext;

pub const SEATS_TAKEN: &str = "Some seats were just taken. Please reselect.";
pub const SEATS_LOAD_FAILED: &str = "Failed to load seats";
pub const SCREENING_LOAD_FAILED: &str = "Failed to load screening";

/// Ширина сетки, если мест нет вовсе.
pub const FALLBACK_COLUMNS: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingPhase {
    Selecting,
    Submitting,
    Booked,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookingOutcome {
    /// Бронь создана; интерфейс переходит на `navigate`.
    /// `receipt` пуст, если сервер не прислал разбираемое тело.
    Booked { receipt: Option<BookingReceipt>, navigate: Route },
    /// Нет сессии (или сервер её отверг): переход на вход, запрос не отправлялся.
    LoginRequired(Route),
    /// 409: выбор очищен, карта мест перечитана.
    Conflict,
    Rejected,
    NothingSelected,
}

/// Выбранные места в порядке выбора. Всегда подмножество свободных мест последней загрузки.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<i64>,
}

impl Selection {
    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, seat_id: i64) -> bool {
        self.ids.contains(&seat_id)
    }

    /// Занятые и неизвестные места не меняют выбор. Возвращает `true`, если выбор изменился.
    pub fn toggle(&mut self, seats: &[Seat], seat_id: i64) -> bool {
        match seats.iter().find(|s| s.id == seat_id) {
            Some(seat) if !seat.taken => {}
            _ => return false,
        }

        if let Some(pos) = self.ids.iter().position(|id| *id == seat_id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(seat_id);
        }
        true
    }

    pub fn retain_free(&mut self, seats: &[Seat]) {
        self.ids
            .retain(|id| seats.iter().any(|s| s.id == *id && !s.taken));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// 0, пока цена неизвестна.
    pub fn total(&self, ticket_price: Option<f64>) -> f64 {
        ticket_price.map_or(0.0, |price| self.ids.len() as f64 * price)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatState {
    Free,
    Selected,
    Taken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatCell {
    pub seat_id: i64,
    pub label: String,
    pub state: SeatState,
}

/// Ряд сетки. `cells[n - 1]` - место с номером `n`; отсутствующие номера дают `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatRow {
    pub label: String,
    pub cells: Vec<Option<SeatCell>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatGrid {
    pub columns: u32,
    pub rows: Vec<SeatRow>,
}

impl SeatGrid {
    /// Ряды идут в порядке первого появления в ответе сервера, а не по алфавиту.
    /// Места с номером вне `1..=MAX_SEAT_NUMBER` не рисуются.
    pub fn layout(seats: &[Seat], selection: &Selection) -> Self {
        let columns = seats
            .iter()
            .map(|s| s.number)
            .filter(|n| *n <= MAX_SEAT_NUMBER)
            .max()
            .unwrap_or(FALLBACK_COLUMNS);

        let mut rows: Vec<SeatRow> = Vec::new();
        for seat in seats {
            let Some(column) = seat.number.checked_sub(1).filter(|c| *c < columns) else {
                continue;
            };
            let index = match rows.iter().position(|r| r.label == seat.row) {
                Some(index) => index,
                None => {
                    rows.push(SeatRow {
                        label: seat.row.clone(),
                        cells: vec![None; columns as usize],
                    });
                    rows.len() - 1
                }
            };

            let state = if seat.taken {
                SeatState::Taken
            } else if selection.contains(seat.id) {
                SeatState::Selected
            } else {
                SeatState::Free
            };

            let slot = &mut rows[index].cells[column as usize];
            if slot.is_none() {
                *slot = Some(SeatCell {
                    seat_id: seat.id,
                    label: seat.label(),
                    state,
                });
            }
        }

        Self { columns, rows }
    }
}

pub struct SeatBookingPage {
    ctx: Arc<ClientContext>,
    scope: ViewScope,
    movie_id: i64,
    screening_id: Option<i64>,
    seats: Vec<Seat>,
    screening: Option<Screening>,
    selection: Selection,
    phase: BookingPhase,
}

impl SeatBookingPage {
    pub fn new(ctx: Arc<ClientContext>, movie_id: i64, screening_id: Option<i64>) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            movie_id,
            screening_id,
            seats: Vec::new(),
            screening: None,
            selection: Selection::default(),
            phase: BookingPhase::Selecting,
        }
    }

    pub fn movie_id(&self) -> i64 {
        self.movie_id
    }

    pub fn screening_id(&self) -> Option<i64> {
        self.screening_id
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn screening(&self) -> Option<&Screening> {
        self.screening.as_ref()
    }

    pub fn ticket_price(&self) -> Option<f64> {
        self.screening.as_ref().map(|s| s.ticket_price)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn phase(&self) -> BookingPhase {
        self.phase
    }

    pub fn teardown_handle(&self) -> TeardownHandle {
        self.scope.handle()
    }

    pub fn teardown(&self) {
        self.scope.teardown();
    }

    /// Загружает карту мест и сеанс (ради цены). Запросы независимы и идут параллельно;
    /// каждый обновляет только своё поле.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let Some(screening_id) = self.screening_id else {
            return Ok(());
        };

        let seats_path = format!("/screenings/{}/seats", screening_id);
        let screening_path = format!("/screenings/{}", screening_id);
        let (seats, screening) = tokio::join!(
            self.scope.run(self.ctx.api.get::<Vec<Seat>>(&seats_path)),
            self.scope.run(self.ctx.api.get::<Screening>(&screening_path)),
        );

        let seats_result = self.apply_seats(seats);
        let screening_result = match screening {
            Ok(screening) => {
                self.screening = Some(screening);
                Ok(())
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(e) => {
                self.ctx.notifier.surface(&e, Fallback::Message(SCREENING_LOAD_FAILED));
                Err(e)
            }
        };

        seats_result.and(screening_result)
    }

    /// Переход на другой сеанс: выбор начинается заново.
    pub async fn set_screening(&mut self, screening_id: i64) -> Result<(), ClientError> {
        self.screening_id = Some(screening_id);
        self.seats.clear();
        self.screening = None;
        self.selection.clear();
        self.phase = BookingPhase::Selecting;
        self.load().await
    }

    pub async fn reload_seats(&mut self) -> Result<(), ClientError> {
        let Some(screening_id) = self.screening_id else {
            return Ok(());
        };
        let path = format!("/screenings/{}/seats", screening_id);
        let seats = self.scope.run(self.ctx.api.get::<Vec<Seat>>(&path)).await;
        self.apply_seats(seats)
    }

    fn apply_seats(&mut self, seats: Result<Vec<Seat>, ClientError>) -> Result<(), ClientError> {
        match seats {
            Ok(seats) => {
                info!("Loaded {} seats for screening {:?}", seats.len(), self.screening_id);
                self.seats = seats;
                self.selection.retain_free(&self.seats);
                Ok(())
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(e) => {
                self.ctx.notifier.surface(&e, Fallback::Message(SEATS_LOAD_FAILED));
                Err(e)
            }
        }
    }

    /// Во время отправки выбор заморожен.
    pub fn toggle_seat(&mut self, seat_id: i64) -> bool {
        self.phase == BookingPhase::Selecting && self.selection.toggle(&self.seats, seat_id)
    }

    /// Итог для отображения; настоящую цену считает сервер при создании брони.
    pub fn total(&self) -> f64 {
        self.selection.total(self.ticket_price())
    }

    pub fn can_submit(&self) -> bool {
        self.phase == BookingPhase::Selecting && !self.selection.is_empty()
    }

    pub fn grid(&self) -> SeatGrid {
        SeatGrid::layout(&self.seats, &self.selection)
    }

    pub async fn submit_booking(&mut self) -> Result<BookingOutcome, ClientError> {
        if !self.can_submit() {
            return Ok(BookingOutcome::NothingSelected);
        }
        let Some(screening_id) = self.screening_id else {
            return Ok(BookingOutcome::NothingSelected);
        };

        // Без сессии на сервер не ходим; выбор останется только в памяти
        if !self.ctx.session.is_authenticated() {
            info!("Booking requires login, redirecting");
            return Ok(BookingOutcome::LoginRequired(Route::Login { session_expired: false }));
        }

        let request = BookingRequest {
            screening_id,
            seat_ids: self.selection.ids().to_vec(),
        };
        info!("Submitting booking for screening {}: seats {:?}", screening_id, request.seat_ids);
        self.phase = BookingPhase::Submitting;

        let result = self
            .scope
            .run(self.ctx.api.post_raw("/bookings", &request))
            .await;

        match result {
            // Любой 2xx значит, что места уже выкуплены; тело нужно только для лога
            Ok(body) => {
                let receipt = if body.is_empty() {
                    warn!("Booking for screening {} created, server sent no body", screening_id);
                    None
                } else {
                    match decode::<BookingReceipt>(&body) {
                        Ok(receipt) => {
                            info!("Booking {} created, total {}", receipt.id, receipt.total_price);
                            Some(receipt)
                        }
                        Err(e) => {
                            warn!("Booking for screening {} created, unreadable receipt: {}", screening_id, e);
                            None
                        }
                    }
                };
                self.phase = BookingPhase::Booked;
                self.selection.clear();
                Ok(BookingOutcome::Booked {
                    receipt,
                    navigate: Route::Bookings,
                })
            }
            Err(ClientError::Cancelled) => {
                self.phase = BookingPhase::Selecting;
                Err(ClientError::Cancelled)
            }
            Err(e) if e.is_status(reqwest::StatusCode::CONFLICT) => {
                warn!("Seats conflict on screening {}, resynchronizing", screening_id);
                self.phase = BookingPhase::Selecting;
                self.selection.clear();
                self.ctx.notifier.notify(SEATS_TAKEN);
                // Ошибка перечитывания уже показана; бронь всё равно не создана
                if let Err(ClientError::Cancelled) = self.reload_seats().await {
                    return Err(ClientError::Cancelled);
                }
                Ok(BookingOutcome::Conflict)
            }
            Err(ClientError::SessionExpired) => {
                self.phase = BookingPhase::Selecting;
                self.ctx.notifier.surface(&ClientError::SessionExpired, Fallback::Silent);
                Ok(BookingOutcome::LoginRequired(Route::Login { session_expired: true }))
            }
            Err(e) => {
                self.phase = BookingPhase::Selecting;
                self.ctx.notifier.surface(&e, Fallback::Silent);
                Ok(BookingOutcome::Rejected)
            }
        }
    }
}
