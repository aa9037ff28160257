use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: i64,
    pub seat_id: i64,
}

/// Бронирование, созданное сервером. Клиент его только показывает.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub screening_id: i64,
    #[serde(default)]
    pub theater_id: Option<i64>,
    #[serde(default)]
    pub movie_title: Option<String>,
    pub screening_datetime: DateTime<Utc>,
    #[validate(range(min = 0.0))]
    pub total_price: f64,
    #[serde(default)]
    #[validate(nested)]
    pub tickets: Vec<Ticket>,
}

/// Ответ `POST /bookings`: только итог и билеты, без данных сеанса.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookingReceipt {
    pub id: i64,
    pub screening_id: i64,
    #[validate(range(min = 0.0))]
    pub total_price: f64,
    #[serde(default)]
    #[validate(nested)]
    pub tickets: Vec<Ticket>,
}

/// Тело `POST /bookings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub screening_id: i64,
    pub seat_ids: Vec<i64>,
}
