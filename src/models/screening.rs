use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Сеанс: фильм в конкретном зале в конкретное время.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Screening {
    pub id: i64,
    pub datetime: DateTime<Utc>,
    #[validate(range(min = 0.0))]
    pub ticket_price: f64,
    pub movie_id: i64,
    pub theater_id: i64,
    /// Сервер может не прислать флаг; тогда сеанс считается свободным.
    #[serde(default)]
    pub fully_booked: bool,
}

impl Screening {
    /// Прошедший или полностью выкупленный сеанс нельзя открыть для выбора мест.
    pub fn is_unavailable(&self, now: DateTime<Utc>) -> bool {
        self.datetime < now || self.fully_booked
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Theater {
    pub id: i64,
}
