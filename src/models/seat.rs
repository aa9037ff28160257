use serde::{Deserialize, Serialize};
use validator::Validate;

/// Номер места больше этого считается ошибкой сервера.
pub const MAX_SEAT_NUMBER: u32 = 1000;

/// Место в зале с флагом занятости на момент запроса.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Seat {
    pub id: i64,
    #[validate(length(min = 1))]
    pub row: String,
    #[validate(range(min = 1, max = 1000))]
    pub number: u32,
    pub taken: bool,
}

impl Seat {
    /// Подпись на кнопке: "A7".
    pub fn label(&self) -> String {
        format!("{}{}", self.row, self.number)
    }
}
