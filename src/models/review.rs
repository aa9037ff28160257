use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
    #[serde(default)]
    pub text: Option<String>,
    pub user_id: i64,
    pub movie_id: i64,
}

/// Тело `POST`/`PUT /movies/{id}/reviews`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewDraft {
    pub rating: u8,
    pub text: String,
}

impl Default for ReviewDraft {
    fn default() -> Self {
        Self { rating: 5, text: String::new() }
    }
}

impl From<&Review> for ReviewDraft {
    fn from(review: &Review) -> Self {
        Self {
            rating: review.rating,
            text: review.text.clone().unwrap_or_default(),
        }
    }
}
