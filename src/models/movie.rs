use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use super::Schema;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Validate)]
pub struct Category {
    pub id: i64,
    #[validate(length(min = 1))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i64,
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(range(min = 0))]
    pub duration: i32,
    #[serde(default)]
    pub description: Option<String>,
    pub release_date: Option<NaiveDate>,
    #[serde(rename = "imageURL", default)]
    pub image_url: Option<String>,
    #[validate(nested)]
    pub category: Option<Category>,
}

/// Страница Spring Data (`/movies` отдаёт по 12 фильмов).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_pages: u32,
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number + 1 < self.total_pages
    }
}

impl<T: Schema> Schema for Page<T> {
    fn check(&self) -> Result<(), ValidationErrors> {
        self.content.check()?;

        // Пустой результат приходит с total_pages = 0
        if self.total_pages > 0 && self.number >= self.total_pages {
            let mut errors = ValidationErrors::new();
            errors.add("number", ValidationError::new("page_out_of_range"));
            return Err(errors);
        }
        if self.content.len() as u64 > self.total_elements {
            let mut errors = ValidationErrors::new();
            errors.add("content", ValidationError::new("more_items_than_total"));
            return Err(errors);
        }
        Ok(())
    }
}

/// Параметры поиска `/movies?query=&categoryId=&page=`; пустые параметры не передаются.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl MovieQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: i64) -> Movie {
        Movie {
            id,
            title: format!("Movie {id}"),
            duration: 100,
            description: None,
            release_date: None,
            image_url: None,
            category: None,
        }
    }

    #[test]
    fn movie_wire_names_match_server() {
        let json = r#"{"id":1,"title":"Dune","duration":155,"description":"Spice","releaseDate":"2021-10-22","imageURL":"https://img/dune.jpg","category":{"id":2,"name":"Sci-Fi"}}"#;
        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.image_url.as_deref(), Some("https://img/dune.jpg"));
        assert_eq!(movie.release_date, NaiveDate::from_ymd_opt(2021, 10, 22));
        assert_eq!(movie.category.unwrap().name, "Sci-Fi");
    }

    #[test]
    fn blank_title_fails_schema() {
        let mut bad = movie(1);
        bad.title.clear();
        assert!(bad.check().is_err());
    }

    #[test]
    fn page_counters_must_be_consistent() {
        let page = Page { content: vec![movie(1), movie(2)], total_pages: 1, number: 0, size: 12, total_elements: 2 };
        assert!(page.check().is_ok());
        assert!(!page.has_next());

        let out_of_range = Page { number: 3, ..page.clone() };
        assert!(out_of_range.check().is_err());

        let empty: Page<Movie> = Page { content: vec![], total_pages: 0, number: 0, size: 12, total_elements: 0 };
        assert!(empty.check().is_ok());
    }

    #[test]
    fn empty_query_params_are_omitted() {
        let query = MovieQuery { query: None, category_id: Some(3), page: None };
        assert_eq!(serde_urlencoded::to_string(&query).unwrap(), "categoryId=3");
        assert_eq!(serde_urlencoded::to_string(MovieQuery::default()).unwrap(), "");
    }
}
