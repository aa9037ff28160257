//! Страницы админки. Все изменения идут с токеном администратора, ошибки показываются
//! через `Fallback::Status`, после каждого изменения список перечитывается.

pub mod movies;
pub mod categories;
pub mod theaters;
pub mod users;

pub use categories::AdminCategoriesPage;
pub use movies::{AdminMoviesPage, MovieForm, MovieRequest};
pub use theaters::{AdminTheatersPage, ScreeningForm, ScreeningRequest};
pub use users::AdminUsersPage;

use crate::error::ClientError;
use crate::notifications::{Fallback, Notifier};
use crate::routes::Route;

/// Разделы панели `/admin`.
pub fn sections() -> [(&'static str, Route); 4] {
    [
        ("Movies", Route::AdminMovies),
        ("Categories", Route::AdminCategories),
        ("Theaters & Screenings", Route::AdminTheaters),
        ("Users", Route::AdminUsers),
    ]
}

/// Показывает ошибку админского запроса и возвращает результат без изменений.
fn reported<T>(notifier: &Notifier, result: Result<T, ClientError>) -> Result<T, ClientError> {
    if let Err(e) = &result {
        notifier.surface(e, Fallback::Status);
    }
    result
}
