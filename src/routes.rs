use crate::session::SessionStore;

/// Страницы клиента; `path()` совпадает с адресами браузерной версии.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login { session_expired: bool },
    Signup,
    Movie(i64),
    Screenings(i64),
    Seats { movie_id: i64, screening_id: i64 },
    Bookings,
    Admin,
    AdminMovies,
    AdminCategories,
    AdminTheaters,
    AdminUsers,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login { session_expired: false } => "/login".to_string(),
            Route::Login { session_expired: true } => "/login?session=expired".to_string(),
            Route::Signup => "/signup".to_string(),
            Route::Movie(id) => format!("/movies/{}", id),
            Route::Screenings(id) => format!("/movies/{}/screenings", id),
            Route::Seats { movie_id, screening_id } => {
                format!("/movies/{}/seats?screeningId={}", movie_id, screening_id)
            }
            Route::Bookings => "/bookings".to_string(),
            Route::Admin => "/admin".to_string(),
            Route::AdminMovies => "/admin/movies".to_string(),
            Route::AdminCategories => "/admin/categories".to_string(),
            Route::AdminTheaters => "/admin/theaters".to_string(),
            Route::AdminUsers => "/admin/users".to_string(),
        }
    }

    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            Route::Admin
                | Route::AdminMovies
                | Route::AdminCategories
                | Route::AdminTheaters
                | Route::AdminUsers
        )
    }

    /// Куда реально попадёт пользователь: без прав администратора админка ведёт на главную.
    pub fn guard(self, session: &SessionStore) -> Route {
        if self.requires_admin() && !session.is_admin() {
            Route::Home
        } else {
            self
        }
    }
}

/// Пункт меню в шапке.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavLink {
    Page { label: &'static str, route: Route },
    Logout,
}

pub fn nav_links(session: &SessionStore) -> Vec<NavLink> {
    let mut links = vec![NavLink::Page { label: "Home", route: Route::Home }];

    if session.is_authenticated() {
        links.push(NavLink::Page { label: "My bookings", route: Route::Bookings });
    }
    if session.is_admin() {
        links.push(NavLink::Page { label: "Admin", route: Route::Admin });
    }

    if session.is_authenticated() {
        links.push(NavLink::Logout);
    } else {
        links.push(NavLink::Page { label: "Login", route: Route::Login { session_expired: false } });
        links.push(NavLink::Page { label: "Sign up", route: Route::Signup });
    }
    links
}
