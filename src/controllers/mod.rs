pub mod scope;
pub mod catalog;
pub mod login;
pub mod movie_detail;
pub mod screenings;
pub mod seat_booking;
pub mod bookings;
pub mod admin;

pub use scope::{TeardownHandle, ViewScope};
pub use catalog::CatalogPage;
pub use login::{LoginPage, SignupPage};
pub use movie_detail::{MovieDetailPage, ReviewOutcome};
pub use screenings::{ScreeningEntry, ScreeningsPage};
pub use seat_booking::{BookingOutcome, BookingPhase, SeatBookingPage, SeatGrid, SeatState, Selection};
pub use bookings::{filter_bookings, BookingFilter, BookingHistoryPage};
