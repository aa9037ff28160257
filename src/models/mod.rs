pub mod user;
pub mod movie;
pub mod screening;
pub mod seat;
pub mod booking;
pub mod review;

pub use user::{AdminUser, AuthResponse, UserSummary};
pub use movie::{Category, Movie, MovieQuery, Page};
pub use screening::{Screening, Theater};
pub use seat::Seat;
pub use booking::{Booking, BookingReceipt, BookingRequest, Ticket};
pub use review::{Review, ReviewDraft};

use validator::{Validate, ValidationErrors};

/// Проверка ответа сервера на границе клиента.
///
/// Реализуется для всех типов, которые приходят из API, а также для списков и страниц из них.
pub trait Schema {
    fn check(&self) -> Result<(), ValidationErrors>;
}

impl<T: Schema> Schema for Vec<T> {
    fn check(&self) -> Result<(), ValidationErrors> {
        self.iter().try_for_each(Schema::check)
    }
}

impl<T: Schema> Schema for Option<T> {
    fn check(&self) -> Result<(), ValidationErrors> {
        self.as_ref().map_or(Ok(()), Schema::check)
    }
}

macro_rules! validated_schema {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Schema for $ty {
                fn check(&self) -> Result<(), ValidationErrors> {
                    Validate::validate(self)
                }
            }
        )*
    };
}

validated_schema!(
    UserSummary,
    AdminUser,
    AuthResponse,
    Category,
    Movie,
    Screening,
    Theater,
    Seat,
    Booking,
    BookingReceipt,
    Ticket,
    Review,
);
