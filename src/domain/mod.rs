mod birth_date;
pub mod daily;
mod free_text;
mod reading_kind;
pub mod saju;
mod session_id;
mod subscriber_email;
pub mod tarot;
pub mod zodiac;

pub use birth_date::{BirthDate, BirthTime};
pub use daily::DailySelection;
pub use free_text::FreeText;
pub use reading_kind::ReadingKind;
pub use saju::YearPillar;
pub use session_id::SessionId;
pub use subscriber_email::SubscriberEmail;
pub use tarot::TarotCard;
pub use zodiac::{zodiac_of, ZodiacSign};
