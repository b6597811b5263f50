use crate::domain::DailySelection;
use crate::routes::{ApiError, ApiResult, Envelope};
use crate::clock::Clock;
use chrono::NaiveDate;
use rocket::State;

#[tracing::instrument(name = "Select daily content", skip(clock))]
#[get("/api/daily?<date>")]
pub fn daily_selection(date: Option<&str>, clock: &State<Clock>) -> ApiResult<DailySelection> {
    let date = match date {
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| ApiError::ValidationError(format!("'{}' is not a YYYY-MM-DD date.", date)))?,
        None => clock.today(),
    };
    Ok(Envelope::ok(DailySelection::for_date(date)))
}
