use crate::domain::zodiac::SignRecord;
use crate::domain::zodiac_of;
use crate::routes::{ApiError, ApiResult, Envelope};

#[tracing::instrument(name = "Look up zodiac sign")]
#[get("/api/zodiac?<month>&<day>")]
pub fn zodiac_sign(month: Option<u32>, day: Option<u32>) -> ApiResult<&'static SignRecord> {
    let (month, day) = match (month, day) {
        (Some(month), Some(day)) => (month, day),
        _ => {
            return Err(ApiError::ValidationError(
                "Both 'month' and 'day' are required.".to_string(),
            ))
        }
    };
    let record = zodiac_of(month, day).map_err(|e| ApiError::ValidationError(e.to_string()))?;
    Ok(Envelope::ok(record))
}
