use crate::routes::ErrorEnvelope;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::Request;

/// Rocket answers 422 when a JSON body is well formed but does not match
/// the expected shape; clients get the same 400 as any other validation
/// failure.
#[catch(422)]
pub fn unprocessable_entity_to_bad_request(_req: &Request) -> status::Custom<Json<ErrorEnvelope>> {
    status::Custom(
        Status::BadRequest,
        ErrorEnvelope::new("The request body is missing fields or has fields of the wrong type."),
    )
}

#[catch(400)]
pub fn bad_request() -> Json<ErrorEnvelope> {
    ErrorEnvelope::new("The request could not be understood.")
}
