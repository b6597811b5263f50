mod not_found;
mod unprocessable_entity;

pub use not_found::*;
pub use unprocessable_entity::*;

use crate::routes::ErrorEnvelope;
use rocket::serde::json::Json;

#[catch(401)]
pub fn unauthorized() -> Json<ErrorEnvelope> {
    ErrorEnvelope::new("A valid 'X-Session-Id' header is required.")
}

#[catch(500)]
pub fn internal_error() -> Json<ErrorEnvelope> {
    ErrorEnvelope::new("Something went wrong.")
}
