use crate::routes::ErrorEnvelope;
use rocket::serde::json::Json;
use rocket::Request;

#[catch(404)]
pub fn unknown_route(req: &Request) -> Json<ErrorEnvelope> {
    ErrorEnvelope::new(format!("No route for {} {}.", req.method(), req.uri().path()))
}
