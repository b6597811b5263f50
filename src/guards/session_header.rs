use crate::domain::SessionId;
use anyhow::Context;
use rocket::http::Status;
use rocket::outcome::Outcome::{Error, Success};
use rocket::request::{FromRequest, Outcome};
use rocket::Request;

pub const SESSION_HEADER: &str = "X-Session-Id";

/// The client-minted session id presented in the `X-Session-Id` header.
pub struct SessionHeader(pub SessionId);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for SessionHeader {
    type Error = anyhow::Error;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match from_request_result(request) {
            Ok(session_id) => Success(SessionHeader(session_id)),
            Err(e) => Error((Status::Unauthorized, e)),
        }
    }
}

fn from_request_result(request: &Request) -> Result<SessionId, anyhow::Error> {
    let header_value = request
        .headers()
        .get_one(SESSION_HEADER)
        .context("The 'X-Session-Id' header was missing.")?;

    SessionId::parse(header_value.trim().to_string()).map_err(anyhow::Error::msg)
}
