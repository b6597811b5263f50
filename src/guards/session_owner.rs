use crate::guards::SessionHeader;
use crate::models::UserSession;
use crate::routes::error_chain_fmt;
use crate::startup::LumenDbConn;
use anyhow::{anyhow, Context};
use rocket::http::Status;
use rocket::outcome::try_outcome;
use rocket::outcome::Outcome::{Error, Success};
use rocket::request::{FromRequest, Outcome};
use rocket::Request;

/// A request made on behalf of a known session. `email` is the address the
/// session has stored, which is what ownership checks compare against.
pub struct SessionOwner {
    pub session_id: String,
    pub email: Option<String>,
    // prevents construction outside of this module
    _private: (),
}

#[derive(thiserror::Error)]
pub enum SessionOwnerError {
    #[error(transparent)]
    InvalidHeader(anyhow::Error),
    #[error("Unknown session.")]
    UnknownSession,
    #[error(transparent)]
    UnexpectedError(anyhow::Error),
}

impl std::fmt::Debug for SessionOwnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl SessionOwnerError {
    fn status(&self) -> Status {
        match self {
            SessionOwnerError::InvalidHeader(_) | SessionOwnerError::UnknownSession => {
                Status::Unauthorized
            }
            SessionOwnerError::UnexpectedError(_) => Status::InternalServerError,
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for SessionOwner {
    type Error = SessionOwnerError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let conn = try_outcome!(request.guard::<LumenDbConn>().await.map_error(|_| (
            Status::InternalServerError,
            SessionOwnerError::UnexpectedError(anyhow!(
                "Failed to retrieve a connection from the DB pool."
            ))
        )));
        let header = try_outcome!(request
            .guard::<SessionHeader>()
            .await
            .map_error(|(status, e)| (status, SessionOwnerError::InvalidHeader(e))));

        match from_request_result(header, conn).await {
            Ok(owner) => Success(owner),
            Err(e) => {
                tracing::warn!(error.cause_chain = ?e, "Could not resolve the session owner");
                Error((e.status(), e))
            }
        }
    }
}

async fn from_request_result(
    header: SessionHeader,
    conn: LumenDbConn,
) -> Result<SessionOwner, SessionOwnerError> {
    let SessionHeader(session_id) = header;
    conn.run(move |c| {
        let session = UserSession::find(c, &session_id)
            .context("Failed to perform a query to look up the session.")
            .map_err(SessionOwnerError::UnexpectedError)?
            .ok_or(SessionOwnerError::UnknownSession)?;

        Ok(SessionOwner {
            session_id: session.session_id,
            email: session.email,
            _private: (),
        })
    })
    .await
}
