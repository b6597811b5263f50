use crate::clock::Clock;
use crate::domain::{SessionId, SubscriberEmail};
use crate::models::UserSession;
use crate::routes::{ApiError, ApiResult, Envelope};
use crate::startup::LumenDbConn;
use anyhow::Context;
use chrono::Duration;
use rocket::serde::json::Json;
use rocket::State;
use uuid::Uuid;

const DEFAULT_BANNER_DAYS: i64 = 7;
const MAX_BANNER_DAYS: i64 = 365;

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    session_id: Option<String>,
    email: Option<String>,
    #[serde(default)]
    save_email: bool,
}

fn parse_session_id(raw: String) -> Result<SessionId, ApiError> {
    SessionId::parse(raw).map_err(ApiError::ValidationError)
}

/// Create or refresh a session. Clients that have not minted an id yet get
/// one generated here.
#[tracing::instrument(name = "Upserting a session", skip(body, conn), fields(request_id = %Uuid::new_v4()))]
#[post("/api/sessions", data = "<body>")]
pub async fn upsert_session(body: Json<SessionRequest>, conn: LumenDbConn) -> ApiResult<UserSession> {
    let SessionRequest {
        session_id,
        email,
        save_email,
    } = body.into_inner();
    let session_id = match session_id {
        Some(id) => parse_session_id(id)?,
        None => SessionId::generate(),
    };
    let email = match email {
        Some(email) if !email.trim().is_empty() => {
            Some(SubscriberEmail::parse(email).map_err(ApiError::ValidationError)?)
        }
        _ => None,
    };
    let session = conn
        .run(move |c| UserSession::upsert(c, &session_id, email.as_ref(), save_email))
        .await
        .context("Failed to upsert the session.")?;
    Ok(Envelope::ok(session))
}

#[tracing::instrument(name = "Fetching a session", skip(conn), fields(request_id = %Uuid::new_v4()))]
#[get("/api/sessions/<session_id>")]
pub async fn get_session(session_id: String, conn: LumenDbConn) -> ApiResult<UserSession> {
    let session_id = parse_session_id(session_id)?;
    let lookup = session_id.clone();
    conn.run(move |c| UserSession::find(c, &lookup))
        .await
        .context("Failed to fetch the session.")?
        .map(Envelope::ok)
        .ok_or_else(|| ApiError::NotFound(format!("Session {} does not exist.", session_id.as_ref())))
}

#[derive(serde::Deserialize, Default)]
pub struct BannerRequest {
    days: Option<i64>,
}

#[tracing::instrument(name = "Dismissing the install banner", skip(body, conn, clock), fields(request_id = %Uuid::new_v4()))]
#[post("/api/sessions/<session_id>/banner", data = "<body>")]
pub async fn dismiss_banner(
    session_id: String,
    body: Option<Json<BannerRequest>>,
    conn: LumenDbConn,
    clock: &State<Clock>,
) -> ApiResult<UserSession> {
    let session_id = parse_session_id(session_id)?;
    let days = body
        .map(|b| b.into_inner())
        .unwrap_or_default()
        .days
        .unwrap_or(DEFAULT_BANNER_DAYS);
    if !(1..=MAX_BANNER_DAYS).contains(&days) {
        return Err(ApiError::ValidationError(format!(
            "'days' must be between 1 and {}.",
            MAX_BANNER_DAYS
        )));
    }
    let until = clock.now() + Duration::days(days);
    let lookup = session_id.clone();
    conn.run(move |c| UserSession::dismiss_banner_until(c, &lookup, until))
        .await
        .context("Failed to update the session.")?
        .map(Envelope::ok)
        .ok_or_else(|| ApiError::NotFound(format!("Session {} does not exist.", session_id.as_ref())))
}
