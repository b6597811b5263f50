use crate::domain::{FreeText, ReadingKind, SessionId, SubscriberEmail};
use crate::email::templates::reading_email;
use crate::email::{Email, EmailDelivery};
use crate::models::{Subscriber, UserSession};
use crate::routes::{ApiError, ApiResult, Envelope};
use crate::startup::LumenDbConn;
use rocket::serde::json::Json;
use rocket::State;
use std::sync::Arc;
use uuid::Uuid;

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingEmailRequest {
    email: String,
    #[serde(rename = "type")]
    kind: String,
    title: Option<String>,
    summary: Option<String>,
    result: serde_json::Value,
    session_id: Option<String>,
    #[serde(default)]
    save_email: bool,
}

#[derive(serde::Serialize)]
pub struct ReadingEmailSent {
    delivery: EmailDelivery,
}

/// Send a reading to the user. Remembering the email on the session and
/// the subscriber list is best effort: failures there are logged and do
/// not fail the request.
#[tracing::instrument(
    name = "Emailing a reading",
    skip(body, conn, email_client),
    fields(
        request_id = %Uuid::new_v4(),
        subscriber_email = %body.email,
        reading_type = %body.kind,
    )
)]
#[post("/api/email/reading", data = "<body>")]
pub async fn email_reading(
    body: Json<ReadingEmailRequest>,
    conn: LumenDbConn,
    email_client: &State<Arc<dyn Email>>,
) -> ApiResult<ReadingEmailSent> {
    let request = body.into_inner();
    let recipient = SubscriberEmail::parse(request.email).map_err(ApiError::ValidationError)?;
    let kind = ReadingKind::parse(&request.kind).map_err(ApiError::ValidationError)?;
    let title = FreeText::parse_optional(request.title).map_err(ApiError::ValidationError)?;
    let summary = FreeText::parse_optional(request.summary).map_err(ApiError::ValidationError)?;
    let session_id = request
        .session_id
        .map(SessionId::parse)
        .transpose()
        .map_err(ApiError::ValidationError)?;

    let rendered = reading_email(
        kind,
        title.as_ref().map(FreeText::as_str),
        summary.as_ref().map(FreeText::as_str),
        &request.result,
    );
    let delivery = email_client
        .send_email(&recipient, &rendered.subject, &rendered.html, &rendered.text)
        .await?;

    remember_recipient(&conn, session_id, recipient, request.save_email).await;

    Ok(Envelope::ok(ReadingEmailSent { delivery }))
}

#[tracing::instrument(name = "Remember the reading recipient", skip(conn))]
async fn remember_recipient(
    conn: &LumenDbConn,
    session_id: Option<SessionId>,
    recipient: SubscriberEmail,
    save_email: bool,
) {
    let failures = conn
        .run(move |c| {
            let mut failures = Vec::new();
            if let Some(session_id) = session_id {
                if let Err(e) = UserSession::upsert(c, &session_id, Some(&recipient), save_email) {
                    failures.push(anyhow::Error::new(e).context("Failed to store the email on the session."));
                }
            }
            if save_email {
                if let Err(e) = Subscriber::upsert(c, &recipient, save_email) {
                    failures.push(anyhow::Error::new(e).context("Failed to store the subscriber."));
                }
            }
            failures
        })
        .await;
    for error in failures {
        tracing::warn!(error.cause_chain = ?error, "Could not remember the reading recipient");
    }
}
