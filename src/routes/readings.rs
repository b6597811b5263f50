use crate::domain::{FreeText, ReadingKind, SubscriberEmail};
use crate::guards::SessionOwner;
use crate::models::{NewReading, Reading, Subscriber};
use crate::routes::{ApiError, ApiResult, Envelope};
use crate::startup::LumenDbConn;
use anyhow::Context;
use chrono::{DateTime, Utc};
use diesel::Connection;
use rocket::serde::json::Json;
use uuid::Uuid;

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReadingRequest {
    email: String,
    #[serde(rename = "type")]
    kind: String,
    topic: Option<String>,
    question: Option<String>,
    result: serde_json::Value,
    summary: Option<String>,
    #[serde(default = "default_save_email")]
    save_email: bool,
}

fn default_save_email() -> bool {
    true
}

#[derive(Debug)]
pub struct ValidReading {
    email: SubscriberEmail,
    kind: ReadingKind,
    topic: Option<FreeText>,
    question: Option<FreeText>,
    result: serde_json::Value,
    summary: Option<FreeText>,
    save_email: bool,
}

impl TryFrom<SaveReadingRequest> for ValidReading {
    type Error = String;

    fn try_from(body: SaveReadingRequest) -> Result<Self, Self::Error> {
        if body.result.is_null() {
            return Err("A reading needs a 'result'.".to_string());
        }
        Ok(ValidReading {
            email: SubscriberEmail::parse(body.email)?,
            kind: ReadingKind::parse(&body.kind)?,
            topic: FreeText::parse_optional(body.topic)?,
            question: FreeText::parse_optional(body.question)?,
            result: body.result,
            summary: FreeText::parse_optional(body.summary)?,
            save_email: body.save_email,
        })
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingView {
    id: Uuid,
    #[serde(rename = "type")]
    kind: String,
    topic: Option<String>,
    question: Option<String>,
    result: serde_json::Value,
    summary: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<Reading> for ReadingView {
    fn from(reading: Reading) -> Self {
        Self {
            id: reading.id,
            kind: reading.reading_type,
            topic: reading.topic,
            question: reading.question,
            result: reading.result,
            summary: reading.summary,
            created_at: reading.created_at,
        }
    }
}

#[tracing::instrument(
    name = "Saving a reading",
    skip(body, conn),
    fields(request_id = %Uuid::new_v4(), reading_type = %body.kind)
)]
#[post("/api/readings", data = "<body>")]
pub async fn save_reading(body: Json<SaveReadingRequest>, conn: LumenDbConn) -> ApiResult<ReadingView> {
    let reading: ValidReading = body
        .into_inner()
        .try_into()
        .map_err(ApiError::ValidationError)?;
    let saved = conn
        .run(move |c| insert_reading(c, &reading))
        .await
        .context("Failed to store the reading.")?;
    Ok(Envelope::ok(saved.into()))
}

fn insert_reading(
    conn: &mut diesel::PgConnection,
    reading: &ValidReading,
) -> diesel::QueryResult<Reading> {
    conn.transaction(|c| {
        let subscriber = Subscriber::upsert(c, &reading.email, reading.save_email)?;
        Reading::insert(
            c,
            &NewReading {
                id: &Uuid::new_v4(),
                subscriber_id: &subscriber.id,
                reading_type: reading.kind.as_str(),
                topic: reading.topic.as_ref().map(FreeText::as_str),
                question: reading.question.as_ref().map(FreeText::as_str),
                result: &reading.result,
                summary: reading.summary.as_ref().map(FreeText::as_str),
                created_at: &Utc::now(),
            },
        )
    })
}

#[derive(FromForm, Debug)]
pub struct ReadingsQuery {
    email: Option<String>,
    #[field(name = "type")]
    kind: Option<String>,
    limit: Option<i64>,
}

#[tracing::instrument(name = "Listing readings", skip(query, conn), fields(request_id = %Uuid::new_v4()))]
#[get("/api/readings?<query..>")]
pub async fn list_readings(query: ReadingsQuery, conn: LumenDbConn) -> ApiResult<Vec<ReadingView>> {
    let email = query
        .email
        .ok_or_else(|| ApiError::ValidationError("'email' is required.".to_string()))
        .and_then(|e| SubscriberEmail::parse(e).map_err(ApiError::ValidationError))?;
    let kind = query
        .kind
        .map(|k| ReadingKind::parse(&k))
        .transpose()
        .map_err(ApiError::ValidationError)?;
    let limit = match query.limit {
        None => DEFAULT_LIMIT,
        Some(limit) if (1..=MAX_LIMIT).contains(&limit) => limit,
        Some(_) => {
            return Err(ApiError::ValidationError(format!(
                "'limit' must be between 1 and {}.",
                MAX_LIMIT
            )))
        }
    };

    let readings = conn
        .run(move |c| match Subscriber::find_by_email(c, &email)? {
            Some(subscriber) => Reading::list_for(c, &subscriber, kind, limit),
            None => Ok(Vec::new()),
        })
        .await
        .context("Failed to list readings.")?;
    Ok(Envelope::ok(readings.into_iter().map(ReadingView::from).collect()))
}

#[derive(serde::Serialize)]
pub struct Deleted {
    id: Uuid,
}

enum DeleteOutcome {
    Deleted,
    NotFound,
    NotOwner,
}

/// Only the session whose stored email owns the reading may delete it.
#[tracing::instrument(
    name = "Deleting a reading",
    skip(owner, conn),
    fields(request_id = %Uuid::new_v4(), session_id = %owner.session_id)
)]
#[delete("/api/readings/<id>")]
pub async fn delete_reading(id: Uuid, owner: SessionOwner, conn: LumenDbConn) -> ApiResult<Deleted> {
    let session_email = owner
        .email
        .ok_or_else(|| ApiError::Forbidden("This session has no email attached.".to_string()))?;
    let outcome = conn
        .run(move |c| {
            c.transaction(|c| match Reading::owner_email(c, id)? {
                None => Ok(DeleteOutcome::NotFound),
                Some(owner_email) if owner_email != session_email => Ok(DeleteOutcome::NotOwner),
                Some(_) => Reading::delete(c, id).map(|_| DeleteOutcome::Deleted),
            })
        })
        .await
        .context("Failed to delete the reading.")?;
    match outcome {
        DeleteOutcome::Deleted => Ok(Envelope::ok(Deleted { id })),
        DeleteOutcome::NotFound => Err(ApiError::NotFound(format!("Reading {} does not exist.", id))),
        DeleteOutcome::NotOwner => Err(ApiError::Forbidden(
            "This reading belongs to somebody else.".to_string(),
        )),
    }
}
