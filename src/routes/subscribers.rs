use crate::domain::SubscriberEmail;
use crate::models::Subscriber;
use crate::routes::{ApiError, ApiResult, Envelope};
use crate::startup::LumenDbConn;
use anyhow::Context;
use rocket::serde::json::Json;
use uuid::Uuid;

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    email: String,
    #[serde(default)]
    save_email: bool,
}

#[tracing::instrument(
    name = "Adding a new subscriber",
    skip(body, conn),
    fields(
        request_id = %Uuid::new_v4(),
        subscriber_email = %body.email,
    )
)]
#[post("/api/subscribers", data = "<body>")]
pub async fn subscribe(body: Json<SubscribeRequest>, conn: LumenDbConn) -> ApiResult<Subscriber> {
    let SubscribeRequest { email, save_email } = body.into_inner();
    let email = SubscriberEmail::parse(email).map_err(ApiError::ValidationError)?;
    let subscriber = conn
        .run(move |c| Subscriber::upsert(c, &email, save_email))
        .await
        .context("Failed to upsert the subscriber.")?;
    Ok(Envelope::ok(subscriber))
}
