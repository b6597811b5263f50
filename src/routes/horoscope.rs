use crate::clock::Clock;
use crate::domain::zodiac::{zodiac_of_date, SignRecord};
use crate::domain::{BirthDate, FreeText, ZodiacSign};
use crate::generation::prompts::HoroscopePrompt;
use crate::generation::TextGenerator;
use crate::routes::{generate_reading, ApiError, ApiResult, Envelope, GeneratedReading};
use chrono::NaiveDate;
use rocket::serde::json::Json;
use rocket::State;
use std::sync::Arc;
use uuid::Uuid;

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoroscopeRequest {
    sign: Option<String>,
    birth_date: Option<String>,
    topic: Option<String>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoroscopeReading {
    sign: &'static SignRecord,
    date: NaiveDate,
    #[serde(flatten)]
    generated: GeneratedReading,
}

/// An explicit sign wins over a birth date.
fn resolve_sign(request: &HoroscopeRequest, today: NaiveDate) -> Result<&'static SignRecord, String> {
    match (&request.sign, &request.birth_date) {
        (Some(sign), _) => ZodiacSign::parse(sign)
            .map(ZodiacSign::record)
            .map_err(|e| e.to_string()),
        (None, Some(birth_date)) => {
            BirthDate::parse(birth_date, today).map(|d| zodiac_of_date(d.date()))
        }
        (None, None) => Err("Either 'sign' or 'birthDate' is required.".to_string()),
    }
}

#[tracing::instrument(
    name = "Generate a horoscope",
    skip(body, generator, clock),
    fields(
        request_id = %Uuid::new_v4(),
        sign = ?body.sign,
    )
)]
#[post("/api/horoscope", data = "<body>")]
pub async fn generate_horoscope(
    body: Json<HoroscopeRequest>,
    generator: &State<Arc<dyn TextGenerator>>,
    clock: &State<Clock>,
) -> ApiResult<HoroscopeReading> {
    let today = clock.today();
    let request = body.into_inner();
    let sign = resolve_sign(&request, today).map_err(ApiError::ValidationError)?;
    let topic = FreeText::parse_optional(request.topic).map_err(ApiError::ValidationError)?;

    let prompt = HoroscopePrompt {
        sign,
        today,
        topic: topic.as_ref().map(FreeText::as_str),
    }
    .render();
    let generated = generate_reading(generator.inner().as_ref(), &prompt).await?;

    Ok(Envelope::ok(HoroscopeReading {
        sign,
        date: today,
        generated,
    }))
}
