use crate::clock::Clock;
use crate::domain::zodiac::{zodiac_of_date, SignRecord};
use crate::domain::{BirthDate, BirthTime, FreeText, YearPillar};
use crate::generation::prompts::SajuPrompt;
use crate::generation::TextGenerator;
use crate::routes::{generate_reading, ApiError, ApiResult, Envelope, GeneratedReading};
use chrono::{Datelike, NaiveDate};
use rocket::serde::json::Json;
use rocket::State;
use std::sync::Arc;
use uuid::Uuid;

#[derive(serde::Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SajuRequest {
    birth_date: String,
    birth_time: Option<String>,
    gender: Option<Gender>,
    topic: Option<String>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SajuReading {
    birth_date: NaiveDate,
    year_pillar: YearPillar,
    zodiac: &'static SignRecord,
    #[serde(flatten)]
    generated: GeneratedReading,
}

#[tracing::instrument(
    name = "Generate a saju reading",
    skip(body, generator, clock),
    fields(request_id = %Uuid::new_v4())
)]
#[post("/api/saju", data = "<body>")]
pub async fn generate_saju(
    body: Json<SajuRequest>,
    generator: &State<Arc<dyn TextGenerator>>,
    clock: &State<Clock>,
) -> ApiResult<SajuReading> {
    let request = body.into_inner();
    let birth_date =
        BirthDate::parse(&request.birth_date, clock.today()).map_err(ApiError::ValidationError)?;
    let birth_time = match request.birth_time.as_deref().map(str::trim) {
        Some(time) if !time.is_empty() => {
            Some(BirthTime::parse(time).map_err(ApiError::ValidationError)?)
        }
        _ => None,
    };
    let topic = FreeText::parse_optional(request.topic).map_err(ApiError::ValidationError)?;
    let year_pillar = YearPillar::for_year(birth_date.date().year());

    let prompt = SajuPrompt {
        birth_date: &birth_date,
        birth_time: birth_time.as_ref(),
        gender: request.gender.as_ref().map(Gender::as_str),
        pillar: &year_pillar,
        topic: topic.as_ref().map(FreeText::as_str),
    }
    .render();
    let generated = generate_reading(generator.inner().as_ref(), &prompt).await?;

    Ok(Envelope::ok(SajuReading {
        birth_date: birth_date.date(),
        year_pillar,
        zodiac: zodiac_of_date(birth_date.date()),
        generated,
    }))
}
