use crate::clock::Clock;
use crate::domain::daily::DrawnCard;
use crate::domain::{DailySelection, FreeText, TarotCard};
use crate::generation::prompts::TarotPrompt;
use crate::generation::TextGenerator;
use crate::routes::{generate_reading, ApiError, ApiResult, Envelope, GeneratedReading};
use rocket::serde::json::Json;
use rocket::State;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

const MAX_CARDS: usize = 3;

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TarotRequest {
    question: Option<String>,
    cards: Option<Vec<CardChoice>>,
}

#[derive(serde::Deserialize, Debug)]
pub struct CardChoice {
    name: String,
    #[serde(default)]
    reversed: bool,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TarotReading {
    cards: Vec<DrawnCard>,
    question: Option<String>,
    #[serde(flatten)]
    generated: GeneratedReading,
}

fn resolve_cards(choices: Vec<CardChoice>) -> Result<Vec<DrawnCard>, String> {
    if choices.is_empty() || choices.len() > MAX_CARDS {
        return Err(format!("Pick between 1 and {} cards.", MAX_CARDS));
    }
    let mut seen = HashSet::new();
    choices
        .into_iter()
        .map(|choice| {
            let card = TarotCard::by_name(&choice.name)
                .ok_or_else(|| format!("'{}' is not a major arcana card.", choice.name))?;
            if !seen.insert(card.number) {
                return Err(format!("'{}' was picked twice.", card.name));
            }
            Ok(DrawnCard {
                card,
                reversed: choice.reversed,
            })
        })
        .collect()
}

#[tracing::instrument(
    name = "Interpret a tarot spread",
    skip(body, generator, clock),
    fields(request_id = %Uuid::new_v4())
)]
#[post("/api/tarot", data = "<body>")]
pub async fn interpret_tarot(
    body: Json<TarotRequest>,
    generator: &State<Arc<dyn TextGenerator>>,
    clock: &State<Clock>,
) -> ApiResult<TarotReading> {
    let request = body.into_inner();
    let question = FreeText::parse_optional(request.question).map_err(ApiError::ValidationError)?;
    let cards = match request.cards {
        Some(choices) => resolve_cards(choices).map_err(ApiError::ValidationError)?,
        None => DailySelection::for_date(clock.today()).spread,
    };

    let prompt = TarotPrompt {
        cards: &cards,
        question: question.as_ref().map(FreeText::as_str),
    }
    .render();
    let generated = generate_reading(generator.inner().as_ref(), &prompt).await?;

    Ok(Envelope::ok(TarotReading {
        cards,
        question: question.map(FreeText::into_inner),
        generated,
    }))
}
