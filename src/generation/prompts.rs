//! Prompt templates sent to the generation API.
//!
//! Every reading prompt ends with the JSON shape the route expects back;
//! the reply is still only best effort and goes through `extract_json`.

use crate::domain::daily::DrawnCard;
use crate::domain::zodiac::SignRecord;
use crate::domain::{BirthDate, BirthTime, YearPillar};
use chrono::NaiveDate;

pub const CHAT_PERSONA: &str = "You are LUMEN, a warm and thoughtful fortune guide. \
Answer in the language the user writes in. Keep answers under 200 words, \
offer encouragement rather than fatalistic predictions, and never give \
medical, legal or financial advice.";

const READING_SCHEMA: &str = r#"{
  "title": "short headline for the reading",
  "summary": "one or two sentence overview",
  "sections": [{"heading": "area of life", "text": "interpretation"}],
  "advice": "one concrete piece of advice",
  "luckyColor": "a colour",
  "luckyNumber": 7
}"#;

const TAROT_SCHEMA: &str = r#"{
  "title": "short headline for the reading",
  "summary": "one or two sentence overview",
  "cards": [{"name": "card name", "position": "past | present | future", "meaning": "interpretation"}],
  "advice": "one concrete piece of advice"
}"#;

fn respond_with(schema: &str) -> String {
    format!(
        "Respond in Korean. Reply with a single JSON object and nothing else, \
         using exactly this shape:\n{}",
        schema
    )
}

pub struct HoroscopePrompt<'a> {
    pub sign: &'a SignRecord,
    pub today: NaiveDate,
    pub topic: Option<&'a str>,
}

impl HoroscopePrompt<'_> {
    pub fn render(&self) -> String {
        let mut prompt = format!(
            "Write today's horoscope ({}) for {} ({}, {} {}, element: {:?}).\n",
            self.today.format("%Y-%m-%d"),
            self.sign.name,
            self.sign.korean_name,
            self.sign.symbol,
            range_label(self.sign),
            self.sign.element,
        );
        if let Some(topic) = self.topic {
            prompt.push_str(&format!("Focus on this topic: {}\n", topic));
        }
        prompt.push_str(&respond_with(READING_SCHEMA));
        prompt
    }
}

fn range_label(sign: &SignRecord) -> String {
    format!(
        "{}/{} - {}/{}",
        sign.range.start_month, sign.range.start_day, sign.range.end_month, sign.range.end_day
    )
}

pub struct TarotPrompt<'a> {
    pub cards: &'a [DrawnCard],
    pub question: Option<&'a str>,
}

impl TarotPrompt<'_> {
    pub fn render(&self) -> String {
        let positions = ["past", "present", "future"];
        let mut prompt = String::from("Interpret this three card major arcana tarot spread.\n");
        match self.question {
            Some(question) => prompt.push_str(&format!("The querent asks: {}\n", question)),
            None => prompt.push_str("The querent asks for general guidance for today.\n"),
        }
        for (i, drawn) in self.cards.iter().enumerate() {
            let orientation = if drawn.reversed { "reversed" } else { "upright" };
            prompt.push_str(&format!(
                "- {}: {} ({}) {}, keywords: {}\n",
                positions.get(i).copied().unwrap_or("extra"),
                drawn.card.name,
                drawn.card.korean_name,
                orientation,
                drawn.card.keywords(drawn.reversed).join(", "),
            ));
        }
        prompt.push_str(&respond_with(TAROT_SCHEMA));
        prompt
    }
}

pub struct SajuPrompt<'a> {
    pub birth_date: &'a BirthDate,
    pub birth_time: Option<&'a BirthTime>,
    pub gender: Option<&'a str>,
    pub pillar: &'a YearPillar,
    pub topic: Option<&'a str>,
}

impl SajuPrompt<'_> {
    pub fn render(&self) -> String {
        let mut prompt = format!(
            "Give a traditional Korean saju (four pillars) reading for someone born on {}",
            self.birth_date
        );
        match self.birth_time {
            Some(time) => prompt.push_str(&format!(" at {}.\n", time)),
            None => prompt.push_str(" at an unknown hour.\n"),
        }
        prompt.push_str(&format!(
            "Their year pillar is {} ({}), the year of the {} with {} as its element.\n",
            self.pillar.korean(),
            self.pillar.hanja,
            self.pillar.animal,
            self.pillar.element,
        ));
        if let Some(gender) = self.gender {
            prompt.push_str(&format!("Gender: {}\n", gender));
        }
        if let Some(topic) = self.topic {
            prompt.push_str(&format!("Focus on this topic: {}\n", topic));
        }
        prompt.push_str(&respond_with(READING_SCHEMA));
        prompt
    }
}
