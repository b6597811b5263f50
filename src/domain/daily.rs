//! Deterministic daily content.
//!
//! Everyone sees the same card and themes on the same calendar day, with
//! nothing stored server side. The generator is a plain LCG and is only fit
//! for cosmetic rotation: the output is trivially predictable.

use crate::domain::tarot::{TarotCard, MAJOR_ARCANA};
use chrono::{Datelike, NaiveDate};

const MULTIPLIER: u64 = 1_103_515_245;
const INCREMENT: u64 = 12_345;
const MODULUS: u64 = 1 << 31;

pub const FLOW_THEMES: [&str; 12] = [
    "love",
    "career",
    "money",
    "health",
    "friendship",
    "family",
    "study",
    "travel",
    "creativity",
    "rest",
    "change",
    "luck",
];

/// `yyyymmdd` as a number. Years before 1 CE give negative seeds.
pub fn daily_seed(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 10_000 + i64::from(date.month()) * 100 + i64::from(date.day())
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Cannot pick an index out of an empty range.")]
pub struct EmptyRange;

#[derive(Debug, Clone)]
pub struct DailyRng {
    state: u64,
}

impl DailyRng {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed % MODULUS,
        }
    }

    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            state: daily_seed(date).rem_euclid(MODULUS as i64) as u64,
        }
    }

    /// Advance the generator and normalise into `[0, 1]`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = (self.state * MULTIPLIER + INCREMENT) % MODULUS;
        self.state as f64 / (MODULUS - 1) as f64
    }

    pub fn index(&mut self, range: usize) -> Result<usize, EmptyRange> {
        if range == 0 {
            return Err(EmptyRange);
        }
        let picked = (self.next_f64() * range as f64).floor() as usize;
        // `next_f64` reaches 1.0 when the state is 2^31 - 1.
        Ok(picked.min(range - 1))
    }

    /// Draw up to `n` elements without replacement, removing each pick from
    /// the pool before the next draw.
    pub fn draw_distinct<T>(&mut self, mut pool: Vec<T>, n: usize) -> Vec<T> {
        let mut drawn = Vec::with_capacity(n.min(pool.len()));
        while drawn.len() < n {
            match self.index(pool.len()) {
                Ok(i) => drawn.push(pool.remove(i)),
                Err(EmptyRange) => break,
            }
        }
        drawn
    }
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawnCard {
    pub card: &'static TarotCard,
    pub reversed: bool,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySelection {
    pub date: NaiveDate,
    pub seed: i64,
    pub card: DrawnCard,
    pub spread: Vec<DrawnCard>,
    pub flow: Vec<&'static str>,
}

impl DailySelection {
    pub fn for_date(date: NaiveDate) -> Self {
        let seed = daily_seed(date);
        let mut rng = DailyRng::for_date(date);

        let card = DrawnCard {
            card: &MAJOR_ARCANA[rng.index(MAJOR_ARCANA.len()).unwrap_or(0)],
            reversed: rng.next_f64() < 0.5,
        };
        let spread = rng
            .draw_distinct(MAJOR_ARCANA.iter().collect(), 3)
            .into_iter()
            .map(|card| DrawnCard {
                card,
                reversed: rng.next_f64() < 0.5,
            })
            .collect();
        let flow = rng.draw_distinct(FLOW_THEMES.to_vec(), 3);

        Self {
            date,
            seed,
            card,
            spread,
            flow,
        }
    }
}
