use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

/// Inclusive `(month, day)` bounds of a sign. Capricorn wraps the new year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_month: u32,
    pub start_day: u32,
    pub end_month: u32,
    pub end_day: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRecord {
    pub sign: ZodiacSign,
    pub name: &'static str,
    pub korean_name: &'static str,
    pub symbol: &'static str,
    pub element: Element,
    pub range: DateRange,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ZodiacError {
    #[error("{month}/{day} is not a calendar date.")]
    InvalidDate { month: u32, day: u32 },
    #[error("'{0}' is not a zodiac sign.")]
    UnknownSign(String),
}

const fn record(
    sign: ZodiacSign,
    name: &'static str,
    korean_name: &'static str,
    symbol: &'static str,
    element: Element,
    (start_month, start_day): (u32, u32),
    (end_month, end_day): (u32, u32),
) -> SignRecord {
    SignRecord {
        sign,
        name,
        korean_name,
        symbol,
        element,
        range: DateRange {
            start_month,
            start_day,
            end_month,
            end_day,
        },
    }
}

pub static SIGNS: [SignRecord; 12] = [
    record(ZodiacSign::Aries, "Aries", "양자리", "♈", Element::Fire, (3, 21), (4, 19)),
    record(ZodiacSign::Taurus, "Taurus", "황소자리", "♉", Element::Earth, (4, 20), (5, 20)),
    record(ZodiacSign::Gemini, "Gemini", "쌍둥이자리", "♊", Element::Air, (5, 21), (6, 20)),
    record(ZodiacSign::Cancer, "Cancer", "게자리", "♋", Element::Water, (6, 21), (7, 22)),
    record(ZodiacSign::Leo, "Leo", "사자자리", "♌", Element::Fire, (7, 23), (8, 22)),
    record(ZodiacSign::Virgo, "Virgo", "처녀자리", "♍", Element::Earth, (8, 23), (9, 22)),
    record(ZodiacSign::Libra, "Libra", "천칭자리", "♎", Element::Air, (9, 23), (10, 22)),
    record(ZodiacSign::Scorpio, "Scorpio", "전갈자리", "♏", Element::Water, (10, 23), (11, 21)),
    record(ZodiacSign::Sagittarius, "Sagittarius", "사수자리", "♐", Element::Fire, (11, 22), (12, 21)),
    record(ZodiacSign::Capricorn, "Capricorn", "염소자리", "♑", Element::Earth, (12, 22), (1, 19)),
    record(ZodiacSign::Aquarius, "Aquarius", "물병자리", "♒", Element::Air, (1, 20), (2, 18)),
    record(ZodiacSign::Pisces, "Pisces", "물고기자리", "♓", Element::Water, (2, 19), (3, 20)),
];

impl DateRange {
    fn contains(&self, month: u32, day: u32) -> bool {
        let key = month * 100 + day;
        let start = self.start_month * 100 + self.start_day;
        let end = self.end_month * 100 + self.end_day;
        if start <= end {
            (start..=end).contains(&key)
        } else {
            key >= start || key <= end
        }
    }
}

impl ZodiacSign {
    pub fn record(self) -> &'static SignRecord {
        &SIGNS[self as usize]
    }

    /// Accepts the English or Korean name, ignoring case and surrounding
    /// whitespace.
    pub fn parse(s: &str) -> Result<ZodiacSign, ZodiacError> {
        let wanted = s.trim();
        SIGNS
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(wanted) || r.korean_name == wanted)
            .map(|r| r.sign)
            .ok_or_else(|| ZodiacError::UnknownSign(s.to_string()))
    }
}

/// Map a month/day pair onto its tropical zodiac sign.
///
/// February 29th is accepted; any other day outside its month is an error.
pub fn zodiac_of(month: u32, day: u32) -> Result<&'static SignRecord, ZodiacError> {
    // 2000 is a leap year, so this only rejects days that never exist.
    if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
        return Err(ZodiacError::InvalidDate { month, day });
    }
    SIGNS
        .iter()
        .find(|r| r.range.contains(month, day))
        .ok_or(ZodiacError::InvalidDate { month, day })
}

pub fn zodiac_of_date(date: NaiveDate) -> &'static SignRecord {
    // A real calendar date always falls into exactly one interval.
    zodiac_of(date.month(), date.day()).unwrap_or(&SIGNS[0])
}
