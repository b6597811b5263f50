#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingKind {
    Tarot,
    Saju,
    Zodiac,
}

impl ReadingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingKind::Tarot => "tarot",
            ReadingKind::Saju => "saju",
            ReadingKind::Zodiac => "zodiac",
        }
    }

    pub fn parse(s: &str) -> Result<ReadingKind, String> {
        match s.trim().to_lowercase().as_str() {
            "tarot" => Ok(Self::Tarot),
            "saju" => Ok(Self::Saju),
            "zodiac" => Ok(Self::Zodiac),
            other => Err(format!(
                "{} is not a reading type. Use one of 'tarot', 'saju' or 'zodiac'.",
                other
            )),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ReadingKind::Tarot => "Tarot",
            ReadingKind::Saju => "Saju",
            ReadingKind::Zodiac => "Horoscope",
        }
    }
}

impl std::fmt::Display for ReadingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
