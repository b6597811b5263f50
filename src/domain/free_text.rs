use unicode_segmentation::UnicodeSegmentation;

const MAX_GRAPHEMES: usize = 256;

/// A short piece of user text (topic, question, summary, chat message)
/// embedded into prompts or stored alongside a reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeText(String);

impl FreeText {
    pub fn parse(s: String) -> Result<FreeText, String> {
        Self::parse_bounded(s, MAX_GRAPHEMES)
    }

    pub fn parse_bounded(s: String, max_graphemes: usize) -> Result<FreeText, String> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("Text must not be empty.".to_string());
        }
        if trimmed.graphemes(true).count() > max_graphemes {
            return Err(format!(
                "Text is longer than {} characters.",
                max_graphemes
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Blank optional fields are treated as absent.
    pub fn parse_optional(s: Option<String>) -> Result<Option<FreeText>, String> {
        match s {
            Some(s) if !s.trim().is_empty() => Self::parse(s).map(Some),
            _ => Ok(None),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for FreeText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
