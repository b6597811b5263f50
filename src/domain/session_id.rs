use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

const GENERATED_LENGTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(String);

impl SessionId {
    /// Session ids are opaque client tokens: 8 to 128 characters drawn from
    /// ASCII letters, digits, `-` and `_`.
    pub fn parse(s: String) -> Result<SessionId, String> {
        let valid_length = (8..=128).contains(&s.len());
        let valid_chars = s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid_length && valid_chars {
            Ok(Self(s))
        } else {
            Err(format!("{} is not a valid session id.", s))
        }
    }

    pub fn generate() -> SessionId {
        let mut rng = thread_rng();
        Self(
            std::iter::repeat_with(|| rng.sample(Alphanumeric))
                .map(char::from)
                .take(GENERATED_LENGTH)
                .collect(),
        )
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
