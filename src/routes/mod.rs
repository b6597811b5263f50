mod chat;
mod daily;
mod health_check;
mod horoscope;
mod reading_email;
mod readings;
mod saju;
mod sessions;
mod subscribers;
mod tarot;
mod zodiac;

pub use chat::*;
pub use daily::*;
pub use health_check::*;
pub use horoscope::*;
pub use reading_email::*;
pub use readings::*;
pub use saju::*;
pub use sessions::*;
pub use subscribers::*;
pub use tarot::*;
pub use zodiac::*;

use crate::email::EmailError;
use crate::generation::{extract_json, ExtractionError, GenerationError, TextGenerator};
use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use rocket::{Request, Response};

/// Body of every JSON endpoint: `{"success": true, "data": ...}`.
#[derive(serde::Serialize)]
pub struct Envelope<T> {
    success: bool,
    data: T,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Json<Envelope<T>> {
        Json(Envelope {
            success: true,
            data,
        })
    }
}

#[derive(serde::Serialize)]
pub struct ErrorEnvelope {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Json<ErrorEnvelope> {
        Json(ErrorEnvelope {
            success: false,
            error: error.into(),
            raw: None,
        })
    }
}

pub type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

#[derive(serde::Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    Generated,
    /// No generation API key is configured; `reading` is `null`.
    Skipped,
}

#[derive(serde::Serialize, Debug)]
pub struct GeneratedReading {
    generation: GenerationStatus,
    reading: serde_json::Value,
}

/// Ask the model for a reading and pull the JSON object out of its reply.
pub async fn generate_reading(
    generator: &dyn TextGenerator,
    prompt: &str,
) -> Result<GeneratedReading, ApiError> {
    match generator.generate(prompt).await {
        Ok(raw) => Ok(GeneratedReading {
            generation: GenerationStatus::Generated,
            reading: extract_json(&raw)?,
        }),
        Err(GenerationError::NotConfigured) => {
            tracing::warn!("Text generation is not configured, skipping the reading");
            Ok(GeneratedReading {
                generation: GenerationStatus::Skipped,
                reading: serde_json::Value::Null,
            })
        }
        Err(e) => Err(e.into()),
    }
}

#[derive(thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error(transparent)]
    GenerationError(#[from] GenerationError),
    #[error(transparent)]
    ExtractionError(#[from] ExtractionError),
    #[error(transparent)]
    EmailError(#[from] EmailError),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ApiError {
    fn status(&self) -> Status {
        match self {
            ApiError::ValidationError(_) => Status::BadRequest,
            ApiError::NotFound(_) => Status::NotFound,
            ApiError::Forbidden(_) => Status::Forbidden,
            ApiError::GenerationError(GenerationError::NotConfigured) => Status::ServiceUnavailable,
            ApiError::GenerationError(GenerationError::Upstream { status, .. }) => {
                Status::from_code(*status).unwrap_or(Status::BadGateway)
            }
            ApiError::GenerationError(_) => Status::BadGateway,
            ApiError::EmailError(EmailError::Upstream { status, .. }) => {
                Status::from_code(*status).unwrap_or(Status::BadGateway)
            }
            ApiError::EmailError(_) => Status::BadGateway,
            ApiError::ExtractionError(_) | ApiError::UnexpectedError(_) => {
                Status::InternalServerError
            }
        }
    }

    fn envelope(&self) -> ErrorEnvelope {
        let (error, raw) = match self {
            ApiError::ExtractionError(e) => (e.to_string(), Some(e.raw.clone())),
            ApiError::GenerationError(GenerationError::Upstream { message, .. })
            | ApiError::EmailError(EmailError::Upstream { message, .. }) => (message.clone(), None),
            // Do not leak internals.
            ApiError::UnexpectedError(_) => ("Something went wrong.".to_string(), None),
            other => (other.to_string(), None),
        };
        ErrorEnvelope {
            success: false,
            error,
            raw,
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        let status = self.status();
        if status.code >= 500 {
            tracing::error!("ApiError: {:?}", self);
        } else {
            tracing::warn!("ApiError: {:?}", self);
        }
        Response::build_from(Json(self.envelope()).respond_to(request)?)
            .status(status)
            .ok()
    }
}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
