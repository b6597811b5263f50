use crate::configuration::GenerationSettings;
use crate::generation::prompts::CHAT_PERSONA;
use crate::generation::{ChatMessage, ChatRole, ChunkStream, GenerationError, TextGenerator};
use anyhow::Context;
use async_trait::async_trait;
use futures::{future, stream, StreamExt};
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};

pub struct GeminiClient {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Secret<String>,
}

impl GeminiClient {
    pub fn new(settings: &GenerationSettings, api_key: Secret<String>) -> anyhow::Result<Self> {
        let http_client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .context("Failed to build the generation HTTP client.")?;
        Ok(Self {
            http_client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key,
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/v1beta/models/{}:{}", self.base_url, self.model, method)
    }

    async fn post(&self, url: String, body: &GenerateRequest<'_>) -> Result<Response, GenerationError> {
        let response = self
            .http_client
            .post(url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(body)
            .send()
            .await?;
        check_status(response).await
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[tracing::instrument(name = "Generate text", skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = GenerateRequest {
            contents: vec![Content::user(prompt)],
            system_instruction: None,
        };
        let response: GenerateResponse = self
            .post(self.endpoint("generateContent"), &body)
            .await?
            .json()
            .await?;
        response
            .text()
            .ok_or_else(|| GenerationError::MalformedResponse("reply had no candidates".into()))
    }

    #[tracing::instrument(name = "Stream chat completion", skip(self, messages), fields(model = %self.model))]
    async fn stream_chat(&self, messages: Vec<ChatMessage>) -> Result<ChunkStream, GenerationError> {
        let body = GenerateRequest {
            contents: messages.iter().map(Content::from).collect(),
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part { text: CHAT_PERSONA }],
            }),
        };
        let url = format!("{}?alt=sse", self.endpoint("streamGenerateContent"));
        let response = self.post(url, &body).await?;

        let chunks = response
            .bytes_stream()
            .map(Some)
            // `None` marks the end of the body.
            .chain(stream::once(future::ready(None)))
            .scan(SseLineBuffer::default(), |buffer, chunk| {
                let items = match chunk {
                    Some(Ok(bytes)) => buffer.push(&bytes),
                    Some(Err(e)) => vec![Err(GenerationError::Transport(e))],
                    None => buffer.finish(),
                };
                future::ready(Some(stream::iter(items)))
            })
            .flatten()
            .filter(|item| future::ready(!matches!(item, Ok(text) if text.is_empty())));
        Ok(chunks.boxed())
    }
}

async fn check_status(response: Response) -> Result<Response, GenerationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), body = %body, "Generation API returned an error");
    Err(GenerationError::Upstream {
        status: status.as_u16(),
        message: upstream_message(&body),
    })
}

/// Best effort: `error.message` when the body is the usual Google error
/// envelope, otherwise the raw body.
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// Accumulates raw SSE bytes and yields the text of every complete
/// `data:` line. At most one partial line is held between chunks.
#[derive(Default)]
struct SseLineBuffer {
    pending: Vec<u8>,
}

impl SseLineBuffer {
    fn push(&mut self, bytes: &[u8]) -> Vec<Result<String, GenerationError>> {
        self.pending.extend_from_slice(bytes);
        let mut items = Vec::new();
        while let Some(newline) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            items.extend(decode_line(&line));
        }
        items
    }

    /// Decode the last line when the body does not end with a newline.
    fn finish(&mut self) -> Vec<Result<String, GenerationError>> {
        let line = std::mem::take(&mut self.pending);
        decode_line(&line).into_iter().collect()
    }
}

fn decode_line(line: &[u8]) -> Option<Result<String, GenerationError>> {
    let line = String::from_utf8_lossy(line);
    let payload = line.trim().strip_prefix("data:")?;
    Some(
        serde_json::from_str::<GenerateResponse>(payload.trim())
            .map(|r| r.text().unwrap_or_default())
            .map_err(|e| GenerationError::MalformedResponse(e.to_string())),
    )
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
}

#[derive(serde::Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(serde::Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> Content<'a> {
    fn user(text: &'a str) -> Self {
        Self {
            role: Some("user"),
            parts: vec![Part { text }],
        }
    }
}

impl<'a> From<&'a ChatMessage> for Content<'a> {
    fn from(message: &'a ChatMessage) -> Self {
        let role = match message.role {
            ChatRole::User => "user",
            ChatRole::Assistant => "model",
        };
        Self {
            role: Some(role),
            parts: vec![Part {
                text: &message.content,
            }],
        }
    }
}

#[derive(serde::Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(serde::Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(serde::Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(serde::Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        Some(content.parts.iter().map(|p| p.text.as_str()).collect())
    }
}

#[derive(serde::Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    message: String,
}
