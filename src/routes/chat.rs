use crate::domain::FreeText;
use crate::generation::{ChatMessage, ChatRole, ChunkStream, GenerationError, TextGenerator};
use crate::routes::ApiError;
use futures::stream::{self, BoxStream};
use futures::{future, StreamExt};
use rocket::response::stream::TextStream;
use rocket::serde::json::Json;
use rocket::State;
use std::sync::Arc;
use uuid::Uuid;

const MAX_MESSAGES: usize = 40;
const MAX_MESSAGE_GRAPHEMES: usize = 4000;

#[derive(serde::Deserialize)]
pub struct ChatRequest {
    messages: Vec<ChatMessage>,
}

fn validate_messages(messages: Vec<ChatMessage>) -> Result<Vec<ChatMessage>, String> {
    if messages.is_empty() || messages.len() > MAX_MESSAGES {
        return Err(format!(
            "A conversation carries between 1 and {} messages.",
            MAX_MESSAGES
        ));
    }
    if messages.last().map(|m| m.role) != Some(ChatRole::User) {
        return Err("The last message must come from the user.".to_string());
    }
    messages
        .into_iter()
        .map(|m| {
            let content = FreeText::parse_bounded(m.content, MAX_MESSAGE_GRAPHEMES)?;
            Ok(ChatMessage {
                role: m.role,
                content: content.into_inner(),
            })
        })
        .collect()
}

/// Relay the upstream completion to the client chunk by chunk. An upstream
/// failure after the first chunk ends the stream early. Without a configured
/// generator the reply is an empty stream.
#[tracing::instrument(
    name = "Relay a chat completion",
    skip(body, generator),
    fields(request_id = %Uuid::new_v4(), messages = body.messages.len())
)]
#[post("/api/chat", data = "<body>")]
pub async fn relay_chat(
    body: Json<ChatRequest>,
    generator: &State<Arc<dyn TextGenerator>>,
) -> Result<TextStream<BoxStream<'static, String>>, ApiError> {
    let messages = validate_messages(body.into_inner().messages).map_err(ApiError::ValidationError)?;
    let upstream = match generator.stream_chat(messages).await {
        Ok(upstream) => upstream,
        Err(GenerationError::NotConfigured) => {
            tracing::warn!("Text generation is not configured, answering with an empty chat reply");
            return Ok(TextStream(stream::empty().boxed()));
        }
        Err(e) => return Err(e.into()),
    };
    Ok(TextStream(until_first_error(upstream)))
}

fn until_first_error(upstream: ChunkStream) -> BoxStream<'static, String> {
    upstream
        .take_while(|chunk| {
            if let Err(e) = chunk {
                tracing::error!(error.cause_chain = ?e, "Chat stream ended with an upstream error");
            }
            future::ready(chunk.is_ok())
        })
        .filter_map(|chunk| future::ready(chunk.ok()))
        .boxed()
}
