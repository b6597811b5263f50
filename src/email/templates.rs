use crate::domain::ReadingKind;
use serde_json::Value;

pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Render a saved reading for delivery. Only the well known fields of the
/// result object (`summary`, `sections`, `advice`, `content`) are laid out;
/// anything else stays in the app.
pub fn reading_email(
    kind: ReadingKind,
    title: Option<&str>,
    summary: Option<&str>,
    result: &Value,
) -> RenderedEmail {
    let title = title
        .or_else(|| result.get("title").and_then(Value::as_str))
        .unwrap_or(kind.display_name());
    let summary = summary.or_else(|| result.get("summary").and_then(Value::as_str));

    let mut paragraphs: Vec<(Option<&str>, &str)> = Vec::new();
    if let Some(summary) = summary {
        paragraphs.push((None, summary));
    }
    if let Some(content) = result.get("content").and_then(Value::as_str) {
        paragraphs.push((None, content));
    }
    if let Some(sections) = result.get("sections").and_then(Value::as_array) {
        for section in sections {
            if let Some(text) = section.get("text").and_then(Value::as_str) {
                paragraphs.push((section.get("heading").and_then(Value::as_str), text));
            }
        }
    }
    if let Some(advice) = result.get("advice").and_then(Value::as_str) {
        paragraphs.push((Some("Advice"), advice));
    }

    let mut html = format!("<h1>{}</h1>", escape(title));
    let mut text = format!("{}\n\n", title);
    for (heading, body) in paragraphs {
        if let Some(heading) = heading {
            html.push_str(&format!("<h3>{}</h3>", escape(heading)));
            text.push_str(&format!("{}\n", heading));
        }
        html.push_str(&format!("<p>{}</p>", escape(body)));
        text.push_str(&format!("{}\n\n", body));
    }
    html.push_str("<p><small>Sent by LUMEN</small></p>");
    text.push_str("Sent by LUMEN\n");

    RenderedEmail {
        subject: format!("[LUMEN] {} reading: {}", kind.display_name(), title),
        html,
        text,
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
