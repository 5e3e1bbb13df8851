//! Response-content extraction for chat-completion payloads.
//!
//! Upstream providers disagree on envelope shape: custom backends return the
//! generated text under a direct field (`response`, `message`, `content`,
//! `data`), OpenAI-style APIs wrap it in a `choices` array, and some proxies
//! hand back a bare string body. [`extract`] normalizes all of them to one
//! plain-text string. Any shape it does not recognize degrades silently to
//! the empty string — callers must treat `""` as "format not understood",
//! not as a genuine empty completion.

use serde_json::Value;

/// Direct string fields probed in priority order. The simplest shape is the
/// cheapest to check and the most common for custom backends, so it wins
/// over the richer completion-array shape.
const DIRECT_FIELDS: [&str; 4] = ["response", "message", "content", "data"];

/// A known chat-completion envelope shape, classified from an untyped payload.
///
/// One variant per recognized shape plus [`Envelope::Unknown`], so the
/// mapping to text is total and no caller ever sees an error or a null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    /// Text under a direct top-level string field.
    Direct(String),
    /// OpenAI-style: `choices[0].message.content`.
    ChoiceMessage(String),
    /// Legacy completions: `choices[0].text`.
    ChoiceText(String),
    /// The payload is itself a string.
    Bare(String),
    /// None of the known shapes matched.
    Unknown,
}

impl Envelope {
    /// Classify an untyped payload into a known envelope shape.
    ///
    /// Resolution order (first match wins, no fallthrough):
    /// 1. `response` string field
    /// 2. `message` string field
    /// 3. `content` string field
    /// 4. `data` string field
    /// 5. non-empty `choices`: element 0's `message.content`, else its `text`
    /// 6. the payload itself is a string
    /// 7. anything else is `Unknown`
    pub fn classify(payload: &Value) -> Envelope {
        if let Value::Object(_) = payload {
            for field in DIRECT_FIELDS {
                if let Some(text) = payload.get(field).and_then(|v| v.as_str()) {
                    return Envelope::Direct(text.to_string());
                }
            }

            // Only the first choice is inspected; later elements are
            // alternates the auto-pilot never requests.
            if let Some(first) = payload
                .get("choices")
                .and_then(|c| c.as_array())
                .and_then(|a| a.first())
            {
                if let Some(text) = first
                    .get("message")
                    .and_then(|m| m.get("content"))
                    .and_then(|c| c.as_str())
                {
                    return Envelope::ChoiceMessage(text.to_string());
                }
                if let Some(text) = first.get("text").and_then(|t| t.as_str()) {
                    return Envelope::ChoiceText(text.to_string());
                }
            }
        }

        if let Some(text) = payload.as_str() {
            return Envelope::Bare(text.to_string());
        }

        Envelope::Unknown
    }

    /// Total mapping from envelope to text. `Unknown` yields the empty string.
    pub fn into_text(self) -> String {
        match self {
            Envelope::Direct(text)
            | Envelope::ChoiceMessage(text)
            | Envelope::ChoiceText(text)
            | Envelope::Bare(text) => text,
            Envelope::Unknown => String::new(),
        }
    }
}

/// Extract a best-effort plain-text string from an arbitrary decoded payload.
///
/// Pure and idempotent: same input, same output, no hidden state. Never
/// panics, never errors — an unrecognized shape returns `""`.
pub fn extract(payload: &Value) -> String {
    Envelope::classify(payload).into_text()
}
