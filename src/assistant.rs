//! Writing-assistant operations.
//!
//! Each operation is a prompt template over one chat-completion call: build
//! the request, post it through the injected transport (normally the
//! installed interceptor), decode the body, and normalize the payload with
//! [`crate::extract`]. An empty extraction means the envelope shape was not
//! understood — that is logged as a warning and surfaced as an empty result,
//! never as a request failure.

use crate::config::InkpilotConfig;
use crate::extract::extract;
use crate::transport::{OutboundRequest, RawResponse, Transport};
use crate::wire::{ChatMessage, ChatRequest};
use crate::{InkpilotError, Result};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

// ── Prompt templates ────────────────────────────────────────────────

const GENERATE_SYSTEM: &str = "You are a novelist's drafting assistant. Write vivid, \
publishable prose in the requested length. Output only the prose, no commentary.";

const CONTINUE_SYSTEM: &str = "You are a novelist's drafting assistant. Continue the \
passage seamlessly, matching its voice, tense, and point of view. Output only the \
continuation.";

const HUMANIZE_SYSTEM: &str = "You are a line editor. Rewrite the passage so it reads \
as natural human prose: vary sentence rhythm, cut filler phrases and hedging, keep \
the meaning intact. Output only the rewritten passage.";

const ANALYZE_SYSTEM: &str = "You are a narrative-style analyst. Report on the \
passage's voice, pacing, diction, and point of view, with one concrete suggestion \
per dimension.";

const DETECT_SYSTEM: &str = r#"You judge whether prose was machine-generated. Reply
with JSON only: {"ai_likelihood": <0.0-1.0>, "assessment": "<one sentence>"}"#;

// ── Detection report ────────────────────────────────────────────────

/// AI-detection verdict for a passage.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionReport {
    /// 0.0 (surely human) to 1.0 (surely machine)
    pub ai_likelihood: f32,
    /// One-sentence assessment
    pub assessment: String,
}

/// The structured response we ask the model to produce for detection.
#[derive(Debug, Deserialize)]
struct DetectionJson {
    ai_likelihood: f32,

    #[serde(default)]
    assessment: Option<String>,
}

impl DetectionReport {
    /// Parse a detection reply: JSON first, then the first `{…}` substring,
    /// then fall back to carrying the raw text as the assessment.
    fn parse(reply: &str) -> DetectionReport {
        if let Some(report) = Self::try_json(reply) {
            return report;
        }
        if let (Some(start), Some(end)) = (reply.find('{'), reply.rfind('}')) {
            if start < end {
                if let Some(report) = Self::try_json(&reply[start..=end]) {
                    return report;
                }
            }
        }
        debug!("detection reply was not structured, keeping raw text");
        DetectionReport {
            ai_likelihood: 0.5,
            assessment: reply.trim().to_string(),
        }
    }

    fn try_json(text: &str) -> Option<DetectionReport> {
        let parsed: DetectionJson = serde_json::from_str(text.trim()).ok()?;
        Some(DetectionReport {
            ai_likelihood: parsed.ai_likelihood.clamp(0.0, 1.0),
            assessment: parsed.assessment.unwrap_or_default(),
        })
    }
}

// ── Assistant ───────────────────────────────────────────────────────

/// Thin client for the writing-assistant features.
pub struct Assistant {
    transport: Arc<dyn Transport>,
    config: InkpilotConfig,
    endpoint: String,
}

impl Assistant {
    pub fn new(transport: Arc<dyn Transport>, config: InkpilotConfig) -> Self {
        let endpoint = config.completion_endpoint();
        Self {
            transport,
            config,
            endpoint,
        }
    }

    /// Draft prose from a premise (the auto-pilot writing call).
    pub async fn generate(&self, premise: &str, words: u32) -> Result<String> {
        let user = format!("Premise: {premise}\n\nWrite roughly {words} words.");
        self.complete(GENERATE_SYSTEM, &user).await
    }

    /// Continue an existing passage.
    pub async fn continue_story(&self, text: &str, words: u32) -> Result<String> {
        let user = format!("{text}\n\n---\nContinue for roughly {words} words.");
        self.complete(CONTINUE_SYSTEM, &user).await
    }

    /// Rewrite AI-sounding prose as natural human prose.
    pub async fn humanize(&self, text: &str) -> Result<String> {
        self.complete(HUMANIZE_SYSTEM, text).await
    }

    /// Narrative-style report for a passage.
    pub async fn analyze_style(&self, text: &str) -> Result<String> {
        self.complete(ANALYZE_SYSTEM, text).await
    }

    /// Judge whether a passage reads as machine-generated.
    pub async fn detect(&self, text: &str) -> Result<DetectionReport> {
        let reply = self.complete(DETECT_SYSTEM, text).await?;
        Ok(DetectionReport::parse(&reply))
    }

    /// One chat-completion round trip: request, decode, extract.
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let body = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            stream: false,
        };

        let mut request =
            OutboundRequest::new(self.endpoint.as_str(), serde_json::to_value(&body)?);
        if let Some(key) = &self.config.api_key {
            request = request.with_bearer(key);
        }

        let response = self.transport.send(request).await?;
        self.extract_reply(&response)
    }

    fn extract_reply(&self, response: &RawResponse) -> Result<String> {
        if !response.is_success() {
            return Err(InkpilotError::Api(format!(
                "API error {}: {}",
                response.status,
                truncate(&response.text(), 500)
            )));
        }

        let payload = response.json().map_err(|e| {
            InkpilotError::Api(format!("completion body is not valid JSON: {e}"))
        })?;

        let content = extract(&payload);
        if content.is_empty() {
            // Unknown envelope shape, not a genuine empty completion.
            warn!("completion returned an unrecognized response format");
        }
        Ok(content)
    }
}

fn truncate(detail: &str, max_chars: usize) -> String {
    if detail.chars().count() <= max_chars {
        return detail.to_string();
    }
    let mut truncated = detail.chars().take(max_chars).collect::<String>();
    truncated.push_str("... [truncated]");
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn detection_parses_clean_json() {
        let report =
            DetectionReport::parse(r#"{"ai_likelihood": 0.82, "assessment": "Uniform rhythm."}"#);
        assert_eq!(report.ai_likelihood, 0.82);
        assert_eq!(report.assessment, "Uniform rhythm.");
    }

    #[test]
    fn detection_parses_embedded_json() {
        let reply = r#"Here is my verdict:
{"ai_likelihood": 0.1, "assessment": "Reads human."}
Hope that helps."#;
        let report = DetectionReport::parse(reply);
        assert_eq!(report.ai_likelihood, 0.1);
        assert_eq!(report.assessment, "Reads human.");
    }

    #[test]
    fn detection_clamps_out_of_range_likelihood() {
        let report = DetectionReport::parse(r#"{"ai_likelihood": 1.7}"#);
        assert_eq!(report.ai_likelihood, 1.0);
        assert_eq!(report.assessment, "");
    }

    #[test]
    fn detection_falls_back_to_raw_text() {
        let report = DetectionReport::parse("Probably human, hard to say.");
        assert_eq!(report.ai_likelihood, 0.5);
        assert_eq!(report.assessment, "Probably human, hard to say.");
    }

    #[test]
    fn truncate_caps_long_details() {
        let long = "x".repeat(600);
        let t = truncate(&long, 500);
        assert!(t.ends_with("... [truncated]"));
        assert_eq!(t.chars().count(), 500 + "... [truncated]".chars().count());
    }
}
