use super::{Completion, CompletionBackend, CompletionError};
use crate::config::Config;
use crate::logging::{debug_payload_enabled, emit_debug_payload};
use crate::persona::INSTRUCTION_BRIDGE;
use crate::types::{
    Content, ErrorResponse, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    SafetySetting, Turn,
};
use anyhow::Result;
use async_trait::async_trait;

const FINISH_REASON_STOP: &str = "STOP";
const FINISH_REASON_SAFETY: &str = "SAFETY";

/// HTTP client for the `generateContent` endpoint.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    request_url: String,
    system_prompt: String,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            request_url: format!(
                "{}/models/{}:generateContent",
                config.api_url.trim_end_matches('/'),
                config.model
            ),
            system_prompt: config.persona.system_prompt.clone(),
            generation_config: GenerationConfig {
                temperature: config.temperature,
                max_output_tokens: config.max_output_tokens,
            },
            safety_settings: config.safety.settings(),
        })
    }

    pub fn request_url(&self) -> &str {
        &self.request_url
    }

    /// Builds the outbound payload for a transcript.
    ///
    /// Assistant turns before the first user turn are local (the greeting) and
    /// are not sent. The persona instruction is prefixed to the last user turn.
    pub fn build_request(&self, transcript: &[Turn]) -> GenerateContentRequest {
        let first_user = transcript
            .iter()
            .position(Turn::is_user)
            .unwrap_or(transcript.len());
        let conversation = &transcript[first_user..];
        let last_user = conversation.iter().rposition(Turn::is_user);

        let contents = conversation
            .iter()
            .enumerate()
            .map(|(index, turn)| {
                let text = if Some(index) == last_user && !self.system_prompt.is_empty() {
                    format!("{}{}{}", self.system_prompt, INSTRUCTION_BRIDGE, turn.text())
                } else {
                    turn.text().to_string()
                };
                Content::text(turn.speaker().api_role(), text)
            })
            .collect();

        GenerateContentRequest {
            contents,
            safety_settings: self.safety_settings.clone(),
            generation_config: self.generation_config,
        }
    }
}

#[async_trait]
impl CompletionBackend for ApiClient {
    async fn complete(&self, transcript: &[Turn]) -> Result<Completion, CompletionError> {
        let payload = self.build_request(transcript);
        if debug_payload_enabled() {
            emit_debug_payload(&self.request_url, &payload);
        }

        let mut request = self
            .http
            .post(&self.request_url)
            .header("content-type", "application/json")
            .json(&payload);
        if let Some(api_key) = &self.api_key {
            request = request.header("x-goog-api-key", api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|error| map_transport_error(error, &self.request_url))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| map_transport_error(error, &self.request_url))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|parsed| parsed.error.message)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown status")
                        .to_string()
                });
            return Err(CompletionError::from_status(status.as_u16(), &message));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|error| CompletionError::malformed(format!("invalid response body: {error}")))?;
        Ok(interpret_response(parsed))
    }
}

fn map_transport_error(error: reqwest::Error, request_url: &str) -> CompletionError {
    if error.is_timeout() {
        return CompletionError::timeout(format!("request to '{request_url}' timed out: {error}"));
    }
    if error.is_connect() {
        return CompletionError::unreachable(format!(
            "cannot reach endpoint '{request_url}': {error}"
        ));
    }
    if error.is_decode() || error.is_body() {
        return CompletionError::malformed(format!(
            "failed to read response from '{request_url}': {error}"
        ));
    }
    CompletionError::unreachable(format!("request to '{request_url}' failed: {error}"))
}

/// Classifies a successful response body into one of the completion outcomes.
pub fn interpret_response(response: GenerateContentResponse) -> Completion {
    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Completion::Blocked { reason };
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Completion::Empty;
    };

    if candidate.finish_reason.as_deref() == Some(FINISH_REASON_SAFETY) {
        return Completion::Blocked {
            reason: FINISH_REASON_SAFETY.to_string(),
        };
    }

    let text: String = candidate
        .content
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
        .unwrap_or_default();
    if !text.trim().is_empty() {
        return Completion::Reply(text);
    }

    match candidate.finish_reason {
        Some(reason) if reason != FINISH_REASON_STOP => Completion::Stopped { reason },
        _ => Completion::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Persona;

    fn client_with_prompt(system_prompt: &str) -> ApiClient {
        let config = Config {
            api_key: Some("test-key".to_string()),
            persona: Persona {
                system_prompt: system_prompt.to_string(),
                ..Persona::default()
            },
            ..Config::default()
        };
        ApiClient::new(&config).unwrap()
    }

    fn parse(body: &str) -> GenerateContentResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_request_url_targets_generate_content() {
        let client = client_with_prompt("rules");
        assert_eq!(
            client.request_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_build_request_skips_greeting_and_prefixes_last_user_turn() {
        let client = client_with_prompt("Only talk about wrapping.");
        let transcript = vec![
            Turn::assistant("Hi! What are you wrapping?"),
            Turn::user("A book"),
            Turn::assistant("Who is it for?"),
            Turn::user("My mom"),
        ];

        let request = client.build_request(&transcript);
        let roles: Vec<_> = request
            .contents
            .iter()
            .map(|c| c.role.clone().unwrap_or_default())
            .collect();
        assert_eq!(roles, vec!["user", "model", "user"]);

        let first = request.contents[0].parts[0].text.as_deref().unwrap();
        assert_eq!(first, "A book");

        let last = request.contents[2].parts[0].text.as_deref().unwrap();
        assert!(last.starts_with("Only talk about wrapping."));
        assert!(last.ends_with("here is the user's latest message:\nMy mom"));
        assert_eq!(request.safety_settings.len(), 4);
        assert_eq!(request.generation_config.max_output_tokens, 400);
    }

    #[test]
    fn test_build_request_without_prompt_sends_plain_text() {
        let client = client_with_prompt("");
        let request = client.build_request(&[Turn::user("hello")]);
        assert_eq!(request.contents[0].parts[0].text.as_deref(), Some("hello"));
    }

    #[test]
    fn test_interpret_reply_joins_text_parts() {
        let completion = interpret_response(parse(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Got "},{"text":"it!"}]},"finishReason":"STOP"}]}"#,
        ));
        assert_eq!(completion, Completion::Reply("Got it!".to_string()));
    }

    #[test]
    fn test_interpret_prompt_block() {
        let completion = interpret_response(parse(
            r#"{"promptFeedback":{"blockReason":"OTHER"}}"#,
        ));
        assert_eq!(
            completion,
            Completion::Blocked {
                reason: "OTHER".to_string()
            }
        );
    }

    #[test]
    fn test_interpret_safety_finish_overrides_text() {
        let completion = interpret_response(parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"partial"}]},"finishReason":"SAFETY"}]}"#,
        ));
        assert!(matches!(completion, Completion::Blocked { .. }));
    }

    #[test]
    fn test_interpret_stopped_and_empty() {
        let stopped = interpret_response(parse(
            r#"{"candidates":[{"finishReason":"MAX_TOKENS"}]}"#,
        ));
        assert_eq!(
            stopped,
            Completion::Stopped {
                reason: "MAX_TOKENS".to_string()
            }
        );

        let empty = interpret_response(parse(r#"{"candidates":[]}"#));
        assert_eq!(empty, Completion::Empty);
    }
}
