//! Blocking client for an OpenAI-compatible chat-completion endpoint.

use std::env;

use reqwest::{blocking::Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    config::AdvisorConfig,
    errors::{CashFlowError, Result},
};

/// Text-generation collaborator: one prompt in, one answer or failure out.
///
/// Failures are returned as-is; implementations do not retry.
pub trait AdviceService {
    fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Production [`AdviceService`] that posts a single-turn chat request.
#[derive(Debug, Clone)]
pub struct ChatCompletionClient {
    config: AdvisorConfig,
    http: Client,
}

impl ChatCompletionClient {
    pub fn new(config: AdvisorConfig) -> Result<Self> {
        let http = Client::builder()
            .build()
            .map_err(|err| CashFlowError::service(format!("cannot build HTTP client: {err}")))?;
        Ok(Self { config, http })
    }

    /// Reads the API key from the configured environment variable on every call.
    fn api_key(&self) -> Result<String> {
        match env::var(&self.config.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(CashFlowError::service(format!(
                "environment variable `{}` is not set",
                self.config.api_key_env
            ))),
        }
    }
}

impl AdviceService for ChatCompletionClient {
    fn generate(&self, prompt: &str) -> Result<String> {
        let prompt = ensure_prompt(prompt)?;
        let api_key = self.api_key()?;

        let request = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &self.config.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        info!(model = %self.config.model, endpoint = %self.config.endpoint, "requesting advice");
        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            let message = describe_failure(status, &body);
            warn!(%status, "advice request failed");
            return Err(CashFlowError::Service(message));
        }
        parse_completion(&body)
    }
}

/// Rejects blank prompts before any network access.
pub fn ensure_prompt(prompt: &str) -> Result<&str> {
    if prompt.trim().is_empty() {
        return Err(CashFlowError::validation("Please enter a prompt!"));
    }
    Ok(prompt)
}

/// Extracts the first choice's message content, verbatim.
pub fn parse_completion(body: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|err| CashFlowError::service(format!("unreadable response: {err}")))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| CashFlowError::service("response contained no message"))
}

fn describe_failure(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    let kind = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => "authentication failed",
        StatusCode::TOO_MANY_REQUESTS => "quota or rate limit exceeded",
        status if status.is_server_error() => "service unavailable",
        _ => "request rejected",
    };
    if detail.is_empty() {
        format!("{kind} ({status})")
    } else {
        format!("{kind} ({status}): {detail}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_content_is_returned_verbatim() {
        let body = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"  Invest in index funds.\n"}}]}"#;
        assert_eq!(
            parse_completion(body).unwrap(),
            "  Invest in index funds.\n"
        );
    }

    #[test]
    fn empty_choices_is_a_service_failure() {
        let err = parse_completion(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, CashFlowError::Service(_)));
        assert!(matches!(
            parse_completion("<html>").unwrap_err(),
            CashFlowError::Service(_)
        ));
    }

    #[test]
    fn failure_messages_name_the_cause() {
        let body = r#"{"error":{"message":"Invalid API Key","type":"invalid_request_error"}}"#;
        assert_eq!(
            describe_failure(StatusCode::UNAUTHORIZED, body),
            "authentication failed (401 Unauthorized): Invalid API Key"
        );
        assert!(describe_failure(StatusCode::TOO_MANY_REQUESTS, "").starts_with("quota"));
    }

    #[test]
    fn blank_prompt_is_rejected_before_network() {
        let client = ChatCompletionClient::new(AdvisorConfig::default()).unwrap();
        let err = client.generate("   ").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn missing_api_key_is_a_service_failure() {
        let config = AdvisorConfig {
            api_key_env: "CASHFLOW_ADVISOR_TEST_UNSET_KEY".into(),
            endpoint: "http://127.0.0.1:9/unreachable".into(),
            ..AdvisorConfig::default()
        };
        let client = ChatCompletionClient::new(config).unwrap();
        let err = client.generate("How should I save?").unwrap_err();
        match err {
            CashFlowError::Service(message) => {
                assert!(message.contains("CASHFLOW_ADVISOR_TEST_UNSET_KEY"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
