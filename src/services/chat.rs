use std::sync::Arc;

use crate::{models::GenerateContentResponse, services::providers::GenerativeTextProvider};

pub const NETWORK_ERROR_REPLY: &str =
    "Sorry, I couldn't process your request due to a network error.";
pub const INVALID_RESPONSE_REPLY: &str = "Sorry, I received an invalid response from the server.";
pub const UNPROCESSABLE_REPLY: &str = "Sorry, I couldn't process your request.";

/// Answers sidebar questions through a generative text provider
///
/// Every failure maps to a fixed reply; `ask` never returns an error.
#[derive(Clone)]
pub struct ChatResponder {
    provider: Arc<dyn GenerativeTextProvider>,
}

impl ChatResponder {
    pub fn new(provider: Arc<dyn GenerativeTextProvider>) -> Self {
        Self { provider }
    }

    pub async fn ask(&self, query: &str) -> String {
        match self.provider.generate_content(query).await {
            Ok(body) => extract_reply(&body),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    provider = self.provider.name(),
                    "Chat request failed"
                );
                NETWORK_ERROR_REPLY.to_string()
            }
        }
    }
}

/// First text part of the first candidate, or the matching fallback reply
pub fn extract_reply(body: &str) -> String {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Chat response is not valid JSON");
            return INVALID_RESPONSE_REPLY.to_string();
        }
    };
    if !value.is_object() {
        return INVALID_RESPONSE_REPLY.to_string();
    }

    let response: GenerateContentResponse = match serde_json::from_value(value) {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, "Chat response has an unexpected shape");
            return INVALID_RESPONSE_REPLY.to_string();
        }
    };

    response
        .candidates
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.unwrap_or_default().into_iter().next())
        .and_then(|part| part.text)
        .unwrap_or_else(|| UNPROCESSABLE_REPLY.to_string())
}
