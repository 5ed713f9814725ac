use std::sync::Arc;

use crate::core::http::{HttpClient, HttpResponse};

use super::types::{TranslateReply, TranslationOutcome, TranslationRequest, MSG_SERVER_FALLBACK};

pub const TRANSLATE_PATH: &str = "/translate";

/// Talks to the `/translate` endpoint. Exactly one request per call, never
/// retried; every failure becomes a [`TranslationOutcome`].
pub struct TranslatorService {
    http: Arc<dyn HttpClient>,
}

impl TranslatorService {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    pub async fn translate(&self, req: &TranslationRequest) -> TranslationOutcome {
        let body = match serde_json::to_value(req) {
            Ok(body) => body,
            Err(e) => {
                log::error!("[Translator] Failed to encode request: {}", e);
                return TranslationOutcome::NetworkFailure;
            }
        };

        let headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        match self.http.post_json(TRANSLATE_PATH, body, headers).await {
            Ok(response) => Self::interpret(&response),
            Err(e) => {
                log::error!("[Translator] Network or parsing error: {}", e);
                TranslationOutcome::NetworkFailure
            }
        }
    }

    /// Map a completed exchange onto an outcome.
    ///
    /// Non-OK responses never fail to render: a missing or unreadable body
    /// falls back to the generic server message. An OK response whose body is
    /// not JSON counts as a failed request.
    pub fn interpret(response: &HttpResponse) -> TranslationOutcome {
        if !response.is_success() {
            let detail = response
                .json::<TranslateReply>()
                .ok()
                .and_then(|reply| reply.error_detail().map(str::to_string));
            log::warn!("[Translator] Server returned {}", response.status);
            return TranslationOutcome::ServerError {
                message: detail.unwrap_or_else(|| MSG_SERVER_FALLBACK.to_string()),
            };
        }

        match response.json::<TranslateReply>() {
            Ok(reply) => reply.into_success_outcome(),
            Err(e) => {
                log::error!("[Translator] Failed to parse translation response: {}", e);
                TranslationOutcome::NetworkFailure
            }
        }
    }
}
