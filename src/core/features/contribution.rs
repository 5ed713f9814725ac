//! Contribution form
//!
//! Users propose an English phrase with its translation; the server queues it
//! for review. Same shape as the translation flow: validate, one POST, one
//! status line.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::http::{HttpClient, HttpResponse};
use crate::core::page::Page;
use crate::shared::emit::{EventBus, EventHandler, Subscription};
use crate::shared::error::{AppError, AppResult};
use crate::shared::events::UiEvent;
use crate::shared::types::StatusMessage;

pub const CONTRIBUTE_PATH: &str = "/contribute";
pub const CSRF_HEADER: &str = "X-CSRFToken";

pub const MSG_FILL_ALL: &str = "⚠️ Please fill in all fields and select a language.";
pub const MSG_MISSING_TOKEN: &str = "⚠️ Missing security token. Please reload the page.";
pub const MSG_SUBMITTED: &str = "✅ Contribution submitted successfully!";
pub const MSG_FALLBACK: &str = "Something went wrong.";
pub const MSG_CONNECTION: &str = "❌ An error occurred. Please check your connection.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContributionRequest {
    pub english: String,
    pub translation: String,
    pub language: String,
}

#[derive(Debug, Default, Deserialize)]
struct ContributeReply {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContributionOutcome {
    Accepted,
    Rejected { message: String },
    NetworkFailure,
}

impl ContributionOutcome {
    pub fn status(&self) -> StatusMessage {
        match self {
            ContributionOutcome::Accepted => StatusMessage::success(MSG_SUBMITTED),
            ContributionOutcome::Rejected { message } => StatusMessage::error(format!("❌ Error: {}", message)),
            ContributionOutcome::NetworkFailure => StatusMessage::error(MSG_CONNECTION),
        }
    }
}

pub struct ContributionFlow {
    page: Page,
    http: Arc<dyn HttpClient>,
}

impl ContributionFlow {
    pub fn new(page: Page, http: Arc<dyn HttpClient>) -> Self {
        Self { page, http }
    }

    fn reject(&self, message: &str) -> AppError {
        self.page.set_contribution_status(StatusMessage::error(message));
        AppError::Validation(message.to_string())
    }

    pub async fn submit(&self) -> AppResult<ContributionOutcome> {
        let form = self.page.contribution();
        let request = ContributionRequest {
            english: form.english.trim().to_string(),
            translation: form.translation.trim().to_string(),
            language: form.language.clone(),
        };

        if request.english.is_empty() || request.translation.is_empty() || request.language.is_empty() {
            return Err(self.reject(MSG_FILL_ALL));
        }
        let token = match form.csrf_token.as_deref().filter(|t| !t.trim().is_empty()) {
            Some(token) => token.to_string(),
            None => {
                log::warn!("[Contribution] Form has no anti-forgery token");
                return Err(self.reject(MSG_MISSING_TOKEN));
            }
        };

        let body = serde_json::to_value(&request)?;
        let headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            (CSRF_HEADER.to_string(), token),
        ];

        let outcome = match self.http.post_json(CONTRIBUTE_PATH, body, headers).await {
            Ok(response) => Self::interpret(&response),
            Err(e) => {
                log::error!("[Contribution] Request failed: {}", e);
                ContributionOutcome::NetworkFailure
            }
        };

        if outcome == ContributionOutcome::Accepted {
            log::info!("[Contribution] Submitted {} entry", request.language);
            self.page.clear_contribution_fields();
        }
        self.page.set_contribution_status(outcome.status());
        Ok(outcome)
    }

    /// A 2xx is accepted only when its body is JSON. Anything else (a login
    /// page served after a redirect) counts as a failed request.
    pub fn interpret(response: &HttpResponse) -> ContributionOutcome {
        if response.is_success() {
            return match response.json::<serde_json::Value>() {
                Ok(_) => ContributionOutcome::Accepted,
                Err(e) => {
                    log::error!("[Contribution] Unreadable response ({}): {}", response.status, e);
                    ContributionOutcome::NetworkFailure
                }
            };
        }
        let message = response
            .json::<ContributeReply>()
            .ok()
            .and_then(|reply| reply.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| MSG_FALLBACK.to_string());
        log::warn!("[Contribution] Server returned {}: {}", response.status, message);
        ContributionOutcome::Rejected { message }
    }
}

struct ContributionBinding {
    flow: Arc<ContributionFlow>,
}

#[async_trait]
impl EventHandler<UiEvent> for ContributionBinding {
    async fn handle(&self, event: &UiEvent) {
        if let UiEvent::ContributionSubmitted = event {
            let _ = self.flow.submit().await;
        }
    }
}

pub fn bind(flow: Arc<ContributionFlow>, bus: &EventBus<UiEvent>) -> Subscription {
    bus.subscribe(Arc::new(ContributionBinding { flow }))
}
