//! Translation flow controller
//!
//! Validates the form, shows the in-flight placeholder, sends one request and
//! renders whatever came back. Listen and download work on whatever the
//! output surface currently displays.

pub mod service;
pub mod types;

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::download::{DownloadFile, FileSaver};
use crate::core::features::languages;
use crate::core::http::HttpClient;
use crate::core::page::Page;
use crate::core::speech::{SpeechOutput, Utterance};
use crate::shared::emit::{EventBus, EventHandler, Subscription};
use crate::shared::error::{AppError, AppResult};
use crate::shared::events::UiEvent;
use crate::shared::settings::AppSettings;
use crate::shared::types::OutputContent;

use service::TranslatorService;
use types::{
    TranslationOutcome, TranslationRequest, MSG_ENTER_TEXT, MSG_SELECT_LANGUAGE, MSG_TRANSLATE_FIRST,
    MSG_TRANSLATING,
};

pub struct TranslationFlow {
    page: Page,
    service: TranslatorService,
    speech: Arc<dyn SpeechOutput>,
    saver: Arc<dyn FileSaver>,
    settings: Arc<AppSettings>,
    latest_request: AtomicU64,
}

impl TranslationFlow {
    pub fn new(
        page: Page,
        http: Arc<dyn HttpClient>,
        speech: Arc<dyn SpeechOutput>,
        saver: Arc<dyn FileSaver>,
        settings: Arc<AppSettings>,
    ) -> Self {
        Self {
            page,
            service: TranslatorService::new(http),
            speech,
            saver,
            settings,
            latest_request: AtomicU64::new(0),
        }
    }

    /// Submit whatever the form currently holds.
    pub async fn submit(&self) -> AppResult<TranslationOutcome> {
        let text = self.page.input_text();
        let lang = self.page.selected_language();
        self.submit_text(&text, &lang).await
    }

    /// Validation failures render their prompt and come back as
    /// `AppError::Validation` without any request being made.
    pub async fn submit_text(&self, text: &str, target_language_code: &str) -> AppResult<TranslationOutcome> {
        if text.trim().is_empty() {
            self.page.render_output(OutputContent::text(MSG_ENTER_TEXT));
            return Err(AppError::Validation(MSG_ENTER_TEXT.to_string()));
        }
        if target_language_code.is_empty() {
            self.page.render_output(OutputContent::text(MSG_SELECT_LANGUAGE));
            return Err(AppError::Validation(MSG_SELECT_LANGUAGE.to_string()));
        }

        let sequence = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        self.page.render_output(OutputContent::text(MSG_TRANSLATING));

        log::info!(
            "[Translator] Request #{}: {} chars to {}",
            sequence,
            text.chars().count(),
            languages::display_name(&self.settings.languages, target_language_code)
                .unwrap_or(target_language_code)
        );

        let request = TranslationRequest::new(text, target_language_code);
        let outcome = self.service.translate(&request).await;

        if self.settings.translation.discard_stale_responses
            && self.latest_request.load(Ordering::SeqCst) != sequence
        {
            log::debug!("[Translator] Dropping stale response for request #{}", sequence);
            return Ok(outcome);
        }

        self.page.render_output(outcome.render());
        Ok(outcome)
    }

    /// Read the displayed translation aloud. Returns `false` when there was
    /// nothing to read and the user was prompted instead.
    pub async fn speak(&self) -> AppResult<bool> {
        if self.page.output_is_empty() {
            self.page.alert(MSG_TRANSLATE_FIRST);
            return Ok(false);
        }

        let utterance = Utterance {
            text: self.page.output_text(),
            lang: self.settings.synthesis_lang(&self.page.selected_language()),
            rate: self.settings.speech.rate,
        };
        log::debug!("[Speech] Speaking {} chars as {}", utterance.text.len(), utterance.lang);
        self.speech.speak(utterance).await?;
        Ok(true)
    }

    /// Save the displayed translation as `translation_<code>.txt`. Returns
    /// `None` when there was nothing to save.
    pub async fn download(&self) -> AppResult<Option<PathBuf>> {
        if self.page.output_is_empty() {
            self.page.alert(MSG_TRANSLATE_FIRST);
            return Ok(None);
        }

        let file = DownloadFile::plain_text(
            format!("translation_{}.txt", self.page.selected_language()),
            self.page.output_text(),
        );
        let path = self.saver.save(file).await?;
        Ok(Some(path))
    }
}

struct TranslationBinding {
    flow: Arc<TranslationFlow>,
}

#[async_trait]
impl EventHandler<UiEvent> for TranslationBinding {
    async fn handle(&self, event: &UiEvent) {
        match event {
            UiEvent::TranslateSubmitted => {
                // Outcomes and prompts are already on the page.
                let _ = self.flow.submit().await;
            }
            UiEvent::ListenClicked => {
                if let Err(e) = self.flow.speak().await {
                    log::error!("[Speech] Synthesis failed: {}", e);
                }
            }
            UiEvent::DownloadClicked => {
                if let Err(e) = self.flow.download().await {
                    log::error!("[Download] Failed to save translation: {}", e);
                }
            }
            _ => {}
        }
    }
}

/// Bind the translate form, listen button and download button.
pub fn bind(flow: Arc<TranslationFlow>, bus: &EventBus<UiEvent>) -> Subscription {
    bus.subscribe(Arc::new(TranslationBinding { flow }))
}
