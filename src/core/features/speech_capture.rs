//! Microphone button
//!
//! Hidden when the platform has no recognition engine. Otherwise a click
//! starts one session; a recognized transcript goes straight into the input
//! field and is translated without a separate submit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::features::translator::TranslationFlow;
use crate::core::page::Page;
use crate::core::speech::SpeechInput;
use crate::shared::emit::{EventBus, EventHandler, Subscription};
use crate::shared::events::{RecognitionEvent, UiEvent};
use crate::shared::types::MicLabel;

struct SpeechCaptureBinding {
    page: Page,
    input: Arc<dyn SpeechInput>,
    flow: Arc<TranslationFlow>,
    lang: String,
    /// A session was started and has not ended yet.
    listening: AtomicBool,
}

impl SpeechCaptureBinding {
    async fn start_listening(&self) {
        let already_listening = self.listening.swap(true, Ordering::SeqCst);
        self.page.set_mic_label(MicLabel::Listening);
        if let Err(e) = self.input.start(&self.lang).await {
            log::error!("[Speech] Failed to start recognition: {}", e);
            // A refused restart leaves the running session in charge of the label.
            if !already_listening {
                self.listening.store(false, Ordering::SeqCst);
                self.page.set_mic_label(MicLabel::Idle);
            }
        }
    }

    async fn on_recognition(&self, event: &RecognitionEvent) {
        self.listening.store(false, Ordering::SeqCst);
        match event {
            RecognitionEvent::Result { transcript } => {
                self.page.set_input_text(transcript);
                self.page.set_mic_label(MicLabel::Idle);
                let _ = self.flow.submit().await;
            }
            RecognitionEvent::Error { error } => {
                log::error!("[Speech] Speech recognition error: {}", error);
                self.page.set_mic_label(MicLabel::Idle);
            }
            RecognitionEvent::End => {
                self.page.set_mic_label(MicLabel::Idle);
            }
        }
    }
}

#[async_trait]
impl EventHandler<UiEvent> for SpeechCaptureBinding {
    async fn handle(&self, event: &UiEvent) {
        match event {
            UiEvent::MicClicked => self.start_listening().await,
            UiEvent::Recognition(recognition) => self.on_recognition(recognition).await,
            _ => {}
        }
    }
}

/// Bind the microphone, or hide it when recognition is unsupported.
pub fn bind(
    page: Page,
    input: Arc<dyn SpeechInput>,
    flow: Arc<TranslationFlow>,
    lang: &str,
    bus: &EventBus<UiEvent>,
) -> Subscription {
    if !input.is_available() {
        log::info!("[Speech] Recognition unavailable, hiding microphone");
        page.hide_mic();
        return Subscription::inert();
    }

    bus.subscribe(Arc::new(SpeechCaptureBinding {
        page,
        input,
        flow,
        lang: lang.to_string(),
        listening: AtomicBool::new(false),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::events::AppEvent;
    use crate::shared::settings::AppSettings;
    use crate::shared::types::OutputContent;
    use crate::test_support::{
        EventLog, FakeHttpClient, FakeSpeechInput, LogCapture, RecordingSaver, RecordingSpeechOutput,
    };

    fn setup(input: Arc<FakeSpeechInput>) -> (Page, Arc<FakeHttpClient>, EventBus<UiEvent>, Subscription) {
        let settings = Arc::new(AppSettings::default());
        let page = Page::new(&settings);
        let http = FakeHttpClient::new();
        let flow = Arc::new(TranslationFlow::new(
            page.clone(),
            http.clone(),
            RecordingSpeechOutput::new(),
            RecordingSaver::new(),
            settings.clone(),
        ));
        let bus = EventBus::new();
        let sub = bind(page.clone(), input, flow, &settings.speech.recognition_lang, &bus);
        (page, http, bus, sub)
    }

    #[tokio::test]
    async fn test_unavailable_hides_control() {
        let (page, _http, bus, sub) = setup(FakeSpeechInput::unavailable());
        assert!(!page.mic_visible());
        assert!(!sub.is_bound());
        assert_eq!(bus.handler_count(), 0);
    }

    #[tokio::test]
    async fn test_click_starts_session_and_shows_listening() {
        let input = FakeSpeechInput::available();
        let (page, _http, bus, _sub) = setup(input.clone());

        bus.dispatch(&UiEvent::MicClicked).await;

        assert_eq!(input.started(), vec!["en-US".to_string()]);
        assert_eq!(page.mic_label(), MicLabel::Listening);
    }

    #[tokio::test]
    async fn test_transcript_fills_input_and_translates() {
        let (page, http, bus, _sub) = setup(FakeSpeechInput::available());
        page.select_language("bemba").unwrap();
        http.reply(200, r#"{"translation":"Mwashibukeni"}"#);
        let log = EventLog::attach(&page);

        bus.dispatch(&UiEvent::MicClicked).await;
        bus.dispatch(&UiEvent::Recognition(RecognitionEvent::Result {
            transcript: "good morning".to_string(),
        }))
        .await;

        assert_eq!(page.input_text(), "good morning");
        assert_eq!(page.output(), OutputContent::text("Mwashibukeni"));
        assert_eq!(page.mic_label(), MicLabel::Idle);
        assert_eq!(http.requests().len(), 1);
        assert!(log.events().contains(&AppEvent::InputChanged("good morning".to_string())));
    }

    #[tokio::test]
    async fn test_error_and_end_restore_idle_label() {
        let (page, http, bus, _sub) = setup(FakeSpeechInput::available());

        bus.dispatch(&UiEvent::MicClicked).await;
        bus.dispatch(&UiEvent::Recognition(RecognitionEvent::Error { error: "no-speech".to_string() })).await;
        assert_eq!(page.mic_label(), MicLabel::Idle);

        bus.dispatch(&UiEvent::MicClicked).await;
        bus.dispatch(&UiEvent::Recognition(RecognitionEvent::End)).await;
        assert_eq!(page.mic_label(), MicLabel::Idle);

        // Errors are not shown on the output surface.
        assert_eq!(page.output(), OutputContent::text("Translation will appear here"));
        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn test_recognition_error_is_logged() {
        let logs = LogCapture::start();
        let (_page, _http, bus, _sub) = setup(FakeSpeechInput::available());

        bus.dispatch(&UiEvent::MicClicked).await;
        bus.dispatch(&UiEvent::Recognition(RecognitionEvent::Error { error: "no-speech".to_string() })).await;

        assert!(logs.contains(log::Level::Error, &["[Speech]", "no-speech"]));
    }

    #[tokio::test]
    async fn test_refused_restart_keeps_running_session_label() {
        let input = FakeSpeechInput::busy_after_first();
        let (page, _http, bus, _sub) = setup(input.clone());

        bus.dispatch(&UiEvent::MicClicked).await;
        bus.dispatch(&UiEvent::MicClicked).await;

        assert_eq!(input.started().len(), 2);
        assert_eq!(page.mic_label(), MicLabel::Listening);

        bus.dispatch(&UiEvent::Recognition(RecognitionEvent::End)).await;
        assert_eq!(page.mic_label(), MicLabel::Idle);
    }

    #[tokio::test]
    async fn test_failed_start_restores_idle_label() {
        let (page, _http, bus, _sub) = setup(FakeSpeechInput::failing());

        bus.dispatch(&UiEvent::MicClicked).await;

        assert_eq!(page.mic_label(), MicLabel::Idle);
    }
}
