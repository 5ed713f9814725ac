//! Behavior layer of the community translation page.
//!
//! The page host (a webview or browser shell) forwards control events as
//! [`UiEvent`]s and repaints from the [`AppEvent`]s the [`Page`] emits.
//! Everything the page needs from the platform is injected through
//! [`AppState`].

pub mod shared;
pub mod core;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use crate::core::download::{DirectorySaver, FileSaver};
use crate::core::features::contribution::{self, ContributionFlow};
use crate::core::features::theme::{self, KvThemeStore, ThemeStore};
use crate::core::features::translator::{self, TranslationFlow};
use crate::core::features::{settings_menu, speech_capture};
use crate::core::http::{HttpClient, ReqwestHttpClient};
use crate::core::page::Page;
use crate::core::speech::{SpeechInput, SpeechOutput};
use crate::core::storage::{FileStore, KeyValueStore};
use crate::shared::emit::{EventBus, Subscription};
use crate::shared::error::AppResult;
use crate::shared::settings::AppSettings;

pub use crate::shared::error::AppError;
pub use crate::shared::events::{AppEvent, UiEvent};

/// Everything constructed once at startup and shared by the bindings.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<AppSettings>,
    pub page: Page,
    pub events: EventBus<UiEvent>,
    pub http: Arc<dyn HttpClient>,
    pub theme_store: Arc<dyn ThemeStore>,
    pub speech_input: Arc<dyn SpeechInput>,
    pub speech_output: Arc<dyn SpeechOutput>,
    pub saver: Arc<dyn FileSaver>,
}

impl AppState {
    pub fn new(
        settings: AppSettings,
        http: Arc<dyn HttpClient>,
        storage: Arc<dyn KeyValueStore>,
        speech_input: Arc<dyn SpeechInput>,
        speech_output: Arc<dyn SpeechOutput>,
        saver: Arc<dyn FileSaver>,
    ) -> Self {
        let page = Page::new(&settings);
        Self {
            settings: Arc::new(settings),
            page,
            events: EventBus::new(),
            http,
            theme_store: Arc::new(KvThemeStore::new(storage)),
            speech_input,
            speech_output,
            saver,
        }
    }

    /// Production wiring: reqwest against `server.base_url`, a JSON file for
    /// local storage, downloads into the user's Downloads folder. Speech
    /// engines come from the host.
    pub fn with_platform(
        settings: AppSettings,
        speech_input: Arc<dyn SpeechInput>,
        speech_output: Arc<dyn SpeechOutput>,
    ) -> AppResult<Self> {
        let http = Arc::new(ReqwestHttpClient::new(&settings.server)?);
        let storage = Arc::new(FileStore::open(FileStore::default_path()?)?);
        let saver = Arc::new(DirectorySaver::downloads()?);
        log::info!("[App] Using translation server at {}", settings.server.base_url);
        Ok(Self::new(settings, http, storage, speech_input, speech_output, saver))
    }

    pub async fn dispatch(&self, event: UiEvent) {
        self.events.dispatch(&event).await;
    }
}

/// Live bindings for one page. Dropping this unbinds everything.
pub struct PageBindings {
    pub translation: Arc<TranslationFlow>,
    pub contribution: Arc<ContributionFlow>,
    subscriptions: Vec<Subscription>,
}

impl PageBindings {
    pub fn len(&self) -> usize {
        self.subscriptions.iter().filter(|s| s.is_bound()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dispose(self) {
        for subscription in self.subscriptions {
            subscription.dispose();
        }
    }
}

/// Wire every control on the page. The saved theme is applied immediately.
pub fn bind_page(state: &AppState) -> PageBindings {
    let translation = Arc::new(TranslationFlow::new(
        state.page.clone(),
        state.http.clone(),
        state.speech_output.clone(),
        state.saver.clone(),
        state.settings.clone(),
    ));
    let contribution = Arc::new(ContributionFlow::new(state.page.clone(), state.http.clone()));

    let subscriptions = vec![
        theme::bind(state.page.clone(), state.theme_store.clone(), &state.events),
        settings_menu::bind(state.page.clone(), &state.events),
        translator::bind(translation.clone(), &state.events),
        speech_capture::bind(
            state.page.clone(),
            state.speech_input.clone(),
            translation.clone(),
            &state.settings.speech.recognition_lang,
            &state.events,
        ),
        contribution::bind(contribution.clone(), &state.events),
    ];

    PageBindings {
        translation,
        contribution,
        subscriptions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::speech::NoSpeechInput;
    use crate::core::storage::MemoryStore;
    use crate::shared::types::{ClickTarget, OutputContent, Theme};
    use crate::test_support::{
        EventLog, FakeHttpClient, FakeSpeechInput, RecordingSaver, RecordingSpeechOutput,
    };

    fn state_with(http: Arc<FakeHttpClient>, storage: Arc<MemoryStore>, mic: Arc<dyn SpeechInput>) -> AppState {
        AppState::new(
            AppSettings::default(),
            http,
            storage,
            mic,
            RecordingSpeechOutput::new(),
            RecordingSaver::new(),
        )
    }

    #[tokio::test]
    async fn test_full_page_session() {
        let http = FakeHttpClient::new();
        let storage = Arc::new(MemoryStore::with_entries([("theme", "dark-mode")]));
        let state = state_with(http.clone(), storage.clone(), FakeSpeechInput::available());
        let log = EventLog::attach(&state.page);
        let bindings = bind_page(&state);
        assert_eq!(bindings.len(), 5);
        assert_eq!(state.page.theme(), Some(Theme::Dark));

        state.dispatch(UiEvent::SettingsButtonClicked).await;
        state.dispatch(UiEvent::ThemeToggled { checked: false }).await;
        state.dispatch(UiEvent::DocumentClicked(ClickTarget::Elsewhere)).await;
        assert_eq!(storage.get("theme").unwrap().as_deref(), Some("light-mode"));
        assert!(!state.page.settings_menu_visible());

        http.reply(200, r#"{"translation":"Mwashibukeni"}"#);
        state.page.type_input("good morning");
        state.page.select_language("bemba").unwrap();
        state.dispatch(UiEvent::TranslateSubmitted).await;
        assert_eq!(state.page.output(), OutputContent::text("Mwashibukeni"));

        assert!(log.events().contains(&AppEvent::SettingsMenuVisibility(true)));
        assert!(log.events().contains(&AppEvent::SettingsMenuVisibility(false)));

        bindings.dispose();
        assert_eq!(state.events.handler_count(), 0);
    }

    #[tokio::test]
    async fn test_without_recognition_mic_is_hidden() {
        let state = state_with(
            FakeHttpClient::new(),
            Arc::new(MemoryStore::new()),
            Arc::new(NoSpeechInput),
        );

        let bindings = bind_page(&state);

        assert_eq!(bindings.len(), 4);
        assert!(!state.page.mic_visible());
        assert_eq!(state.page.theme(), Some(Theme::Light));
    }
}
