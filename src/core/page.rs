//! In-memory model of the page controls.
//!
//! Every mutation goes through [`Page`], which updates the shared state and
//! then emits the matching [`AppEvent`] so the host can repaint. The lock is
//! never held while listeners run.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::shared::emit::{EventEmitter, Subscription};
use crate::shared::error::{AppError, AppResult};
use crate::shared::events::AppEvent;
use crate::shared::settings::{AppSettings, LanguageOption};
use crate::shared::types::{MicLabel, OutputContent, StatusMessage, Theme};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContributionForm {
    pub english: String,
    pub translation: String,
    pub language: String,
    pub csrf_token: Option<String>,
    pub status: Option<StatusMessage>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    pub input_text: String,
    /// Empty string means nothing selected.
    pub selected_language: String,
    pub language_options: Vec<LanguageOption>,
    pub placeholder: String,
    pub output: OutputContent,
    pub theme: Option<Theme>,
    pub theme_toggle_checked: bool,
    pub settings_menu_visible: bool,
    pub mic_label: MicLabel,
    pub mic_visible: bool,
    pub contribution: ContributionForm,
}

impl PageState {
    fn new(settings: &AppSettings) -> Self {
        Self {
            input_text: String::new(),
            selected_language: String::new(),
            language_options: settings.languages.clone(),
            placeholder: settings.translation.placeholder.clone(),
            output: OutputContent::text(settings.translation.placeholder.clone()),
            theme: None,
            theme_toggle_checked: false,
            settings_menu_visible: false,
            mic_label: MicLabel::Idle,
            mic_visible: true,
            contribution: ContributionForm::default(),
        }
    }

    fn offers_language(&self, code: &str) -> bool {
        code.is_empty() || self.language_options.iter().any(|opt| opt.code == code)
    }
}

#[derive(Clone)]
pub struct Page {
    state: Arc<Mutex<PageState>>,
    events: EventEmitter<AppEvent>,
}

impl Page {
    pub fn new(settings: &AppSettings) -> Self {
        Self {
            state: Arc::new(Mutex::new(PageState::new(settings))),
            events: EventEmitter::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("[Page] State mutex poisoned, recovering...");
                poisoned.into_inner()
            }
        }
    }

    /// Listen for repaint events.
    pub fn listen<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        self.events.listen(listener)
    }

    pub fn snapshot(&self) -> PageState {
        self.lock().clone()
    }

    // -- translation form --

    pub fn input_text(&self) -> String {
        self.lock().input_text.clone()
    }

    /// Typing into the input field. Not announced; the host already shows it.
    pub fn type_input(&self, text: &str) {
        self.lock().input_text = text.to_string();
    }

    /// Programmatic write into the input field (recognized speech).
    pub fn set_input_text(&self, text: &str) {
        self.lock().input_text = text.to_string();
        self.events.emit(AppEvent::InputChanged(text.to_string()));
    }

    pub fn selected_language(&self) -> String {
        self.lock().selected_language.clone()
    }

    pub fn select_language(&self, code: &str) -> AppResult<()> {
        let mut state = self.lock();
        if !state.offers_language(code) {
            return Err(AppError::Validation(format!("Unsupported language: {}", code)));
        }
        state.selected_language = code.to_string();
        Ok(())
    }

    pub fn language_options(&self) -> Vec<LanguageOption> {
        self.lock().language_options.clone()
    }

    // -- output surface --

    pub fn output(&self) -> OutputContent {
        self.lock().output.clone()
    }

    pub fn output_text(&self) -> String {
        self.lock().output.inner_text()
    }

    /// True while the output still shows nothing worth exporting.
    pub fn output_is_empty(&self) -> bool {
        let state = self.lock();
        let text = state.output.inner_text();
        text.is_empty() || text == state.placeholder
    }

    pub fn render_output(&self, content: OutputContent) {
        self.lock().output = content.clone();
        self.events.emit(AppEvent::OutputRendered(content));
    }

    pub fn alert(&self, message: &str) {
        self.events.emit(AppEvent::Alert(message.to_string()));
    }

    // -- theme --

    pub fn theme(&self) -> Option<Theme> {
        self.lock().theme
    }

    pub fn theme_toggle_checked(&self) -> bool {
        self.lock().theme_toggle_checked
    }

    /// Swap the body class and sync the toggle.
    pub fn apply_theme(&self, theme: Theme) {
        {
            let mut state = self.lock();
            state.theme = Some(theme);
            state.theme_toggle_checked = theme.is_dark();
        }
        self.events.emit(AppEvent::ThemeApplied(theme));
    }

    // -- settings menu --

    pub fn settings_menu_visible(&self) -> bool {
        self.lock().settings_menu_visible
    }

    pub fn set_settings_menu_visible(&self, visible: bool) {
        {
            let mut state = self.lock();
            if state.settings_menu_visible == visible {
                return;
            }
            state.settings_menu_visible = visible;
        }
        self.events.emit(AppEvent::SettingsMenuVisibility(visible));
    }

    // -- microphone --

    pub fn mic_label(&self) -> MicLabel {
        self.lock().mic_label
    }

    pub fn mic_visible(&self) -> bool {
        self.lock().mic_visible
    }

    pub fn set_mic_label(&self, label: MicLabel) {
        self.lock().mic_label = label;
        self.events.emit(AppEvent::MicLabelChanged(label));
    }

    pub fn hide_mic(&self) {
        self.lock().mic_visible = false;
        self.events.emit(AppEvent::MicHidden);
    }

    // -- contribution form --

    pub fn contribution(&self) -> ContributionForm {
        self.lock().contribution.clone()
    }

    pub fn fill_contribution(&self, english: &str, translation: &str) {
        let mut state = self.lock();
        state.contribution.english = english.to_string();
        state.contribution.translation = translation.to_string();
    }

    pub fn select_contribution_language(&self, code: &str) -> AppResult<()> {
        let mut state = self.lock();
        if !state.offers_language(code) {
            return Err(AppError::Validation(format!("Unsupported language: {}", code)));
        }
        state.contribution.language = code.to_string();
        Ok(())
    }

    /// Anti-forgery token embedded in the form by the server.
    pub fn set_csrf_token(&self, token: Option<&str>) {
        self.lock().contribution.csrf_token = token.map(str::to_string);
    }

    pub fn clear_contribution_fields(&self) {
        {
            let mut state = self.lock();
            state.contribution.english.clear();
            state.contribution.translation.clear();
            state.contribution.language.clear();
        }
        self.events.emit(AppEvent::ContributionCleared);
    }

    pub fn set_contribution_status(&self, status: StatusMessage) {
        self.lock().contribution.status = Some(status.clone());
        self.events.emit(AppEvent::ContributionStatus(status));
    }
}
