//! Theme preference
//!
//! One persisted key, `theme`, holding the body class (`light-mode` or
//! `dark-mode`). Older pages wrote `darkMode` = `enabled`/`disabled`; that
//! value is honoured once when `theme` is absent, then migrated and removed.

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::page::Page;
use crate::core::storage::KeyValueStore;
use crate::shared::emit::{EventBus, EventHandler, Subscription};
use crate::shared::error::AppResult;
use crate::shared::events::UiEvent;
use crate::shared::types::Theme;

pub const THEME_KEY: &str = "theme";
pub const LEGACY_DARK_MODE_KEY: &str = "darkMode";

pub trait ThemeStore: Send + Sync {
    fn load(&self) -> AppResult<Option<Theme>>;
    fn save(&self, theme: Theme) -> AppResult<()>;
}

pub struct KvThemeStore {
    store: Arc<dyn KeyValueStore>,
}

impl KvThemeStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn load_legacy(&self) -> AppResult<Option<Theme>> {
        let theme = match self.store.get(LEGACY_DARK_MODE_KEY)?.as_deref() {
            Some("enabled") => Theme::Dark,
            Some("disabled") => Theme::Light,
            Some(other) => {
                log::warn!("[Theme] Ignoring legacy {} value {:?}", LEGACY_DARK_MODE_KEY, other);
                return Ok(None);
            }
            None => return Ok(None),
        };

        log::info!("[Theme] Migrating legacy {} preference to {}", LEGACY_DARK_MODE_KEY, THEME_KEY);
        self.save(theme)?;
        self.store.remove(LEGACY_DARK_MODE_KEY)?;
        Ok(Some(theme))
    }
}

impl ThemeStore for KvThemeStore {
    fn load(&self) -> AppResult<Option<Theme>> {
        match self.store.get(THEME_KEY)? {
            Some(value) => match Theme::from_class(&value) {
                Some(theme) => Ok(Some(theme)),
                None => {
                    log::warn!("[Theme] Ignoring unknown {} value {:?}", THEME_KEY, value);
                    Ok(None)
                }
            },
            None => self.load_legacy(),
        }
    }

    fn save(&self, theme: Theme) -> AppResult<()> {
        self.store.set(THEME_KEY, theme.as_class())
    }
}

/// Apply the saved theme, or light when nothing usable is saved.
pub fn restore(page: &Page, store: &dyn ThemeStore) -> Theme {
    let theme = match store.load() {
        Ok(saved) => saved.unwrap_or_default(),
        Err(e) => {
            log::warn!("[Theme] Failed to load preference: {}", e);
            Theme::default()
        }
    };
    page.apply_theme(theme);
    theme
}

/// React to the toggle: apply first, then persist.
pub fn toggle(page: &Page, store: &dyn ThemeStore, checked: bool) -> Theme {
    let theme = Theme::from_checked(checked);
    page.apply_theme(theme);
    if let Err(e) = store.save(theme) {
        log::warn!("[Theme] Failed to save preference: {}", e);
    }
    theme
}

struct ThemeBinding {
    page: Page,
    store: Arc<dyn ThemeStore>,
}

#[async_trait]
impl EventHandler<UiEvent> for ThemeBinding {
    async fn handle(&self, event: &UiEvent) {
        if let UiEvent::ThemeToggled { checked } = event {
            toggle(&self.page, self.store.as_ref(), *checked);
        }
    }
}

/// Restore the saved theme and bind the toggle.
pub fn bind(page: Page, store: Arc<dyn ThemeStore>, bus: &EventBus<UiEvent>) -> Subscription {
    restore(&page, store.as_ref());
    bus.subscribe(Arc::new(ThemeBinding { page, store }))
}
