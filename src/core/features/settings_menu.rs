//! Settings dropdown: the button toggles it, a click anywhere else closes it.

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::page::Page;
use crate::shared::emit::{EventBus, EventHandler, Subscription};
use crate::shared::events::UiEvent;
use crate::shared::types::ClickTarget;

struct SettingsMenuBinding {
    page: Page,
}

#[async_trait]
impl EventHandler<UiEvent> for SettingsMenuBinding {
    async fn handle(&self, event: &UiEvent) {
        match event {
            // The button click does not bubble to the document handler.
            UiEvent::SettingsButtonClicked => {
                let visible = self.page.settings_menu_visible();
                self.page.set_settings_menu_visible(!visible);
            }
            UiEvent::DocumentClicked(ClickTarget::Elsewhere) => {
                self.page.set_settings_menu_visible(false);
            }
            _ => {}
        }
    }
}

pub fn bind(page: Page, bus: &EventBus<UiEvent>) -> Subscription {
    bus.subscribe(Arc::new(SettingsMenuBinding { page }))
}
