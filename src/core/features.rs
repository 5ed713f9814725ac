//! Page features, one binding each.
//!
//! Every binding subscribes to the inbound `UiEvent` bus and ignores events
//! that belong to other features.

pub mod translator;
pub mod theme;
pub mod settings_menu;
pub mod speech_capture;
pub mod contribution;
pub mod languages;
