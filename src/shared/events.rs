use serde::{Deserialize, Serialize};
use super::types::{ClickTarget, MicLabel, OutputContent, StatusMessage, Theme};

/// Events raised by the page host (clicks, form submits, recognition callbacks).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum UiEvent {
    #[serde(rename = "translation://submit")]
    TranslateSubmitted,

    #[serde(rename = "translation://listen")]
    ListenClicked,

    #[serde(rename = "translation://download")]
    DownloadClicked,

    #[serde(rename = "theme://toggled")]
    ThemeToggled { checked: bool },

    #[serde(rename = "menu://button-clicked")]
    SettingsButtonClicked,

    #[serde(rename = "document://clicked")]
    DocumentClicked(ClickTarget),

    #[serde(rename = "mic://clicked")]
    MicClicked,

    #[serde(rename = "mic://recognition")]
    Recognition(RecognitionEvent),

    #[serde(rename = "contribution://submit")]
    ContributionSubmitted,
}

/// Callbacks of a speech recognition session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RecognitionEvent {
    Result { transcript: String },
    Error { error: String },
    End,
}

/// State changes pushed back to the host so it can repaint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")] // Tagged enum for easier frontend parsing
pub enum AppEvent {
    #[serde(rename = "output://rendered")]
    OutputRendered(OutputContent),

    #[serde(rename = "page://alert")]
    Alert(String),

    #[serde(rename = "theme://applied")]
    ThemeApplied(Theme),

    #[serde(rename = "menu://visibility")]
    SettingsMenuVisibility(bool),

    #[serde(rename = "mic://label")]
    MicLabelChanged(MicLabel),

    #[serde(rename = "mic://hidden")]
    MicHidden,

    #[serde(rename = "input://changed")]
    InputChanged(String),

    #[serde(rename = "contribution://fields-cleared")]
    ContributionCleared,

    #[serde(rename = "contribution://status")]
    ContributionStatus(StatusMessage),
}
