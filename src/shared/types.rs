use serde::{Deserialize, Serialize};
use std::fmt;

/// What the output surface currently shows.
///
/// Almost everything is plain text. The one exception is the domain error
/// rendering, which keeps message and suggestion apart so the host can
/// emphasise the message and put the suggestion on its own line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum OutputContent {
    Text(String),
    Structured { message: String, suggestion: String },
}

impl OutputContent {
    pub fn text(value: impl Into<String>) -> Self {
        OutputContent::Text(value.into())
    }

    /// The text a reader sees, with markup stripped.
    pub fn inner_text(&self) -> String {
        match self {
            OutputContent::Text(text) => text.clone(),
            OutputContent::Structured { message, suggestion } => {
                format!("❌ {}\n💡 {}", message, suggestion)
            }
        }
    }

    /// Markup for hosts that render HTML. Plain text is escaped as well so it
    /// can never inject elements.
    pub fn to_html(&self) -> String {
        match self {
            OutputContent::Text(text) => escape_html(text),
            OutputContent::Structured { message, suggestion } => format!(
                "❌ <strong>{}</strong><br>💡 {}",
                escape_html(message),
                escape_html(suggestion)
            ),
        }
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Success,
    Error,
}

impl Tone {
    pub fn color(&self) -> &'static str {
        match self {
            Tone::Success => "green",
            Tone::Error => "red",
        }
    }
}

/// Feedback line under the contribution form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub text: String,
    pub tone: Tone,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self { text: text.into(), tone: Tone::Success }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), tone: Tone::Error }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    #[serde(rename = "light-mode")]
    Light,
    #[serde(rename = "dark-mode")]
    Dark,
}

impl Theme {
    /// Body class, also the persisted value.
    pub fn as_class(&self) -> &'static str {
        match self {
            Theme::Light => "light-mode",
            Theme::Dark => "dark-mode",
        }
    }

    pub fn from_class(value: &str) -> Option<Self> {
        match value {
            "light-mode" => Some(Theme::Light),
            "dark-mode" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn from_checked(checked: bool) -> Self {
        if checked { Theme::Dark } else { Theme::Light }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_class())
    }
}

/// Microphone button label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MicLabel {
    #[default]
    Idle,
    Listening,
}

impl MicLabel {
    /// Button markup the host paints on `MicLabelChanged`.
    pub fn to_html(&self) -> &'static str {
        match self {
            MicLabel::Idle => r#"<i class="fas fa-microphone"></i> Speak"#,
            MicLabel::Listening => r#"<i class="fas fa-microphone-slash"></i> Listening..."#,
        }
    }
}

/// Where a document-level click landed, relative to the settings menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickTarget {
    SettingsMenu,
    SettingsButton,
    Elsewhere,
}
