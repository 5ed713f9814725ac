use serde::{Deserialize, Serialize, Serializer};

use crate::shared::types::OutputContent;

pub const MSG_ENTER_TEXT: &str = "Please enter some English text.";
pub const MSG_SELECT_LANGUAGE: &str = "Please select a language to translate to.";
pub const MSG_TRANSLATING: &str = "Translating...";
pub const MSG_SERVER_FALLBACK: &str = "Something went wrong on the server.";
pub const MSG_UNKNOWN: &str = "An unknown error occurred. Please try again.";
pub const MSG_CONNECTION: &str =
    "Error connecting to server. Please check your internet connection and ensure the server is running.";
pub const MSG_TRANSLATE_FIRST: &str = "Please translate something first.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub target_language_code: String,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, target_language_code: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target_language_code: target_language_code.into(),
        }
    }
}

impl Serialize for TranslationRequest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("TranslationRequest", 2)?;
        s.serialize_field("text", &self.text)?;
        s.serialize_field("lang", &self.target_language_code)?;
        s.end()
    }
}

/// Body of a `/translate` response. Every field is optional; which ones are
/// present decides the outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TranslateReply {
    #[serde(default)]
    pub translation: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub suggestion: Option<String>,
}

impl TranslateReply {
    fn translation(&self) -> Option<&str> {
        self.translation.as_deref().filter(|t| !t.is_empty())
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }

    /// Error detail carried by a non-OK response.
    pub fn error_detail(&self) -> Option<&str> {
        self.translation().or_else(|| self.message())
    }

    pub fn into_success_outcome(self) -> TranslationOutcome {
        if let Some(translated) = self.translation() {
            return TranslationOutcome::Success { translated_text: translated.to_string() };
        }
        if let Some(message) = self.message() {
            return TranslationOutcome::DomainError {
                message: message.to_string(),
                suggestion: self.suggestion.clone().unwrap_or_default(),
            };
        }
        TranslationOutcome::Unknown
    }
}

/// Result of one submission that got past validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TranslationOutcome {
    Success { translated_text: String },
    ServerError { message: String },
    DomainError { message: String, suggestion: String },
    /// OK response that carried none of the expected fields.
    Unknown,
    NetworkFailure,
}

impl TranslationOutcome {
    pub fn render(&self) -> OutputContent {
        match self {
            TranslationOutcome::Success { translated_text } => OutputContent::text(translated_text.clone()),
            TranslationOutcome::ServerError { message } => {
                OutputContent::text(format!("❌ Server Error: {}", message))
            }
            TranslationOutcome::DomainError { message, suggestion } => OutputContent::Structured {
                message: message.clone(),
                suggestion: suggestion.clone(),
            },
            TranslationOutcome::Unknown => OutputContent::text(MSG_UNKNOWN),
            TranslationOutcome::NetworkFailure => OutputContent::text(MSG_CONNECTION),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TranslationOutcome::Success { .. })
    }
}
