//! Speech capabilities: recognition (microphone in) and synthesis (listen out).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::shared::error::{AppError, AppResult};

/// One synthesis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    pub lang: String,
    pub rate: f32,
}

/// Speech recognition engine.
///
/// `start` begins a single session; its result, error and end callbacks come
/// back to the page as `UiEvent::Recognition`.
#[async_trait]
pub trait SpeechInput: Send + Sync {
    fn is_available(&self) -> bool;

    async fn start(&self, lang: &str) -> AppResult<()>;
}

#[async_trait]
pub trait SpeechOutput: Send + Sync {
    async fn speak(&self, utterance: Utterance) -> AppResult<()>;
}

/// Placeholder for hosts without a recognition engine. The microphone
/// control is hidden when this is injected.
pub struct NoSpeechInput;

#[async_trait]
impl SpeechInput for NoSpeechInput {
    fn is_available(&self) -> bool {
        false
    }

    async fn start(&self, _lang: &str) -> AppResult<()> {
        Err(AppError::Speech("Speech recognition is not supported".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_speech_input_refuses_to_start() {
        let input = NoSpeechInput;
        assert!(!input.is_available());
        assert!(matches!(input.start("en-US").await, Err(AppError::Speech(_))));
    }
}
