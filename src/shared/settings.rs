use serde::{Deserialize, Serialize};
use tokio::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use directories::ProjectDirs;

use super::error::{AppError, AppResult};

/// Overrides `server.base_url` when set.
pub const SERVER_URL_ENV: &str = "TRANSLATE_PAGE_SERVER_URL";

/// Per-user config and data directories shared by settings and local storage.
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "community-translate", "translate-page")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub server: ServerSettings,
    pub speech: SpeechSettings,
    pub translation: TranslationSettings,
    pub languages: Vec<LanguageOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    pub recognition_lang: String,
    pub synthesis_base_lang: String,
    pub rate: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationSettings {
    pub placeholder: String,
    /// Apply a response only if no newer submission has been issued since.
    pub discard_stale_responses: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageOption {
    pub code: String,
    pub name: String,
}

impl LanguageOption {
    pub fn new(code: &str, name: &str) -> Self {
        Self { code: code.to_string(), name: name.to_string() }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: 30,
            user_agent: "translate-page/0.1".to_string(),
        }
    }
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            recognition_lang: "en-US".to_string(),
            synthesis_base_lang: "en".to_string(),
            rate: 0.9,
        }
    }
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            placeholder: "Translation will appear here".to_string(),
            discard_stale_responses: false,
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            speech: SpeechSettings::default(),
            translation: TranslationSettings::default(),
            languages: crate::core::features::languages::default_catalogue(),
        }
    }
}

impl ServerSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl AppSettings {
    pub fn get_settings_path() -> AppResult<PathBuf> {
        project_dirs()
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or_else(|| AppError::Config("Failed to determine config directory".to_string()))
    }

    /// Load from the per-user config directory, falling back to defaults.
    pub async fn load() -> AppResult<Self> {
        let path = Self::get_settings_path()?;
        Self::load_from(&path).await
    }

    pub async fn load_from(path: &Path) -> AppResult<Self> {
        let mut settings = if !path.exists() {
            log::debug!("[Settings] No settings at {}, using defaults", path.display());
            Self::default()
        } else {
            let content = fs::read_to_string(path).await
                .map_err(|e| AppError::Config(format!("Failed to read settings file: {}", e)))?;

            serde_json::from_str(&content)
                .map_err(|e| AppError::Config(format!("Failed to parse settings: {}", e)))?
        };

        settings.apply_env_overrides();
        settings.validate()?;
        Ok(settings)
    }

    pub async fn save(&self) -> AppResult<()> {
        let path = Self::get_settings_path()?;
        self.save_to(&path).await
    }

    pub async fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await
                .map_err(|e| AppError::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("Failed to serialize settings: {}", e)))?;

        fs::write(path, content).await
            .map_err(|e| AppError::Config(format!("Failed to write settings file: {}", e)))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            if !url.trim().is_empty() {
                log::info!("[Settings] Server URL overridden by {}", SERVER_URL_ENV);
                self.server.base_url = url.trim().to_string();
            }
        }
    }

    fn validate(&self) -> AppResult<()> {
        if self.server.base_url.trim().is_empty() {
            return Err(AppError::Config("server.base_url must not be empty".to_string()));
        }
        if !(self.speech.rate > 0.0 && self.speech.rate <= 10.0) {
            return Err(AppError::Config(format!("speech.rate out of range: {}", self.speech.rate)));
        }
        Ok(())
    }

    /// Locale tag for synthesis, e.g. `en-bemba`.
    pub fn synthesis_lang(&self, target_language_code: &str) -> String {
        format!("{}-{}", self.speech.synthesis_base_lang, target_language_code)
    }
}
