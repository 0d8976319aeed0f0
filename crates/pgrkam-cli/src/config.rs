//! Configuration file support

use pgrkam_api::client::DEFAULT_BASE_URL;
use pgrkam_tui::Theme;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for pgrkam
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Chat endpoint base, e.g. "http://localhost:8000" or "https://host/api/v1"
    pub api_url: Option<String>,
    /// Language used when none has been saved ("en" or "pa")
    pub language: Option<String>,
    /// Total request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Whether to use TUI mode by default
    pub tui: Option<bool>,
    /// TUI color theme ("dark" or "light")
    pub theme: Option<String>,
    /// Keep language and session in memory only
    pub ephemeral: Option<bool>,
    /// Speech-to-text settings
    #[serde(default)]
    pub speech: SpeechSettings,
}

/// External transcriber configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    /// Program and arguments; `{lang}` is replaced by "en-IN" or "pa-IN"
    pub command: Option<Vec<String>>,
}

impl Config {
    /// Get the config directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pgrkam")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("PGRKAM_CONFIG_PATH") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }

    /// Load config from the default path
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load config from a file. Missing or invalid files yield defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Save config to a file
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, content)
    }

    /// Create a default config file if it doesn't exist
    pub fn init() -> std::io::Result<PathBuf> {
        let path = Self::config_path();
        if path.exists() {
            return Ok(path);
        }

        let default_config = Config {
            api_url: Some(DEFAULT_BASE_URL.to_string()),
            language: Some("en".to_string()),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            tui: Some(true),
            theme: Some("dark".to_string()),
            ephemeral: Some(false),
            speech: SpeechSettings::default(),
        };

        default_config.save_to(&path)?;
        Ok(path)
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    /// Configured TUI theme, dark when unset or unknown
    pub fn theme(&self) -> Theme {
        let Some(name) = self.theme.as_deref() else {
            return Theme::default();
        };
        Theme::from_name(name).unwrap_or_else(|| {
            eprintln!("Warning: Unknown theme '{}', using dark", name);
            Theme::default()
        })
    }
}

/// Generate example config content
pub fn example_config() -> &'static str {
    r#"# pgrkam configuration file
# Place at ~/.config/pgrkam/config.toml (Linux), ~/Library/Application Support/pgrkam/config.toml (Mac)
# or %APPDATA%\pgrkam\config.toml (Windows). PGRKAM_CONFIG_PATH overrides the location.

# Chat endpoint base; "/chat" is appended. The server also mounts it under /api/v1.
api_url = "http://localhost:8000"

# Language used until you switch (en, pa)
language = "en"

# Request timeout in seconds
timeout_secs = 30

# Whether to use TUI mode by default
tui = true

# TUI color theme (dark, light)
theme = "dark"

# Keep language and session in memory only (forgotten on exit)
ephemeral = false

# Speech input through an external transcriber that prints one result per line.
# Lines starting with "~" are interim results. {lang} becomes en-IN or pa-IN.
[speech]
# command = ["whisper-stream", "--language", "{lang}"]
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_parses() {
        let config: Config = toml::from_str(example_config()).unwrap();
        assert_eq!(config.api_url(), "http://localhost:8000");
        assert_eq!(config.language.as_deref(), Some("en"));
        assert_eq!(config.timeout_secs(), 30);
        assert_eq!(config.tui, Some(true));
        assert_eq!(config.theme.as_deref(), Some("dark"));
        assert_eq!(config.speech.command, None);
    }

    #[test]
    fn test_defaults_when_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api_url(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs(), DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_speech_command() {
        let config: Config = toml::from_str(
            r#"
            api_url = "https://pgrkam.example/api/v1"
            [speech]
            command = ["transcribe", "--lang", "{lang}"]
            "#,
        )
        .unwrap();
        assert_eq!(config.api_url(), "https://pgrkam.example/api/v1");
        assert_eq!(
            config.speech.command,
            Some(vec!["transcribe".into(), "--lang".into(), "{lang}".into()])
        );
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = std::env::temp_dir()
            .join(format!("pgrkam-config-test-{}", std::process::id()))
            .join("config.toml");
        let config = Config {
            language: Some("pa".into()),
            ephemeral: Some(true),
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), config);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_light_theme_is_selectable() {
        let config: Config = toml::from_str(r#"theme = "light""#).unwrap();
        assert_eq!(config.theme().bg, Theme::light().bg);

        let fallback = Config {
            theme: Some("neon".into()),
            ..Default::default()
        };
        assert_eq!(fallback.theme().bg, Theme::dark().bg);
        assert_eq!(Config::default().theme().bg, Theme::dark().bg);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("pgrkam-config-does-not-exist.toml");
        assert_eq!(Config::load_from(&path), Config::default());
    }
}
