use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized},
};
use gpui::*;
use gpui_component::{Theme, ThemeMode};
use perch_core::{ChatPhrases, DEFAULT_APOLOGY, DEFAULT_GREETING, DEFAULT_NO_ANSWER};
use perch_llm::{AssistantConfig, DEFAULT_ENDPOINT};
use perch_storage::DEFAULT_STORE_FILE_NAME;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use snafu::{ResultExt, Snafu};

pub const SETTINGS_DIRECTORY_NAME: &str = "perch";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const ENV_PREFIX: &str = "PERCH_";
pub const DEFAULT_ASSISTANT_NAME: &str = "Interas Labs Assistant";
pub const DEFAULT_INPUT_PLACEHOLDER: &str = "Ask about Interas Labs...";
pub const DEFAULT_STATUS_LABEL: &str = "● Online";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Zero disables the client-side timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,
    #[serde(default = "default_greeting")]
    pub greeting: String,
    #[serde(default = "default_apology")]
    pub apology: String,
    #[serde(default = "default_no_answer")]
    pub no_answer: String,
    #[serde(default = "default_input_placeholder")]
    pub input_placeholder: String,
    /// Shown under the assistant name in the panel header.
    #[serde(default = "default_status_label")]
    pub status_label: String,
    /// Overrides the key-value file that holds the launcher position.
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
    #[serde(
        default = "default_theme_mode",
        serialize_with = "serialize_theme_mode",
        deserialize_with = "deserialize_theme_mode"
    )]
    pub theme_mode: ThemeMode,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_secs: default_request_timeout_secs(),
            assistant_name: default_assistant_name(),
            greeting: default_greeting(),
            apology: default_apology(),
            no_answer: default_no_answer(),
            input_placeholder: default_input_placeholder(),
            status_label: default_status_label(),
            storage_path: None,
            theme_mode: default_theme_mode(),
        }
    }
}

impl WidgetSettings {
    pub fn to_assistant_config(&self) -> AssistantConfig {
        let config = AssistantConfig::new(&self.endpoint);
        if self.request_timeout_secs == 0 {
            return config;
        }
        config.with_timeout(Duration::from_secs(self.request_timeout_secs))
    }

    pub fn phrases(&self) -> ChatPhrases {
        ChatPhrases {
            greeting: self.greeting.clone(),
            apology: self.apology.clone(),
            no_answer: self.no_answer.clone(),
        }
    }

    pub fn storage_path(&self) -> PathBuf {
        self.storage_path
            .clone()
            .unwrap_or_else(default_storage_path)
    }

    pub fn normalized(mut self) -> Self {
        self.endpoint = non_blank_or(self.endpoint, default_endpoint);
        self.assistant_name = non_blank_or(self.assistant_name, default_assistant_name);
        self.greeting = non_blank_or(self.greeting, default_greeting);
        self.apology = non_blank_or(self.apology, default_apology);
        self.no_answer = non_blank_or(self.no_answer, default_no_answer);
        self.storage_path = self
            .storage_path
            .filter(|path| !path.as_os_str().is_empty());
        self
    }

    pub fn apply_theme(&self, window: Option<&mut Window>, cx: &mut App) {
        Theme::change(self.theme_mode, window, cx);
    }
}

pub struct SettingsStore {
    settings: Arc<WidgetSettings>,
    config_path: PathBuf,
}

impl SettingsStore {
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|path| path.join(SETTINGS_DIRECTORY_NAME))
            .unwrap_or_else(|| PathBuf::from(".perch"))
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join(SETTINGS_FILE_NAME)
    }

    pub fn new(config_path: PathBuf) -> Self {
        let settings = Self::load_from(&config_path, Env::prefixed(ENV_PREFIX));
        Self {
            settings: Arc::new(settings),
            config_path,
        }
    }

    pub fn load() -> Self {
        Self::new(Self::default_config_path())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn settings(&self) -> Arc<WidgetSettings> {
        self.settings.clone()
    }

    /// Writes the current settings when no file exists yet, so there is
    /// something on disk to edit.
    pub fn write_defaults_if_missing(&self) -> Result<bool, SettingsError> {
        if self.config_path.exists() {
            return Ok(false);
        }
        self.persist(&self.settings)?;
        Ok(true)
    }

    fn load_from(path: &Path, env: Env) -> WidgetSettings {
        let mut figment = Figment::from(Serialized::defaults(WidgetSettings::default()));
        if path.exists() {
            figment = figment.merge(Json::file(path));
        } else {
            tracing::info!(path = %path.display(), "settings file not found, using defaults");
        }
        let figment = figment.merge(env);

        match figment.extract::<WidgetSettings>() {
            Ok(settings) => settings.normalized(),
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %error,
                    "failed to parse settings, using defaults"
                );
                WidgetSettings::default()
            }
        }
    }

    fn persist(&self, settings: &WidgetSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.config_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).context(CreateDirSnafu {
                stage: "create-settings-directory",
                path: parent.to_path_buf(),
            })?;
        }

        let content = serde_json::to_string_pretty(settings).context(SerializeConfigSnafu {
            stage: "serialize-settings-json",
        })?;

        let temp_path = self.config_path.with_extension("json.tmp");
        std::fs::write(&temp_path, content).context(WriteFileSnafu {
            stage: "write-temporary-settings-file",
            path: temp_path.clone(),
        })?;

        std::fs::rename(&temp_path, &self.config_path).context(RenameTempFileSnafu {
            stage: "rename-temporary-settings-file",
            from: temp_path,
            to: self.config_path.clone(),
        })?;

        tracing::info!(path = %self.config_path.display(), "saved settings");
        Ok(())
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SettingsError {
    #[snafu(display("failed to create settings directory at {path:?} on `{stage}`: {source}"))]
    CreateDir {
        stage: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("failed to serialize settings on `{stage}`: {source}"))]
    SerializeConfig {
        stage: &'static str,
        source: serde_json::Error,
    },
    #[snafu(display("failed to write settings file at {path:?} on `{stage}`: {source}"))]
    WriteFile {
        stage: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display(
        "failed to replace settings file from {from:?} to {to:?} on `{stage}`: {source}"
    ))]
    RenameTempFile {
        stage: &'static str,
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

pub fn default_storage_path() -> PathBuf {
    dirs::data_dir()
        .map(|path| path.join(SETTINGS_DIRECTORY_NAME))
        .unwrap_or_else(|| PathBuf::from(".perch"))
        .join(DEFAULT_STORE_FILE_NAME)
}

fn non_blank_or(value: String, fallback: fn() -> String) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback()
    } else {
        trimmed.to_string()
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_assistant_name() -> String {
    DEFAULT_ASSISTANT_NAME.to_string()
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

fn default_apology() -> String {
    DEFAULT_APOLOGY.to_string()
}

fn default_no_answer() -> String {
    DEFAULT_NO_ANSWER.to_string()
}

fn default_input_placeholder() -> String {
    DEFAULT_INPUT_PLACEHOLDER.to_string()
}

fn default_status_label() -> String {
    DEFAULT_STATUS_LABEL.to_string()
}

fn default_theme_mode() -> ThemeMode {
    ThemeMode::Light
}

fn serialize_theme_mode<S>(value: &ThemeMode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(value.name())
}

fn deserialize_theme_mode<'de, D>(deserializer: D) -> Result<ThemeMode, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(parse_theme_mode(&value))
}

fn parse_theme_mode(value: &str) -> ThemeMode {
    if value.trim().eq_ignore_ascii_case("dark") {
        ThemeMode::Dark
    } else {
        ThemeMode::Light
    }
}
