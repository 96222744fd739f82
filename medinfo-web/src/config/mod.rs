use secrecy::Secret;
use serde::Deserialize;
use service_core::error::AppError;
use std::time::Duration;

/// Directory name of this service inside the workspace.
pub const SERVICE_NAME: &str = "medinfo-web";

/// Environment variable holding the completion API key.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub chat: ChatSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Signs the session cookie.
    pub session_secret: Secret<String>,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Mark the session cookie `Secure` (HTTPS deployments).
    #[serde(default)]
    pub secure_cookies: bool,
}

fn default_static_dir() -> String {
    "medinfo-web/static".to_string()
}

#[derive(Deserialize, Clone)]
pub struct ChatSettings {
    pub api_url: String,
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub api_key: Option<Secret<String>>,
    /// Cap on the chat request body. Unlimited when unset.
    #[serde(default)]
    pub max_upload_bytes: Option<usize>,
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_timeout_secs() -> u64 {
    30
}

impl ChatSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Deserialize, Clone)]
pub struct TelemetrySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

pub fn get_configuration() -> Result<Settings, AppError> {
    let mut settings: Settings = service_core::config::load_layered(SERVICE_NAME)?;

    if settings.chat.api_key.is_none() {
        settings.chat.api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .map(Secret::new);
    }

    Ok(settings)
}
