//! Application configuration
//!
//! Loaded from a TOML file (default `~/.config/tablerez/config.toml`).
//! A missing file means defaults; notification credentials may also come
//! from the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::booking::PresenceSettings;
use crate::application::notifications::{SendGridConfig, TwilioConfig};
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::database::DatabaseConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// `~/.config/tablerez/config.toml`, or `./config.toml` without a home dir.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|d| d.join("tablerez").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
    pub admin: AdminConfig,
    pub booking: BookingConfig,
    pub notifications: NotificationsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight work on shutdown
    pub shutdown_timeout: u64,
    /// Allowed CORS origins; empty allows any
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// Full connection URL; wins over `path` when set
    pub url: Option<String>,
    /// SQLite file path
    pub path: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: None,
            path: "./tablerez.db".to_string(),
            max_connections: 10,
        }
    }
}

impl DatabaseSection {
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!("sqlite://{}?mode=rwc", self.path),
        }
    }

    pub fn to_database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.connection_url(),
            max_connections: self.max_connections,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub bcrypt_cost: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_hours: 24,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl SecurityConfig {
    pub fn jwt(&self) -> JwtConfig {
        JwtConfig {
            secret: self.jwt_secret.clone(),
            expiration_hours: self.jwt_expiration_hours,
            ..JwtConfig::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `plain` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "plain".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            email: "admin@tablerez.local".to_string(),
            password: "admin123".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    pub presence_ttl_secs: u64,
    pub presence_refresh_secs: u64,
    pub presence_poll_secs: u64,
    pub presence_sweep_secs: u64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            presence_ttl_secs: 120,
            presence_refresh_secs: 30,
            presence_poll_secs: 2,
            presence_sweep_secs: 60,
        }
    }
}

impl BookingConfig {
    pub fn presence_settings(&self) -> PresenceSettings {
        PresenceSettings {
            ttl: Duration::from_secs(self.presence_ttl_secs),
            refresh_interval: Duration::from_secs(self.presence_refresh_secs),
            poll_interval: Duration::from_secs(self.presence_poll_secs),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    pub enabled: bool,
    pub email: EmailConfig,
    pub sms: SmsConfig,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            email: EmailConfig::default(),
            sms: SmsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub sendgrid_api_key: Option<String>,
    pub from_email: String,
    pub from_name: String,
    pub api_url: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        let sg = SendGridConfig::default();
        Self {
            sendgrid_api_key: None,
            from_email: sg.from_email,
            from_name: sg.from_name,
            api_url: sg.base_url,
        }
    }
}

impl EmailConfig {
    pub fn sendgrid(&self) -> SendGridConfig {
        SendGridConfig {
            api_key: self.sendgrid_api_key.clone(),
            from_email: self.from_email.clone(),
            from_name: self.from_name.clone(),
            base_url: self.api_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmsConfig {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub from_number: Option<String>,
    pub api_url: String,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            account_sid: None,
            auth_token: None,
            from_number: None,
            api_url: TwilioConfig::default().base_url,
        }
    }
}

impl SmsConfig {
    pub fn twilio(&self) -> TwilioConfig {
        TwilioConfig {
            account_sid: self.account_sid.clone(),
            auth_token: self.auth_token.clone(),
            from_number: self.from_number.clone(),
            base_url: self.api_url.clone(),
        }
    }
}

impl AppConfig {
    /// Read `path`, falling back to defaults when it does not exist, then
    /// fill missing credentials from the process environment.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_toml(&raw)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Credentials already present in the file take precedence.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        fn fill(slot: &mut Option<String>, value: Option<String>) {
            if slot.as_deref().map_or(true, str::is_empty) {
                if let Some(v) = value.filter(|v| !v.is_empty()) {
                    *slot = Some(v);
                }
            }
        }

        let email = &mut self.notifications.email;
        fill(&mut email.sendgrid_api_key, lookup("SENDGRID_API_KEY"));

        let sms = &mut self.notifications.sms;
        fill(&mut sms.account_sid, lookup("TWILIO_ACCOUNT_SID"));
        fill(&mut sms.auth_token, lookup("TWILIO_AUTH_TOKEN"));
        fill(&mut sms.from_number, lookup("TWILIO_PHONE_NUMBER"));
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.booking;
        if b.presence_ttl_secs == 0 || b.presence_poll_secs == 0 || b.presence_sweep_secs == 0 {
            return Err(ConfigError::Invalid(
                "booking intervals must be positive".into(),
            ));
        }
        if b.presence_refresh_secs == 0 || b.presence_refresh_secs >= b.presence_ttl_secs {
            return Err(ConfigError::Invalid(format!(
                "presence_refresh_secs ({}) must be positive and below presence_ttl_secs ({})",
                b.presence_refresh_secs, b.presence_ttl_secs
            )));
        }
        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::Invalid("security.jwt_secret is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.booking.presence_ttl_secs, 120);
        assert_eq!(config.booking.presence_refresh_secs, 30);
        assert_eq!(config.booking.presence_poll_secs, 2);
        assert_eq!(config.database.connection_url(), "sqlite://./tablerez.db?mode=rwc");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            port = 9090

            [database]
            url = "sqlite::memory:"

            [logging]
            format = "json"

            [notifications.sms]
            account_sid = "AC1"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.connection_url(), "sqlite::memory:");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.notifications.sms.account_sid.as_deref(), Some("AC1"));
        assert!(config.notifications.enabled);
    }

    #[test]
    fn env_fills_only_missing_credentials() {
        let mut config = AppConfig::from_toml(
            r#"
            [notifications.email]
            sendgrid_api_key = "from-file"
            "#,
        )
        .unwrap();

        config.apply_env(|key| match key {
            "SENDGRID_API_KEY" => Some("from-env".into()),
            "TWILIO_ACCOUNT_SID" => Some("AC9".into()),
            "TWILIO_AUTH_TOKEN" => Some(String::new()),
            _ => None,
        });

        assert_eq!(config.notifications.email.sendgrid_api_key.as_deref(), Some("from-file"));
        assert_eq!(config.notifications.sms.account_sid.as_deref(), Some("AC9"));
        assert_eq!(config.notifications.sms.auth_token, None);
        assert_eq!(config.notifications.sms.from_number, None);
    }

    #[test]
    fn refresh_must_be_shorter_than_ttl() {
        let mut config = AppConfig::default();
        config.booking.presence_refresh_secs = 120;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let path = std::env::temp_dir().join("tablerez-does-not-exist").join("config.toml");
        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.server.port, 8080);
    }
}
