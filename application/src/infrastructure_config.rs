use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::EscalationSettings;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub db: DbConfig,
    pub logging: LoggingConfig,
    pub environment: EnvironmentConfig,
    pub moderation: ModerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationConfig {
    /// Master switch for the whole escalation pipeline. Toggled at runtime by
    /// deployers; read per call, never cached.
    pub ban_email_enabled: bool,
    pub escalation_address: String,
    pub from_address: String,
    pub max_threads_per_ban: Option<u64>,
    pub max_comments_per_ban: Option<u64>,
    pub max_item_errors_per_collection: u32,
    /// Bearer token required by the moderation HTTP endpoints.
    pub api_token: Option<String>,
    /// Directory scanned for escalation mail templates.
    pub templates_dir: String,
    pub email: EmailConfig,
    /// When present, escalations go through the templated messaging service
    /// instead of plain mail.
    pub message_service: Option<MessageServiceConfig>,
}

impl ModerationConfig {
    pub fn escalation_settings(&self) -> EscalationSettings {
        EscalationSettings {
            enabled: self.ban_email_enabled,
            escalation_address: self.escalation_address.clone(),
            from_address: self.from_address.clone(),
            max_threads_per_ban: self.max_threads_per_ban,
            max_comments_per_ban: self.max_comments_per_ban,
            max_item_errors_per_collection: self.max_item_errors_per_collection,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub email_backend: EmailBackend,
    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EmailBackend {
    #[serde(rename = "console")]
    Console,
    #[serde(rename = "smtp")]
    Smtp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_name: String,
    pub use_tls: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageServiceConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_url: SecretString,
    pub pool_size: u32,
    pub query_timeout_secs: u64,
}

impl Serialize for DbConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("DbConfig", 3)?;
        state.serialize_field("database_url", "[REDACTED]")?;
        state.serialize_field("pool_size", &self.pool_size)?;
        state.serialize_field("query_timeout_secs", &self.query_timeout_secs)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for DbConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct DbConfigHelper {
            database_url: String,
            pool_size: u32,
            query_timeout_secs: u64,
        }

        let helper = DbConfigHelper::deserialize(deserializer)?;
        Ok(DbConfig {
            database_url: SecretString::from(helper.database_url),
            pool_size: helper.pool_size,
            query_timeout_secs: helper.query_timeout_secs,
        })
    }
}

impl DbConfig {
    #[must_use]
    pub fn redacted_url(&self) -> String {
        let url_str = self.database_url.expose_secret();
        match url::Url::parse(url_str) {
            Ok(mut url) => {
                if url.password().is_some() {
                    url.set_password(Some("***")).ok();
                }
                url.to_string()
            }
            Err(_) => "[INVALID_URL]".to_string(),
        }
    }

    #[must_use]
    pub fn database_url(&self) -> &str {
        self.database_url.expose_secret()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub include_location: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogFormat {
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "pretty")]
    Pretty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub env: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            email_backend: EmailBackend::Console,
            smtp: SmtpConfig::default(),
        }
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 587,
            username: String::new(),
            password: String::new(),
            from_name: "Discussions Moderation".to_string(),
            use_tls: true,
        }
    }
}

impl Default for ModerationConfig {
    fn default() -> Self {
        let settings = EscalationSettings::default();
        Self {
            ban_email_enabled: settings.enabled,
            escalation_address: settings.escalation_address,
            from_address: settings.from_address,
            max_threads_per_ban: settings.max_threads_per_ban,
            max_comments_per_ban: settings.max_comments_per_ban,
            max_item_errors_per_collection: settings.max_item_errors_per_collection,
            api_token: None,
            templates_dir: "templates".to_string(),
            email: EmailConfig::default(),
            message_service: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                cors_origin: None,
            },
            db: DbConfig {
                database_url: SecretString::from("postgresql://localhost/forummod"),
                pool_size: 10,
                query_timeout_secs: 30,
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                include_location: false,
            },
            environment: EnvironmentConfig {
                env: "development".to_string(),
            },
            moderation: ModerationConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> AppResult<()> {
        if self.db.database_url.expose_secret().is_empty() {
            return Err(AppError::ConfigError {
                message: "database_url cannot be empty".to_string(),
            });
        }

        if self.db.pool_size == 0 {
            return Err(AppError::ConfigError {
                message: "db pool_size must be greater than 0".to_string(),
            });
        }

        if self.db.query_timeout_secs == 0 {
            return Err(AppError::ConfigError {
                message: "query_timeout_secs must be greater than 0".to_string(),
            });
        }

        if self.moderation.escalation_address.trim().is_empty() {
            return Err(AppError::ConfigError {
                message: "escalation_address cannot be empty".to_string(),
            });
        }

        if self.moderation.from_address.trim().is_empty() {
            return Err(AppError::ConfigError {
                message: "from_address cannot be empty".to_string(),
            });
        }

        if self.moderation.max_threads_per_ban == Some(0)
            || self.moderation.max_comments_per_ban == Some(0)
        {
            return Err(AppError::ConfigError {
                message: "purge caps must be greater than 0 when set".to_string(),
            });
        }

        if matches!(self.moderation.email.email_backend, EmailBackend::Smtp)
            && self.moderation.email.smtp.host.trim().is_empty()
        {
            return Err(AppError::ConfigError {
                message: "smtp host cannot be empty with the smtp backend".to_string(),
            });
        }

        if let Some(service) = &self.moderation.message_service {
            if service.base_url.trim().is_empty() {
                return Err(AppError::ConfigError {
                    message: "message_service base_url cannot be empty".to_string(),
                });
            }
            if service.timeout_secs == 0 {
                return Err(AppError::ConfigError {
                    message: "message_service timeout_secs must be greater than 0".to_string(),
                });
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn default_moderation_settings_match_spec_defaults() {
        let settings = ModerationConfig::default().escalation_settings();
        assert!(settings.enabled);
        assert_eq!(settings.escalation_address, "partner-support@edx.org");
        assert_eq!(settings.from_address, "no-reply@example.com");
        assert_eq!(settings.max_threads_per_ban, None);
        assert_eq!(settings.max_comments_per_ban, None);
        assert_eq!(settings.max_item_errors_per_collection, 5);
    }

    #[test]
    fn zero_purge_cap_is_rejected() {
        let config = Config {
            moderation: ModerationConfig {
                max_threads_per_ban: Some(0),
                ..ModerationConfig::default()
            },
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn database_password_is_redacted() {
        let db = DbConfig {
            database_url: SecretString::from("postgresql://user:hunter2@db/forummod"),
            pool_size: 10,
            query_timeout_secs: 30,
        };
        assert!(!db.redacted_url().contains("hunter2"));
    }
}
