use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub supabase: SupabaseSettings,
    pub stripe: StripeSettings,
    #[serde(default)]
    pub admin: AdminSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseSettings {
    pub url: String,
    pub service_role_key: String,
    pub jwt_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeSettings {
    #[serde(default = "default_stripe_api_base")]
    pub api_base: String,
    pub secret_key: String,
    pub webhook_secret: String,
    pub monthly_price_id: String,
    pub site_url: String,
}

fn default_stripe_api_base() -> String {
    "https://api.stripe.com".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminSettings {
    /// Comma-separated list of admin email addresses
    #[serde(default)]
    pub emails: String,
}

impl AdminSettings {
    pub fn email_list(&self) -> Vec<String> {
        self.emails
            .split(',')
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with AMORA_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with AMORA_)
            // e.g., AMORA_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("AMORA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Substitute well-known bare environment variables for secrets
        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("AMORA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply bare environment variables (the names the hosting platform sets)
/// over the layered configuration
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("supabase.url", env::var("SUPABASE_URL").ok()),
        (
            "supabase.service_role_key",
            env::var("SUPABASE_SERVICE_ROLE_KEY").ok(),
        ),
        ("supabase.jwt_secret", env::var("SUPABASE_JWT_SECRET").ok()),
        ("stripe.secret_key", env::var("STRIPE_SECRET_KEY").ok()),
        (
            "stripe.webhook_secret",
            env::var("STRIPE_WEBHOOK_SECRET").ok(),
        ),
        (
            "stripe.monthly_price_id",
            env::var("STRIPE_MONTHLY_PRICE_ID").ok(),
        ),
        ("stripe.site_url", env::var("SITE_URL").ok()),
        ("admin.emails", env::var("ADMIN_EMAILS").ok()),
    ];

    let mut builder = Config::builder().add_source(settings);
    for (key, value) in overrides {
        if let Some(value) = value {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_email_list_parsing() {
        let admin = AdminSettings {
            emails: "a@example.com, b@example.com ,,".to_string(),
        };
        assert_eq!(
            admin.email_list(),
            vec!["a@example.com".to_string(), "b@example.com".to_string()]
        );
    }

    #[test]
    fn test_admin_email_list_empty() {
        let admin = AdminSettings::default();
        assert!(admin.email_list().is_empty());
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }

    #[test]
    fn test_default_stripe_api_base() {
        assert_eq!(default_stripe_api_base(), "https://api.stripe.com");
    }
}
