//! Application configuration structs
//!
//! Loads configuration from config files and `HUDDLE_`-prefixed environment
//! variables.

use serde::Deserialize;

use crate::error::AppError;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            env: default_env(),
        }
    }
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Session token configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_token_secret")]
    pub token_secret: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: default_token_secret(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "huddle".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_token_secret() -> String {
    // Development-only fallback; deployments set HUDDLE_AUTH__TOKEN_SECRET.
    "huddle-dev-secret".to_string()
}

impl AppConfig {
    /// Load configuration from `config/default`, `config/local`, and the
    /// environment (prefix `HUDDLE`, `__` as section separator).
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("HUDDLE").separator("__"))
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::Config(e.to_string()))
    }

    /// Configuration for tests: defaults with a fixed secret
    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            app: AppSettings {
                name: "huddle-test".to_string(),
                env: Environment::Development,
            },
            auth: AuthConfig {
                token_secret: "test-secret".to_string(),
            },
        }
    }
}
