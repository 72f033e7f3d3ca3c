use std::{env, time};

use config::{Config, ConfigError, Environment, File};
use url::Url;

use crate::rate_limiter::RateLimiter;

/// Settings
#[derive(Clone, serde::Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
    pub cors: CorsSettings,
}

impl Settings {
    /// Get settings from configuration files
    pub fn get_config() -> Result<Self, ConfigError> {
        let path = env::current_dir().map_err(|e| {
            ConfigError::Message(format!("Failed to determine the current directory: {e}"))
        })?;
        let config_dir = path.join("config");

        // Detect the running environment (default: `dev`)
        let env: Env = env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "dev".into())
            .try_into()
            .map_err(ConfigError::Message)?;
        let env_file = format!("{}.yaml", env.as_str());

        // Read the configuration from files and environment variables
        Config::builder()
            // Base configuration file
            .add_source(File::from(config_dir.join("base.yaml")).required(true))
            // Environment-specific configuration file
            .add_source(File::from(config_dir.join(env_file)).required(true))
            // Environment variables (e.g., `PULSENOVA__RATE_LIMIT__MAX_REQUESTS=10`
            // would set Settings.rate_limit.max_requests to 10)
            .add_source(
                Environment::with_prefix("PULSENOVA")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

/// Application settings
#[derive(Clone, serde::Deserialize)]
pub struct ApplicationSettings {
    pub app_host: String,
    pub app_port: u16,
}

/// Rate limiter settings
#[derive(Clone, serde::Deserialize)]
pub struct RateLimitSettings {
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    #[serde(default = "default_max_requests")]
    pub max_requests: usize,
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

const fn default_window_secs() -> u64 {
    60
}

const fn default_max_requests() -> usize {
    5
}

const fn default_sweep_interval_secs() -> u64 {
    300
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            max_requests: default_max_requests(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl RateLimitSettings {
    /// Build the rate limiter
    pub fn limiter(&self) -> RateLimiter {
        RateLimiter::new(self.window(), self.max_requests)
    }

    /// Get configured sliding window
    pub const fn window(&self) -> time::Duration {
        time::Duration::from_secs(self.window_secs)
    }

    /// Get configured interval between stale key sweeps (zero disables sweeping)
    pub const fn sweep_interval(&self) -> time::Duration {
        time::Duration::from_secs(self.sweep_interval_secs)
    }
}

/// CORS settings
#[derive(Clone, serde::Deserialize)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
}

impl CorsSettings {
    /// Parse allowed origins, rejecting anything that is not an absolute URL
    pub fn origins(&self) -> anyhow::Result<Vec<String>> {
        self.allowed_origins
            .iter()
            .map(|origin| {
                let url = Url::parse(origin)
                    .map_err(|e| anyhow::anyhow!("`{origin}` is not a valid CORS origin: {e}"))?;
                if url.host_str().is_none() {
                    anyhow::bail!("`{origin}` is not a valid CORS origin: missing host");
                }
                if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
                    anyhow::bail!(
                        "`{origin}` is not a valid CORS origin: only scheme, host and port are allowed"
                    );
                }
                Ok(origin.trim_end_matches('/').to_owned())
            })
            .collect()
    }
}

/// Available runtime environments
#[derive(Debug)]
pub enum Env {
    Development,
    Production,
}

impl Env {
    /// Represent environment as a string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "dev",
            Self::Production => "prd",
        }
    }
}

impl TryFrom<String> for Env {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "dev" => Ok(Self::Development),
            "prd" => Ok(Self::Production),
            other => Err(format!(
                "`{other}` is not a supported environment. Use either `dev` or `prd`"
            )),
        }
    }
}
