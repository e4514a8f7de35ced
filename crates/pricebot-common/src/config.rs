use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    pub database_url: String,
    #[serde(default)]
    pub run_migrations: bool,

    #[serde(default = "Config::default_otel_exporter_endpoint")]
    pub otel_exporter_endpoint: String,
    #[serde(default)]
    pub otel_exporter: OtelExporter,
    #[serde(default = "Config::default_otel_sample_rate")]
    pub otel_sample_rate: f64,

    #[serde(default = "Config::default_api_server")]
    pub api_server: String,
    pub bot_token: String,
    #[serde(default = "Config::default_drop_pending_updates")]
    pub drop_pending_updates: bool,
    #[serde(default = "Config::default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "Config::default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "Config::default_pool_idle_timeout_secs")]
    pub pool_idle_timeout_secs: u64,
    #[serde(default = "Config::default_polling_timeout_secs")]
    pub polling_timeout_secs: u32,

    #[serde(default = "Config::default_price_api_url")]
    pub price_api_url: String,
    #[serde(default = "Config::default_price_asset_id")]
    pub price_asset_id: String,
    #[serde(default = "Config::default_price_asset_name")]
    pub price_asset_name: String,
    #[serde(default = "Config::default_price_timeout_secs")]
    pub price_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OtelExporter {
    #[default]
    None,
    OtlpGrpc,
    OtlpHttp,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration from environment: {0}")]
    Env(#[from] envy::Error),
    #[error("Configuration value {0} must not be empty")]
    Empty(&'static str),
    #[error("REQUEST_TIMEOUT_SECS ({request}) must exceed POLLING_TIMEOUT_SECS ({polling})")]
    PollingTimeout { request: u64, polling: u32 },
}

impl Config {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Builds the config from an arbitrary set of `KEY=value` pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)?;

        if config.bot_token.trim().is_empty() {
            return Err(ConfigError::Empty("BOT_TOKEN"));
        }
        if config.database_url.trim().is_empty() {
            return Err(ConfigError::Empty("DATABASE_URL"));
        }
        // long polling requests stay open for the polling timeout
        if config.request_timeout_secs <= u64::from(config.polling_timeout_secs) {
            return Err(ConfigError::PollingTimeout {
                request: config.request_timeout_secs,
                polling: config.polling_timeout_secs,
            });
        }

        Ok(config)
    }

    fn default_otel_exporter_endpoint() -> String {
        "http://localhost:4317".into()
    }

    fn default_otel_sample_rate() -> f64 {
        1.0
    }

    fn default_api_server() -> String {
        "https://api.telegram.org".into()
    }

    fn default_drop_pending_updates() -> bool {
        true
    }

    fn default_connect_timeout_secs() -> u64 {
        5
    }

    fn default_request_timeout_secs() -> u64 {
        30
    }

    fn default_pool_idle_timeout_secs() -> u64 {
        90
    }

    fn default_polling_timeout_secs() -> u32 {
        10
    }

    fn default_price_api_url() -> String {
        "https://api.coingecko.com/api/v3".into()
    }

    fn default_price_asset_id() -> String {
        "bitcoin".into()
    }

    fn default_price_asset_name() -> String {
        "Bitcoin".into()
    }

    fn default_price_timeout_secs() -> u64 {
        10
    }
}
