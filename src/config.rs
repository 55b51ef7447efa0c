use std::env;
use std::time::Duration;

pub const DEFAULT_PROD_STRING: &str = "tester-777";

#[derive(Clone, Debug)]
pub struct Config {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub base_path: String,
    pub username: String,
    pub password: String,
    pub two_factor_code: Option<String>,
    pub session_duration_secs: i64,
    pub max_retries: u32,
    pub retry_delay_secs: u64,
    pub request_timeout_secs: u64,
    pub accept_invalid_certs: bool,
    pub prod_string: String,
    pub prod_refresh_secs: u64,
    pub metrics_port: Option<u16>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let host = required("BASE_URL")?;

        let port = required("PORT")?
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let base_path = required("BASE_PATH")?;
        let username = required("XUI_USERNAME")?;
        let password = required("XUI_PASSWORD")?;

        let two_factor_code = env::var("XUI_TWO_FACTOR_CODE")
            .ok()
            .filter(|code| !code.is_empty());

        let scheme = env::var("XUI_SCHEME").unwrap_or_else(|_| "https".to_string());

        let session_duration_secs = parsed("SESSION_DURATION_SECS", 3600)?;
        let max_retries = parsed("MAX_RETRIES", 5)?;
        let retry_delay_secs = parsed("RETRY_DELAY_SECS", 1)?;
        let request_timeout_secs = parsed("REQUEST_TIMEOUT_SECS", 30)?;
        let accept_invalid_certs = parsed("XUI_ACCEPT_INVALID_CERTS", false)?;

        let prod_string =
            env::var("PROD_STRING").unwrap_or_else(|_| DEFAULT_PROD_STRING.to_string());
        let prod_refresh_secs = parsed("PROD_REFRESH_SECS", 60 * 60 * 24)?;

        let metrics_port = match env::var("METRICS_PORT") {
            Ok(value) => Some(value.parse().map_err(|_| ConfigError::InvalidPort)?),
            Err(_) => None,
        };

        let config = Config {
            scheme,
            host,
            port,
            base_path,
            username,
            password,
            two_factor_code,
            session_duration_secs,
            max_retries,
            retry_delay_secs,
            request_timeout_secs,
            accept_invalid_certs,
            prod_string,
            prod_refresh_secs,
            metrics_port,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject tuning values the client cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_retries == 0 {
            return Err(ConfigError::InvalidValue("MAX_RETRIES"));
        }
        if self.prod_refresh_secs == 0 {
            return Err(ConfigError::InvalidValue("PROD_REFRESH_SECS"));
        }
        Ok(())
    }

    /// Config with default tuning for a known panel location.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        base_path: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            scheme: "https".to_string(),
            host: host.into(),
            port,
            base_path: base_path.into(),
            username: username.into(),
            password: password.into(),
            two_factor_code: None,
            session_duration_secs: 3600,
            max_retries: 5,
            retry_delay_secs: 1,
            request_timeout_secs: 30,
            accept_invalid_certs: false,
            prod_string: DEFAULT_PROD_STRING.to_string(),
            prod_refresh_secs: 60 * 60 * 24,
            metrics_port: None,
        }
    }

    /// `{scheme}://{host}:{port}{base_path}` without a trailing slash.
    pub fn base_url(&self) -> String {
        let path = self.base_path.trim_matches('/');
        if path.is_empty() {
            format!("{}://{}:{}", self.scheme, self.host, self.port)
        } else {
            format!("{}://{}:{}/{}", self.scheme, self.host, self.port, path)
        }
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    pub fn prod_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.prod_refresh_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

fn parsed<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name)),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    MissingVar(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid value for {0}")]
    InvalidValue(&'static str),
}
