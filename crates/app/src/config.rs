use std::time::Duration;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::Invalid {
                key: "LOG_FORMAT",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Client configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development against a
/// backend on `localhost:3000`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Backend origin (default: `http://localhost:3000`).
    pub api_url: String,
    /// Bearer token sent with every request, if any.
    pub api_token: Option<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long a fetched list stays fresh, in seconds (default: `300`).
    pub stale_time_secs: u64,
    /// Attempts for a throttled bulk create (default: `3`).
    pub bulk_create_max_attempts: u32,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000".into(),
            api_token: None,
            request_timeout_secs: 30,
            stale_time_secs: 300,
            bulk_create_max_attempts: 3,
            log_format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment, reading `.env`
    /// first when present.
    ///
    /// | Env Var                    | Default                 |
    /// |----------------------------|-------------------------|
    /// | `STOCKROOM_API_URL`        | `http://localhost:3000` |
    /// | `STOCKROOM_API_TOKEN`      | unset                   |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                    |
    /// | `STALE_TIME_SECS`          | `300`                   |
    /// | `BULK_CREATE_MAX_ATTEMPTS` | `3`                     |
    /// | `LOG_FORMAT`               | `pretty`                |
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("STOCKROOM_API_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.api_url);

        let api_token = lookup("STOCKROOM_API_TOKEN").filter(|v| !v.trim().is_empty());

        let request_timeout_secs =
            parse_or(&lookup, "REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?;
        let stale_time_secs = parse_or(&lookup, "STALE_TIME_SECS", defaults.stale_time_secs)?;
        let bulk_create_max_attempts = parse_or(
            &lookup,
            "BULK_CREATE_MAX_ATTEMPTS",
            defaults.bulk_create_max_attempts,
        )?;
        if bulk_create_max_attempts == 0 {
            return Err(ConfigError::Invalid {
                key: "BULK_CREATE_MAX_ATTEMPTS",
                value: "0".into(),
            });
        }

        let log_format = match lookup("LOG_FORMAT") {
            Some(v) => LogFormat::parse(&v)?,
            None => defaults.log_format,
        };

        Ok(Self {
            api_url,
            api_token,
            request_timeout_secs,
            stale_time_secs,
            bulk_create_max_attempts,
            log_format,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn stale_time(&self) -> Duration {
        Duration::from_secs(self.stale_time_secs)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
