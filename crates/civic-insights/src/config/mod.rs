use crate::analytics::ScoringConfig;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Runtime stage the service is deployed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration, assembled from the environment. `CIVIC_*`
/// variables win over `.env` entries loaded through dotenvy.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment =
            AppEnvironment::parse(&env::var("CIVIC_ENV").unwrap_or_else(|_| "development".into()));

        let server = ServerConfig {
            host: env::var("CIVIC_HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: match env::var("CIVIC_PORT") {
                Ok(raw) => raw
                    .trim()
                    .parse::<u16>()
                    .map_err(|_| ConfigError::InvalidPort { value: raw })?,
                Err(_) => 8080,
            },
        };

        let telemetry = TelemetryConfig {
            log_level: env::var("CIVIC_LOG").unwrap_or_else(|_| "info".into()),
        };

        Ok(Self {
            environment,
            server,
            telemetry,
            scoring: load_scoring_overrides()?,
        })
    }
}

/// Start from the production scoring defaults and apply the handful of knobs
/// operators actually turn per deployment.
fn load_scoring_overrides() -> Result<ScoringConfig, ConfigError> {
    let mut scoring = ScoringConfig::default();

    if let Ok(raw) = env::var("CIVIC_WARD_COUNT") {
        scoring.ward_count = parse_override("CIVIC_WARD_COUNT", &raw)?;
    }
    if let Ok(raw) = env::var("CIVIC_STALE_AFTER_DAYS") {
        scoring.stale_after_days = parse_override("CIVIC_STALE_AFTER_DAYS", &raw)?;
    }

    Ok(scoring)
}

fn parse_override<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidOverride {
        key,
        value: raw.to_string(),
    })
}

/// Bind address for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::from([127, 0, 0, 1])
        } else {
            self.host
                .parse()
                .map_err(|source| ConfigError::InvalidHost { source })?
        };

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Log filtering controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort { value: String },
    InvalidHost { source: std::net::AddrParseError },
    InvalidOverride { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort { value } => {
                write!(f, "CIVIC_PORT '{value}' is not a valid port number")
            }
            ConfigError::InvalidHost { .. } => {
                write!(f, "CIVIC_HOST must be 'localhost' or an IP address")
            }
            ConfigError::InvalidOverride { key, value } => {
                write!(f, "{key} '{value}' could not be parsed")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn clear_civic_env() {
        for key in [
            "CIVIC_ENV",
            "CIVIC_HOST",
            "CIVIC_PORT",
            "CIVIC_LOG",
            "CIVIC_WARD_COUNT",
            "CIVIC_STALE_AFTER_DAYS",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn defaults_apply_without_environment() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        clear_civic_env();

        let config = AppConfig::load().expect("defaults load");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.scoring, ScoringConfig::default());
    }

    #[test]
    fn scoring_overrides_are_read_from_the_environment() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        clear_civic_env();
        env::set_var("CIVIC_WARD_COUNT", "44");

        let config = AppConfig::load().expect("config loads");
        clear_civic_env();
        assert_eq!(config.scoring.ward_count, 44);
    }

    #[test]
    fn malformed_override_is_rejected_with_its_key() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        clear_civic_env();
        env::set_var("CIVIC_STALE_AFTER_DAYS", "soon");

        let result = AppConfig::load();
        clear_civic_env();
        match result {
            Err(ConfigError::InvalidOverride { key, value }) => {
                assert_eq!(key, "CIVIC_STALE_AFTER_DAYS");
                assert_eq!(value, "soon");
            }
            other => panic!("expected override error, got {other:?}"),
        }
    }

    #[test]
    fn localhost_resolves_to_loopback() {
        let server = ServerConfig {
            host: "localhost".into(),
            port: 9000,
        };
        let addr = server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 9000));
    }
}
