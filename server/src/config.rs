use std::{net::SocketAddr, time::Duration};

use clap::{Parser, ValueEnum};
use database::PoolSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Song library HTTP service.
///
/// Every option can also come from the environment or a `.env` file.
#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Config {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Base url of the song info service
    #[arg(long, env = "EXTERNAL_API_URL")]
    pub external_api_url: String,

    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    #[arg(long, env = "LOOKUP_TIMEOUT_SECS", default_value_t = 10)]
    pub lookup_timeout_secs: u64,

    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 10)]
    pub db_max_connections: u32,

    /// Used both for acquiring a connection and as the statement timeout
    #[arg(long, env = "DB_TIMEOUT_SECS", default_value_t = 5)]
    pub db_timeout_secs: u64,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn load() -> Self {
        // a missing .env is fine, the values may already be in the environment
        let _ = dotenvy::dotenv();
        Self::parse()
    }

    pub fn pool_settings(&self) -> PoolSettings {
        let timeout = Duration::from_secs(self.db_timeout_secs);
        PoolSettings {
            max_connections: self.db_max_connections,
            acquire_timeout: timeout,
            statement_timeout: timeout,
        }
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from([
            "song-library",
            "--database-url",
            "postgres://localhost/songs",
            "--external-api-url",
            "http://localhost:9000",
        ])
        .unwrap();

        assert_eq!(config.bind, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.lookup_timeout(), Duration::from_secs(10));
        assert_eq!(config.pool_settings().max_connections, 10);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn json_logs() {
        let config = Config::try_parse_from([
            "song-library",
            "--database-url",
            "postgres://localhost/songs",
            "--external-api-url",
            "http://localhost:9000",
            "--log-format",
            "json",
            "--db-timeout-secs",
            "2",
        ])
        .unwrap();

        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(
            config.pool_settings().statement_timeout,
            Duration::from_secs(2)
        );
    }
}
