//! Application configuration loaded from environment variables.

use std::env;

use diner_infra::{DatabaseConfig, MongoConfig, RateLimitConfig};

const DEFAULT_CORS_ORIGINS: &str = "https://digitaldiner-xi.netlify.app,http://localhost:5173";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Orders database. Orders are kept in memory when unset.
    pub database: Option<DatabaseConfig>,
    /// Menu document store. The catalog is kept in memory when unset.
    pub menu_store: Option<MongoConfig>,
    /// Shared limiter backend. Each instance counts on its own when unset.
    pub redis_url: Option<String>,
    pub rate_limit: RateLimitConfig,
    /// Key the limiter on `Forwarded` / `X-Forwarded-For`. Only safe behind
    /// a proxy that overwrites those headers.
    pub trust_proxy: bool,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            if let Some(max) = parse_var("DB_MAX_CONNECTIONS") {
                config.max_connections = max;
            }
            if let Some(min) = parse_var("DB_MIN_CONNECTIONS") {
                config.min_connections = min;
            }
            config
        });

        let menu_store = env::var("MONGODB_URI").ok().map(|uri| MongoConfig {
            uri,
            database: env::var("MONGODB_DATABASE")
                .unwrap_or_else(|_| MongoConfig::DEFAULT_DATABASE.to_string()),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(3000),
            database,
            menu_store,
            redis_url: env::var("REDIS_URL").ok(),
            rate_limit: RateLimitConfig::from_env(),
            trust_proxy: parse_var("RATE_LIMIT_TRUST_PROXY").unwrap_or(false),
            cors_origins: split_origins(
                &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string()),
            ),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_origins_skips_blanks() {
        assert_eq!(
            split_origins(" http://a.test , ,http://b.test"),
            vec!["http://a.test", "http://b.test"]
        );
        assert_eq!(split_origins(DEFAULT_CORS_ORIGINS).len(), 2);
    }
}
