//! Service configuration, read from environment variables (and `.env`).

use crate::error::ConfigError;
use crate::handlers::validation::doh::DEFAULT_DOH_ENDPOINT;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverBackend {
    /// JSON DNS-over-HTTPS
    Doh,
    /// Plain DNS via trust-dns' default upstreams
    System,
}

impl FromStr for ResolverBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "doh" => Ok(ResolverBackend::Doh),
            "system" => Ok(ResolverBackend::System),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store_backend: StoreBackend,
    /// Required when `store_backend` is `Mongo`.
    pub mongodb_uri: Option<String>,
    pub db_name: String,
    pub verifications_collection: String,
    /// Extra disposable domains, merged with the built-in list at startup.
    pub disposable_collection: Option<String>,
    pub jwt_secret: String,
    pub jwt_audience: Option<String>,
    pub resolver_backend: ResolverBackend,
    pub doh_endpoint: String,
    pub resolver_timeout: Duration,
    /// Upper bound on in-flight verifications per batch; unbounded if unset.
    pub verify_concurrency: Option<usize>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let store_backend = parse_or(&get, "STORE_BACKEND", StoreBackend::Mongo)?;
        let mongodb_uri = get("MONGODB_URI");
        if store_backend == StoreBackend::Mongo && mongodb_uri.is_none() {
            return Err(ConfigError::Missing("MONGODB_URI"));
        }

        let verify_concurrency = match get("VERIFY_CONCURRENCY") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "VERIFY_CONCURRENCY",
                        value: raw,
                    });
                }
            },
            None => None,
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&get, "PORT", 8080)?,
            store_backend,
            mongodb_uri,
            db_name: get("DB_NAME").unwrap_or_else(|| "email_verifier".to_string()),
            verifications_collection: get("DB_VERIFICATIONS_COLLECTION")
                .unwrap_or_else(|| "email_verifications".to_string()),
            disposable_collection: get("DB_DISPOSABLE_EMAILS_COLLECTION"),
            jwt_secret: get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?,
            jwt_audience: get("JWT_AUDIENCE"),
            resolver_backend: parse_or(&get, "RESOLVER_BACKEND", ResolverBackend::Doh)?,
            doh_endpoint: get("DOH_ENDPOINT").unwrap_or_else(|| DEFAULT_DOH_ENDPOINT.to_string()),
            resolver_timeout: Duration::from_secs(parse_or(&get, "RESOLVER_TIMEOUT_SECS", 5)?),
            verify_concurrency,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}
