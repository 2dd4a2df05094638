use anyhow::{Context, Result, bail};
use std::env;
use std::str::FromStr;

/// Minimum accepted length of `JWT_SECRET`, in bytes.
pub const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub server_addr: String,
    /// Token validity window in seconds.
    pub access_token_ttl: i64,

    // Argon2 work factor
    pub hash_memory_kib: u32,
    pub hash_iterations: u32,
    pub hash_parallelism: u32,

    pub username_cache_capacity: u64,

    // Rate limiting
    pub rate_signin_per_min: u32,
    pub rate_signup_per_min: u32,
    pub rate_reset_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    pub log_dir: String,
    pub log_level: tracing::Level,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 10)?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            access_token_ttl: env_or("ACCESS_TOKEN_TTL", 3600)?, // 1 hour

            hash_memory_kib: env_or("PASSWORD_HASH_MEMORY_KIB", argon2::Params::DEFAULT_M_COST)?,
            hash_iterations: env_or("PASSWORD_HASH_ITERATIONS", argon2::Params::DEFAULT_T_COST)?,
            hash_parallelism: env_or("PASSWORD_HASH_PARALLELISM", argon2::Params::DEFAULT_P_COST)?,

            username_cache_capacity: env_or("USERNAME_CACHE_CAPACITY", 100_000)?,

            rate_signin_per_min: env_or("RATE_SIGNIN_PER_MIN", 60)?,
            rate_signup_per_min: env_or("RATE_SIGNUP_PER_MIN", 30)?,
            rate_reset_per_min: env_or("RATE_RESET_PER_MIN", 10)?,
            rate_protected_per_min: env_or("RATE_PROTECTED_PER_MIN", 1000)?,

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            log_level: env_or("LOG_LEVEL", tracing::Level::INFO)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            bail!("JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} bytes long");
        }
        if self.access_token_ttl <= 0 {
            bail!("ACCESS_TOKEN_TTL must be a positive number of seconds");
        }
        if !self.api_prefix.starts_with('/') {
            bail!("API_PREFIX must start with '/'");
        }
        Ok(())
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => parse_var(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{key} has an invalid value {raw:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            database_url: "sqlite::memory:".into(),
            db_max_connections: 1,
            jwt_secret: "x".repeat(MIN_JWT_SECRET_LEN),
            server_addr: "127.0.0.1:0".into(),
            access_token_ttl: 60,
            hash_memory_kib: 1024,
            hash_iterations: 1,
            hash_parallelism: 1,
            username_cache_capacity: 16,
            rate_signin_per_min: 60,
            rate_signup_per_min: 60,
            rate_reset_per_min: 60,
            rate_protected_per_min: 60,
            api_prefix: "/api".into(),
            log_dir: "logs".into(),
            log_level: tracing::Level::INFO,
        }
    }

    #[test]
    fn parse_var_names_the_variable_on_failure() {
        let err = parse_var::<u32>("RATE_SIGNIN_PER_MIN", "lots").unwrap_err();
        assert!(err.to_string().contains("RATE_SIGNIN_PER_MIN"));
        assert_eq!(parse_var::<u32>("X", " 42 ").unwrap(), 42);
        assert_eq!(parse_var::<tracing::Level>("LOG_LEVEL", "debug").unwrap(), tracing::Level::DEBUG);
    }

    #[test]
    fn short_secrets_are_rejected() {
        let mut config = sample();
        assert!(config.validate().is_ok());

        config.jwt_secret = "too-short".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn ttl_must_be_positive() {
        let mut config = sample();
        config.access_token_ttl = 0;
        assert!(config.validate().is_err());
    }
}
