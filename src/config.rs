use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::sync::OnceLock;

/// Process settings, read once from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub api_rps: u32,
    pub public_rps: u32,
    pub uploads_dir: String,
    pub max_upload_mb: usize,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let config = Self {
            server_address: required("SERVER_ADDRESS")?,
            database_url: required("DATABASE_URL")?,
            db_max_connections: parsed_or("DB_MAX_CONNECTIONS", 50)?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_ttl_hours: parsed_or("JWT_TTL_HOURS", 24)?,
            api_rps: parsed("API_RPS")?,
            public_rps: parsed("PUBLIC_RPS")?,
            uploads_dir: env::var("UPLOADS_DIR").unwrap_or_else(|_| "./uploads".to_string()),
            max_upload_mb: parsed_or("MAX_UPLOAD_MB", 10)?,
        };
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        if self.jwt_ttl_hours <= 0 {
            return Err(Error::Config("JWT_TTL_HOURS must be positive".into()));
        }
        if self.max_upload_mb == 0 {
            return Err(Error::Config("MAX_UPLOAD_MB must be at least 1".into()));
        }
        if self.jwt_secret.len() < 16 {
            tracing::warn!("JWT_SECRET is shorter than 16 bytes");
        }
        Ok(())
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn parse_value<T>(name: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}

fn parsed<T>(name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(name, &required(name)?)
}

fn parsed_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => parse_value(name, &raw),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_trimmed_before_parsing() {
        assert_eq!(parse_value::<u32>("API_RPS", " 25 ").unwrap(), 25);
    }

    #[test]
    fn bad_values_name_the_variable() {
        let err = parse_value::<u32>("PUBLIC_RPS", "fast").unwrap_err();
        assert!(err.to_string().contains("PUBLIC_RPS"));
    }
}
