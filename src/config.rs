use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub jwt_secret: String,
    pub database_url: Option<String>,
    pub snapshot_path: String,
    pub snapshot_key: String,
    pub openai_api_key: Option<String>,
    pub ai_model: String,
    pub demo_username: String,
    pub demo_password: String,
    pub token_ttl_hours: i64,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            jwt_secret: get_env("JWT_SECRET")?,
            database_url: get_env_opt("DATABASE_URL"),
            snapshot_path: get_env_opt("SNAPSHOT_PATH")
                .unwrap_or_else(|| "./data/recruitment_hub_db_v1.json".to_string()),
            snapshot_key: get_env_opt("SNAPSHOT_KEY")
                .unwrap_or_else(|| "recruitment_hub_db_v1".to_string()),
            openai_api_key: get_env_opt("OPENAI_API_KEY"),
            ai_model: get_env_opt("AI_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
            demo_username: get_env_opt("DEMO_USERNAME").unwrap_or_else(|| "admin".to_string()),
            demo_password: get_env_opt("DEMO_PASSWORD")
                .unwrap_or_else(|| "password".to_string()),
            token_ttl_hours: match get_env_opt("TOKEN_TTL_HOURS") {
                Some(_) => get_env_parse("TOKEN_TTL_HOURS")?,
                None => 12,
            },
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

/// Unset and blank values are treated alike.
fn get_env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_parse<T>(name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(name)?;
    raw.parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
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
