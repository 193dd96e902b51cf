use anyhow::Context;
use serde::Deserialize;

/// Argon2 cost parameters for password hashing.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordConfig {
    pub m_cost: u32, // memory, KiB
    pub t_cost: u32, // iterations
    pub p_cost: u32, // lanes
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            m_cost: argon2::Params::DEFAULT_M_COST,
            t_cost: argon2::Params::DEFAULT_T_COST,
            p_cost: argon2::Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub password: PasswordConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL not set")?;
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT")
            .or_else(|_| std::env::var("PORT"))
            .unwrap_or_else(|_| "8080".into())
            .parse::<u16>()
            .context("APP_PORT must be a port number")?;

        let defaults = PasswordConfig::default();
        let password = PasswordConfig {
            m_cost: env_or("PASSWORD_M_COST", defaults.m_cost)?,
            t_cost: env_or("PASSWORD_T_COST", defaults.t_cost)?,
            p_cost: env_or("PASSWORD_P_COST", defaults.p_cost)?,
        };

        Ok(Self {
            database_url,
            host,
            port,
            max_connections: env_or("DB_MAX_CONNECTIONS", 10)?,
            password,
        })
    }
}

fn env_or(key: &str, default: u32) -> anyhow::Result<u32> {
    match std::env::var(key) {
        Ok(v) => v
            .parse::<u32>()
            .with_context(|| format!("{key} must be an unsigned integer, got {v:?}")),
        Err(_) => Ok(default),
    }
}
