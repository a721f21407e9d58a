//! Environment-based configuration with development defaults. A `.env` file
//! is honored when present (loaded in `main`).

use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub jwt_secret: String,
    pub token_expiry_hours: i64,
    pub admin_username: String,
    pub admin_password: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://autoshop.db?mode=rwc".to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
            jwt_secret: "change-me-on-first-run".to_string(),
            token_expiry_hours: 24,
            admin_username: "admin".to_string(),
            admin_password: "admin".to_string(),
        }
    }
}

impl Config {
    /// Read configuration from the environment, falling back to defaults for
    /// anything unset. An unparsable `TOKEN_EXPIRY_HOURS` is warned about and
    /// ignored rather than aborting startup.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            jwt_secret: env::var("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            token_expiry_hours: env::var("TOKEN_EXPIRY_HOURS")
                .ok()
                .and_then(|raw| match raw.parse() {
                    Ok(hours) => Some(hours),
                    Err(e) => {
                        tracing::warn!(value = %raw, error = %e, "invalid TOKEN_EXPIRY_HOURS, using default");
                        None
                    }
                })
                .unwrap_or(defaults.token_expiry_hours),
            admin_username: env::var("ADMIN_USERNAME").unwrap_or(defaults.admin_username),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
        }
    }
}
