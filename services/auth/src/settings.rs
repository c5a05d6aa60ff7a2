//! Authentication service configuration

use common::{database::DatabaseConfig, jwt::JwtConfig, settings::ServerConfig};
use config::ConfigError;
use serde::Deserialize;

use crate::rate_limiter::RateLimiterConfig;

/// Settings read from `config/auth.toml` and `AUTH__*` variables
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub rate_limit: RateLimiterConfig,
}

impl AuthSettings {
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = RateLimiterConfig::default();
        let builder = common::settings::layered("auth", "AUTH")
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("rate_limit.max_attempts", defaults.max_attempts)?
            .set_default("rate_limit.window_seconds", defaults.window_seconds)?
            .set_default(
                "rate_limit.ban_duration_seconds",
                defaults.ban_duration_seconds,
            )?;
        common::settings::finish(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn loads_from_environment_with_defaults() {
        unsafe {
            std::env::set_var("AUTH__DATABASE__URL", "postgresql://localhost/menus");
            std::env::set_var("AUTH__JWT__SECRET", "s3cret");
        }

        let settings = AuthSettings::load().unwrap();
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.database.url, "postgresql://localhost/menus");
        assert_eq!(settings.jwt.secret, "s3cret");
        assert_eq!(settings.rate_limit.max_attempts, 5);

        unsafe {
            std::env::remove_var("AUTH__DATABASE__URL");
            std::env::remove_var("AUTH__JWT__SECRET");
        }
    }
}
