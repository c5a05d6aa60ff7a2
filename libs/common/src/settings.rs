//! Layered configuration loading
//!
//! Every service reads its settings in the same order: compiled defaults set
//! by the caller, an optional `config/<service>.toml` file, then environment
//! variables such as `API__DATABASE__URL`.

use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `host:port` string suitable for `TcpListener::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builder pre-loaded with the file and environment sources of a service.
///
/// Defaults set on the returned builder with `set_default` keep the lowest
/// priority regardless of call order.
pub fn layered(service: &str, env_prefix: &str) -> ConfigBuilder<DefaultState> {
    Config::builder()
        .add_source(File::with_name(&format!("config/{service}")).required(false))
        .add_source(
            Environment::with_prefix(env_prefix)
                .separator("__")
                .try_parsing(true),
        )
}

/// Finish a layered builder into a typed settings struct
pub fn finish<T>(builder: ConfigBuilder<DefaultState>) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    builder.build()?.try_deserialize()
}
