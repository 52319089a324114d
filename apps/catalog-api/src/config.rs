use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig, storage::StorageConfig};

pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let storage = StorageConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            server,
            storage,
            environment,
        })
    }
}
