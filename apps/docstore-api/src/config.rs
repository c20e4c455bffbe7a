use core_config::{AppInfo, FromEnv, app_info, env_first_of, server::ServerConfig};
use docstore::mongodb::MongoConfig;

pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    /// `None` when neither `MONGODB_URL` nor `MONGO_URL` is set
    pub mongodb: Option<MongoConfig>,
    pub server: ServerConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let mongodb = match env_first_of(&["MONGODB_URL", "MONGO_URL"]) {
            Ok(_) => Some(MongoConfig::from_env()?),
            Err(_) => None,
        };

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            environment,
        })
    }
}
