//! Shared application state passed to request handlers.

use docstore::mongodb::Database;
use std::time::Duration;

/// Upper bound on the `/ready` ping, whatever the connect timeout
const READINESS_TIMEOUT: Duration = Duration::from_secs(2);

/// Cloned into every handler; `Database` is a cheap handle onto the pool.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// Present when MongoDB is configured. The owning connection stays in
    /// `main` so it can be closed on shutdown.
    pub db: Option<Database>,
}

impl AppState {
    pub fn new(config: crate::config::Config, db: Option<Database>) -> Self {
        Self { config, db }
    }

    /// Bound on the readiness ping: the connect timeout, capped at two seconds
    pub fn probe_timeout(&self) -> Duration {
        self.config
            .mongodb
            .as_ref()
            .map(|mongodb| mongodb.connect_timeout().min(READINESS_TIMEOUT))
            .unwrap_or(READINESS_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment};
    use core_config::{app_info, server::ServerConfig};
    use docstore::mongodb::MongoConfig;

    fn state_with(mongodb: Option<MongoConfig>) -> AppState {
        let config = Config {
            app: app_info!(),
            mongodb,
            server: ServerConfig::default(),
            environment: Environment::Development,
        };
        AppState::new(config, None)
    }

    #[test]
    fn test_readiness_timeout_is_capped() {
        // Default connect timeout is 10s.
        let state = state_with(Some(MongoConfig::new("mongodb://db:27017")));
        assert_eq!(state.probe_timeout(), READINESS_TIMEOUT);
    }

    #[test]
    fn test_readiness_timeout_follows_shorter_connect_timeout() {
        let mut mongodb = MongoConfig::new("mongodb://db:27017");
        mongodb.connect_timeout_secs = 1;
        assert_eq!(state_with(Some(mongodb)).probe_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_readiness_timeout_without_mongo() {
        assert_eq!(state_with(None).probe_timeout(), READINESS_TIMEOUT);
    }
}
