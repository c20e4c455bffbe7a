use mongodb::{Client, Collection, Database, options::ClientOptions};
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

use super::health::{self, HealthStatus};
use super::{MongoConfig, MongoError};

/// Owns a MongoDB client and the database handle derived from it.
///
/// Created by [`MongoConnection::connect`] and released by
/// [`MongoConnection::close`]. There is no automatic reconnection; the
/// driver's pool handles transient socket churn underneath.
///
/// # Example
/// ```ignore
/// use docstore::mongodb::MongoConnection;
/// use std::time::Duration;
///
/// let conn = MongoConnection::connect("mongodb://localhost:27017", "mydb", Duration::from_secs(10)).await?;
/// if !conn.initial_probe().healthy {
///     tracing::warn!("database did not answer the first ping");
/// }
/// conn.close(Duration::from_secs(5)).await?;
/// ```
#[derive(Debug)]
pub struct MongoConnection {
    client: Client,
    database: Database,
    probe_timeout: Duration,
    initial_probe: HealthStatus,
}

impl MongoConnection {
    /// Connect to `uri` and bind to `database_name`.
    ///
    /// `timeout` bounds option parsing (which may resolve SRV records), the
    /// driver's connect and server selection, and the liveness probe. A failed
    /// probe is logged and kept in [`initial_probe`](Self::initial_probe) but
    /// does not fail the call.
    #[instrument(skip_all, fields(database = %database_name))]
    pub async fn connect(
        uri: &str,
        database_name: &str,
        timeout: Duration,
    ) -> Result<Self, MongoError> {
        let options = parse_options(uri, timeout).await?;
        Self::establish(options, database_name, timeout, false).await
    }

    /// Connect using a [`MongoConfig`], applying pool and naming settings.
    ///
    /// With `require_ping` set, a failed liveness probe fails the call with
    /// [`MongoError::Probe`] (driver error as source) or
    /// [`MongoError::ProbeTimeout`].
    #[instrument(skip(config), fields(url = %config.redacted_url(), database = %config.database))]
    pub async fn connect_from_config(config: &MongoConfig) -> Result<Self, MongoError> {
        let timeout = config.connect_timeout();
        let mut options = parse_options(&config.url, timeout).await?;

        options.max_pool_size = Some(config.max_pool_size);
        options.min_pool_size = Some(config.min_pool_size);
        options.server_selection_timeout = Some(config.server_selection_timeout());

        if let Some(ref app_name) = config.app_name {
            options.app_name = Some(app_name.clone());
        }

        Self::establish(options, &config.database, timeout, config.require_ping).await
    }

    async fn establish(
        options: ClientOptions,
        database_name: &str,
        timeout: Duration,
        require_ping: bool,
    ) -> Result<Self, MongoError> {
        let client = Client::with_options(options).map_err(MongoError::Connection)?;
        let database = client.database(database_name);

        let start = Instant::now();
        let probe = health::ping(&database, timeout).await;
        let initial_probe = HealthStatus::from_probe(&probe, start.elapsed());
        if let Err(e) = probe {
            if require_ping {
                return Err(e);
            }
            warn!(reason = %e, "MongoDB did not answer the liveness probe, continuing");
        }

        info!(
            healthy = initial_probe.healthy,
            response_time_ms = initial_probe.response_time_ms,
            "Connected to MongoDB"
        );

        Ok(Self {
            client,
            database,
            probe_timeout: timeout,
            initial_probe,
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn database_name(&self) -> &str {
        self.database.name()
    }

    /// Typed handle to `name` within the bound database
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.database.collection(name)
    }

    /// Result of the probe issued while connecting
    pub fn initial_probe(&self) -> &HealthStatus {
        &self.initial_probe
    }

    /// Ping the database now, bounded by the connect timeout
    pub async fn ping(&self) -> Result<(), MongoError> {
        health::ping(&self.database, self.probe_timeout).await
    }

    /// Ping the database now and report timing
    pub async fn check_health(&self) -> HealthStatus {
        health::check_health_detailed(&self.database, self.probe_timeout).await
    }

    /// Shut the client down within `timeout`.
    ///
    /// Consumes the connection; repositories built from it must not be used
    /// afterwards.
    #[instrument(skip(self), fields(database = %self.database.name()))]
    pub async fn close(self, timeout: Duration) -> Result<(), MongoError> {
        let Self { client, database, .. } = self;
        drop(database);

        tokio::time::timeout(timeout, client.shutdown())
            .await
            .map_err(|_| MongoError::Disconnection(timeout))?;

        info!("MongoDB connection closed");
        Ok(())
    }
}

/// Parse `uri` and bound every driver-side wait by `timeout`
async fn parse_options(uri: &str, timeout: Duration) -> Result<ClientOptions, MongoError> {
    let mut options = tokio::time::timeout(timeout, ClientOptions::parse(uri))
        .await
        .map_err(|_| MongoError::ConnectTimeout(timeout))?
        .map_err(MongoError::Connection)?;

    options.connect_timeout = Some(timeout);
    options.server_selection_timeout = Some(timeout);

    Ok(options)
}
