//! MongoDB connection manager and generic repository
//!
//! [`MongoConnection`] owns the client; [`MongoRepository`] offers CRUD and
//! aggregation over one collection of an [`Entity`] type.

mod config;
mod connector;
mod entity;
mod error;
mod health;
mod repository;

pub use config::MongoConfig;
pub use connector::MongoConnection;
pub use entity::{Entity, ID_FIELD};
pub use error::MongoError;
pub use health::{HealthStatus, check_health, check_health_detailed, ping};
pub use repository::MongoRepository;

// Re-export MongoDB types for convenience
pub use mongodb::{Client, Collection, Database, bson, options};
