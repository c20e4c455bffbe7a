//! Generic document-store access layer
//!
//! Two pieces, used in this order:
//!
//! 1. [`mongodb::MongoConnection`] owns the driver client and the database
//!    handle derived from it, from `connect` to `close`.
//! 2. [`mongodb::MongoRepository`] binds one document type to one collection
//!    and offers create / find / update / delete / aggregate over it.
//!
//! Every repository call takes a [`RequestContext`] that bounds it with a
//! deadline and a cancellation token supplied by the caller.
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB connection manager and repository
//! - `config` - `core_config::FromEnv` for [`mongodb::MongoConfig`]
//! - `all` - everything
//!
//! # Example
//!
//! ```ignore
//! use docstore::RequestContext;
//! use docstore::mongodb::{Entity, MongoConnection, MongoRepository};
//! use mongodb::bson::doc;
//! use serde::{Deserialize, Serialize};
//! use std::time::Duration;
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Note {
//!     #[serde(rename = "_id")]
//!     id: String,
//!     body: String,
//! }
//!
//! impl Entity for Note {
//!     type Id = String;
//!     fn id(&self) -> &String {
//!         &self.id
//!     }
//! }
//!
//! let conn = MongoConnection::connect("mongodb://localhost:27017", "app", Duration::from_secs(10)).await?;
//! let notes = MongoRepository::<Note>::new(&conn, "notes");
//!
//! let ctx = RequestContext::with_timeout(Duration::from_secs(2));
//! notes.create(&ctx, Note { id: "a".into(), body: "hi".into() }).await?;
//! let note = notes.find_by_id(&ctx, &"a".to_string()).await?;
//!
//! conn.close(Duration::from_secs(5)).await?;
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{ContextError, RequestContext};
