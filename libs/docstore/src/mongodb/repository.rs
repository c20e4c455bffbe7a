//! Generic MongoDB repository

use futures::TryStreamExt;
use mongodb::bson::Document;
use mongodb::options::FindOptions;
use mongodb::{Collection, Database};
use tracing::{debug, instrument};

use super::entity::{encode_entity, id_filter};
use super::{Entity, MongoConnection, MongoError};
use crate::common::RequestContext;

/// CRUD and aggregation over one named collection of `T`.
///
/// Every call takes the caller's [`RequestContext`] and makes a single round
/// trip; failures come back immediately. Cursors are drained inside the
/// context, so a deadline also bounds result materialization.
///
/// # Example
/// ```ignore
/// let repo = MongoRepository::<Counter>::new(&conn, "counters");
/// let ctx = RequestContext::with_timeout(Duration::from_secs(2));
///
/// repo.create(&ctx, Counter { name: "a".into(), value: 1 }).await?;
/// repo.update(&ctx, &"a".to_string(), doc! { "$set": { "value": 2 } }).await?;
/// let counter = repo.find_by_id(&ctx, &"a".to_string()).await?;
/// ```
pub struct MongoRepository<T: Entity> {
    collection: Collection<T>,
    raw: Collection<Document>,
}

impl<T: Entity> MongoRepository<T> {
    pub fn new(connection: &MongoConnection, collection_name: &str) -> Self {
        Self::from_database(connection.database(), collection_name)
    }

    pub fn from_database(database: &Database, collection_name: &str) -> Self {
        let collection = database.collection::<T>(collection_name);
        let raw = collection.clone_with_type::<Document>();
        Self { collection, raw }
    }

    /// Underlying typed collection for operations not covered here
    pub fn collection(&self) -> &Collection<T> {
        &self.collection
    }

    pub fn collection_name(&self) -> &str {
        self.collection.name()
    }

    /// Insert one document.
    ///
    /// The serialized `_id` must equal [`Entity::id`]; otherwise nothing is
    /// written and [`MongoError::Identifier`] is returned.
    #[instrument(skip_all, fields(collection = %self.collection_name(), id = %document.id()))]
    pub async fn create(&self, ctx: &RequestContext, document: T) -> Result<(), MongoError> {
        let name = self.collection_name();
        let encoded = encode_entity(name, &document)?;

        ctx.run(self.raw.insert_one(encoded))
            .await?
            .map_err(|e| MongoError::write(name, e))?;

        debug!("Document inserted");
        Ok(())
    }

    /// Insert a batch. Every document passes the identifier check before any
    /// is sent. An empty batch does not touch the store.
    #[instrument(skip_all, fields(collection = %self.collection_name(), count = documents.len()))]
    pub async fn create_many(
        &self,
        ctx: &RequestContext,
        documents: Vec<T>,
    ) -> Result<usize, MongoError> {
        if documents.is_empty() {
            return Ok(0);
        }

        let name = self.collection_name();
        let encoded = documents
            .iter()
            .map(|document| encode_entity(name, document))
            .collect::<Result<Vec<_>, _>>()?;

        let result = ctx
            .run(self.raw.insert_many(encoded))
            .await?
            .map_err(|e| MongoError::write(name, e))?;

        let inserted = result.inserted_ids.len();
        debug!(inserted, "Documents inserted");
        Ok(inserted)
    }

    #[instrument(skip_all, fields(collection = %self.collection_name(), id = %id))]
    pub async fn find_by_id(&self, ctx: &RequestContext, id: &T::Id) -> Result<T, MongoError> {
        let name = self.collection_name();
        let filter = id_filter(name, id)?;

        ctx.run(self.collection.find_one(filter))
            .await?
            .map_err(|e| MongoError::read(name, e))?
            .ok_or_else(|| MongoError::NotFound {
                collection: name.to_string(),
                id: id.to_string(),
            })
    }

    /// All documents matching `filter`; `doc! {}` selects the whole collection.
    pub async fn find(&self, ctx: &RequestContext, filter: Document) -> Result<Vec<T>, MongoError> {
        self.find_with_options(ctx, filter, None::<FindOptions>).await
    }

    #[instrument(skip_all, fields(collection = %self.collection_name(), filter = %filter))]
    pub async fn find_with_options(
        &self,
        ctx: &RequestContext,
        filter: Document,
        options: impl Into<Option<FindOptions>>,
    ) -> Result<Vec<T>, MongoError> {
        let name = self.collection_name();
        let options = options.into();

        let documents: Vec<T> = ctx
            .run(async {
                let cursor = self.collection.find(filter).with_options(options).await?;
                cursor.try_collect::<Vec<T>>().await
            })
            .await?
            .map_err(|e| MongoError::read(name, e))?;

        debug!(returned = documents.len(), "Find completed");
        Ok(documents)
    }

    /// Apply `update` to the document with `_id == id`.
    ///
    /// Returns whether a document matched. A match whose fields already hold
    /// the target values still counts.
    #[instrument(skip_all, fields(collection = %self.collection_name(), id = %id))]
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: &T::Id,
        update: Document,
    ) -> Result<bool, MongoError> {
        let name = self.collection_name();
        let filter = id_filter(name, id)?;

        let result = ctx
            .run(self.raw.update_one(filter, update))
            .await?
            .map_err(|e| MongoError::write(name, e))?;

        debug!(
            matched = result.matched_count,
            modified = result.modified_count,
            "Update applied"
        );
        Ok(result.matched_count > 0)
    }

    /// Remove the document with `_id == id`, returning whether one was removed.
    #[instrument(skip_all, fields(collection = %self.collection_name(), id = %id))]
    pub async fn delete(&self, ctx: &RequestContext, id: &T::Id) -> Result<bool, MongoError> {
        let name = self.collection_name();
        let filter = id_filter(name, id)?;

        let result = ctx
            .run(self.raw.delete_one(filter))
            .await?
            .map_err(|e| MongoError::write(name, e))?;

        debug!(deleted = result.deleted_count, "Delete applied");
        Ok(result.deleted_count > 0)
    }

    /// Run `pipeline` and decode every output document as `T`.
    #[instrument(skip_all, fields(collection = %self.collection_name(), stages = pipeline.len()))]
    pub async fn aggregate(
        &self,
        ctx: &RequestContext,
        pipeline: Vec<Document>,
    ) -> Result<Vec<T>, MongoError> {
        let name = self.collection_name();

        let documents: Vec<T> = ctx
            .run(async {
                let cursor = self.collection.aggregate(pipeline).await?;
                cursor.with_type::<T>().try_collect::<Vec<T>>().await
            })
            .await?
            .map_err(|e| MongoError::read(name, e))?;

        debug!(returned = documents.len(), "Aggregation completed");
        Ok(documents)
    }

    #[instrument(skip_all, fields(collection = %self.collection_name(), filter = %filter))]
    pub async fn count(&self, ctx: &RequestContext, filter: Document) -> Result<u64, MongoError> {
        let name = self.collection_name();

        ctx.run(self.collection.count_documents(filter))
            .await?
            .map_err(|e| MongoError::read(name, e))
    }
}

impl<T: Entity> Clone for MongoRepository<T> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            raw: self.raw.clone(),
        }
    }
}

impl<T: Entity> std::fmt::Debug for MongoRepository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoRepository")
            .field("namespace", &self.collection.namespace())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ContextError;
    use mongodb::bson::doc;
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        #[serde(rename = "_id")]
        name: String,
        value: i32,
    }

    impl Entity for Counter {
        type Id = String;

        fn id(&self) -> &String {
            &self.name
        }
    }

    async fn offline_repository() -> MongoRepository<Counter> {
        // Parsing does not contact the server; nothing below reaches it.
        let client = mongodb::Client::with_uri_str("mongodb://127.0.0.1:1/?directConnection=true")
            .await
            .unwrap();
        MongoRepository::from_database(&client.database("test"), "counters")
    }

    #[tokio::test]
    async fn test_names_collection() {
        let repo = offline_repository().await;
        assert_eq!(repo.collection_name(), "counters");
        assert_eq!(repo.clone().collection().name(), "counters");
    }

    #[tokio::test]
    async fn test_create_many_empty_batch_is_noop() {
        let repo = offline_repository().await;
        let inserted = repo
            .create_many(&RequestContext::background(), Vec::new())
            .await
            .unwrap();
        assert_eq!(inserted, 0);
    }

    #[tokio::test]
    async fn test_cancelled_context_fails_before_store() {
        let repo = offline_repository().await;
        let ctx = RequestContext::background();
        ctx.cancellation_token().cancel();

        let err = repo.find(&ctx, doc! {}).await.unwrap_err();
        assert!(matches!(err, MongoError::Interrupted(ContextError::Cancelled)));

        let err = repo
            .create(&ctx, Counter { name: "a".into(), value: 1 })
            .await
            .unwrap_err();
        assert!(err.is_interrupted());
    }

    #[tokio::test]
    async fn test_deadline_bounds_unreachable_store() {
        let repo = offline_repository().await;
        let ctx = RequestContext::with_timeout(Duration::from_millis(50));

        let err = repo.find_by_id(&ctx, &"a".to_string()).await.unwrap_err();
        assert!(matches!(err, MongoError::Interrupted(ContextError::DeadlineExceeded)));
    }
}
