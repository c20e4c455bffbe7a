use mongodb::bson::{self, Document};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

use super::MongoError;

/// Name of the identifier field every stored document carries
pub const ID_FIELD: &str = "_id";

/// A document type that can live in a [`MongoRepository`](super::MongoRepository).
///
/// The identifier must serialize under `_id`, usually with
/// `#[serde(rename = "_id")]` on the field returned by [`Entity::id`].
/// Repositories check this on every write.
///
/// ```
/// use docstore::mongodb::Entity;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Counter {
///     #[serde(rename = "_id")]
///     name: String,
///     value: i64,
/// }
///
/// impl Entity for Counter {
///     type Id = String;
///
///     fn id(&self) -> &String {
///         &self.name
///     }
/// }
/// ```
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + Unpin {
    type Id: Serialize + fmt::Display + Send + Sync;

    fn id(&self) -> &Self::Id;
}

/// `{ "_id": <id> }`
pub(crate) fn id_filter<I>(collection: &str, id: &I) -> Result<Document, MongoError>
where
    I: Serialize + ?Sized,
{
    let value = bson::to_bson(id).map_err(|e| MongoError::encode(collection, e))?;
    let mut filter = Document::new();
    filter.insert(ID_FIELD, value);
    Ok(filter)
}

/// Serialize `entity` and verify the stored `_id` is the one [`Entity::id`] reports.
pub(crate) fn encode_entity<T: Entity>(collection: &str, entity: &T) -> Result<Document, MongoError> {
    let encoded = bson::to_document(entity).map_err(|e| MongoError::encode(collection, e))?;
    let expected = bson::to_bson(entity.id()).map_err(|e| MongoError::encode(collection, e))?;

    match encoded.get(ID_FIELD) {
        Some(stored) if *stored == expected => Ok(encoded),
        Some(stored) => Err(MongoError::Identifier {
            collection: collection.to_string(),
            reason: format!(
                "stored `_id` {stored} differs from Entity::id() {}",
                entity.id()
            ),
        }),
        None => Err(MongoError::Identifier {
            collection: collection.to_string(),
            reason: format!(
                "document {} serializes without an `_id` field",
                entity.id()
            ),
        }),
    }
}
