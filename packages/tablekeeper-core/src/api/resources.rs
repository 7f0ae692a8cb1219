//! Collection calls. Each one only builds a path and method; all failure
//! handling lives in [`ApiClient::send`].

use super::client::ApiClient;
use super::error::{ApiError, FailureKind};
use crate::models::{Entity, RecordId, Resource};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

/// Record counts across all collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollectionCounts {
    pub customers: usize,
    pub restaurants: usize,
    pub tables: usize,
    pub reservations: usize,
}

impl ApiClient {
    /// `GET /{collection}`
    pub async fn list(&self, entity: Entity) -> Result<Value, ApiError> {
        self.send(Method::GET, entity.collection_path(), None).await
    }

    /// `GET /{collection}/{id}`
    pub async fn get(&self, entity: Entity, id: RecordId) -> Result<Value, ApiError> {
        self.send(Method::GET, &entity.item_path(id), None).await
    }

    /// `POST /{collection}`
    pub async fn create(&self, entity: Entity, data: &Value) -> Result<Value, ApiError> {
        self.send(Method::POST, entity.collection_path(), Some(data)).await
    }

    /// `PUT /{collection}/{id}`
    pub async fn update(
        &self,
        entity: Entity,
        id: RecordId,
        data: &Value,
    ) -> Result<Value, ApiError> {
        self.send(Method::PUT, &entity.item_path(id), Some(data)).await
    }

    /// `DELETE /{collection}/{id}`
    pub async fn delete(&self, entity: Entity, id: RecordId) -> Result<Value, ApiError> {
        self.send(Method::DELETE, &entity.item_path(id), None).await
    }

    pub async fn list_all<T: Resource>(&self) -> Result<Vec<T>, ApiError> {
        let value = self.list(T::ENTITY).await?;
        self.from_body(value)
    }

    pub async fn fetch<T: Resource>(&self, id: RecordId) -> Result<T, ApiError> {
        let value = self.get(T::ENTITY, id).await?;
        self.from_body(value)
    }

    /// Create a record and return the server's copy (with its id).
    pub async fn create_record<T: Resource>(&self, record: &T) -> Result<T, ApiError> {
        let body = self.to_body(record)?;
        let value = self.create(T::ENTITY, &body).await?;
        self.from_body(value)
    }

    pub async fn update_record<T: Resource>(&self, id: RecordId, record: &T) -> Result<T, ApiError> {
        let body = self.to_body(record)?;
        let value = self.update(T::ENTITY, id, &body).await?;
        self.from_body(value)
    }

    pub async fn delete_record<T: Resource>(&self, id: RecordId) -> Result<(), ApiError> {
        self.delete(T::ENTITY, id).await.map(|_| ())
    }

    /// Fetch every collection concurrently and count the records.
    pub async fn collection_counts(&self) -> Result<CollectionCounts, ApiError> {
        let (customers, restaurants, tables, reservations) = futures::try_join!(
            self.count(Entity::Customers),
            self.count(Entity::Restaurants),
            self.count(Entity::Tables),
            self.count(Entity::Reservations),
        )?;

        Ok(CollectionCounts {
            customers,
            restaurants,
            tables,
            reservations,
        })
    }

    async fn count(&self, entity: Entity) -> Result<usize, ApiError> {
        match self.list(entity).await? {
            Value::Array(items) => Ok(items.len()),
            Value::Null => Ok(0),
            other => Err(self.report(ApiError::request_failed(
                format!("Expected a list of {}, got {}", entity, json_kind(&other)),
                None,
                FailureKind::Payload,
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
