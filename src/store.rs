use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;
use thiserror::Error;
use ulid::Ulid;

use crate::models::Todo;

/// A store-level failure. Callers do not inspect it beyond logging; any
/// store error surfaces to the client as `UnknownError`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Request(String),
}

/// The persistence boundary: find/insert/save/delete against the backing
/// document store. One implementation per store; all of them assign ULID
/// identifiers at insert.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Todo>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Todo>, StoreError>;

    /// Inserts a new record; the store assigns `id` and `created_at` and
    /// starts the record with `completed = false`.
    async fn insert(&self, title: &str) -> Result<Todo, StoreError>;

    /// Persists an in-memory-mutated record.
    async fn save(&self, todo: &Todo) -> Result<Todo, StoreError>;

    /// Deletes by id, returning the record as it existed immediately
    /// before deletion.
    async fn delete_by_id(&self, id: &str) -> Result<Option<Todo>, StoreError>;

    /// Whether `id` conforms to the store's identifier format. A malformed
    /// identifier is treated as not-found by the callers.
    fn is_valid_id(&self, id: &str) -> bool {
        Ulid::from_string(id).is_ok()
    }
}

fn new_todo(title: &str) -> Todo {
    Todo {
        id: Ulid::new().to_string(),
        title: title.to_string(),
        completed: false,
        created_at: chrono::Utc::now().to_rfc3339(),
        updated_at: None,
    }
}

#[derive(Clone)]
pub struct DynamoStore {
    client: Client,
    table_name: String,
}

impl DynamoStore {
    pub async fn new(table_name: &str) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = Client::new(&config);
        Self {
            client,
            table_name: table_name.to_string(),
        }
    }

    async fn put(&self, todo: &Todo) -> Result<(), StoreError> {
        let mut request = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .item("id", AttributeValue::S(todo.id.clone()))
            .item("title", AttributeValue::S(todo.title.clone()))
            .item("completed", AttributeValue::Bool(todo.completed))
            .item("created_at", AttributeValue::S(todo.created_at.clone()));

        if let Some(ts) = &todo.updated_at {
            request = request.item("updated_at", AttributeValue::S(ts.clone()));
        }

        request
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl TodoStore for DynamoStore {
    async fn find_all(&self) -> Result<Vec<Todo>, StoreError> {
        let result = self
            .client
            .scan()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        let todos = result.items().iter().filter_map(item_to_todo).collect();

        Ok(todos)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Todo>, StoreError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        Ok(result.item().and_then(item_to_todo))
    }

    async fn insert(&self, title: &str) -> Result<Todo, StoreError> {
        let todo = new_todo(title);
        self.put(&todo).await?;
        Ok(todo)
    }

    async fn save(&self, todo: &Todo) -> Result<Todo, StoreError> {
        self.put(todo).await?;
        Ok(todo.clone())
    }

    async fn delete_by_id(&self, id: &str) -> Result<Option<Todo>, StoreError> {
        let result = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id.to_string()))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        Ok(result.attributes().and_then(item_to_todo))
    }
}

fn item_to_todo(item: &HashMap<String, AttributeValue>) -> Option<Todo> {
    Some(Todo {
        id: item.get("id")?.as_s().ok()?.clone(),
        title: item.get("title")?.as_s().ok()?.clone(),
        completed: *item.get("completed")?.as_bool().ok()?,
        created_at: item.get("created_at")?.as_s().ok()?.clone(),
        updated_at: item.get("updated_at").and_then(|v| v.as_s().ok()).cloned(),
    })
}

/// In-memory store for local development and tests. Records keep insertion
/// order so listings match creation order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<Todo>>,
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Todo>, StoreError> {
        Ok(self.records.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Todo>, StoreError> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|t| t.id == id).cloned())
    }

    async fn insert(&self, title: &str) -> Result<Todo, StoreError> {
        let todo = new_todo(title);
        self.records.lock().unwrap().push(todo.clone());
        Ok(todo)
    }

    async fn save(&self, todo: &Todo) -> Result<Todo, StoreError> {
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|t| t.id == todo.id) {
            Some(existing) => *existing = todo.clone(),
            None => records.push(todo.clone()),
        }
        Ok(todo.clone())
    }

    async fn delete_by_id(&self, id: &str) -> Result<Option<Todo>, StoreError> {
        let mut records = self.records.lock().unwrap();
        let position = records.iter().position(|t| t.id == id);
        Ok(position.map(|i| records.remove(i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_assigns_id_and_defaults() {
        let store = MemoryStore::default();
        let todo = store.insert("Buy milk").await.unwrap();

        assert!(store.is_valid_id(&todo.id));
        assert_eq!(todo.title, "Buy milk");
        assert!(!todo.completed);
        assert!(!todo.created_at.is_empty());
        assert!(todo.updated_at.is_none());
    }

    #[tokio::test]
    async fn find_all_preserves_insertion_order() {
        let store = MemoryStore::default();
        store.insert("first").await.unwrap();
        store.insert("second").await.unwrap();

        let titles: Vec<String> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn save_replaces_matching_record() {
        let store = MemoryStore::default();
        let mut todo = store.insert("before").await.unwrap();
        todo.title = "after".to_string();

        store.save(&todo).await.unwrap();

        let found = store.find_by_id(&todo.id).await.unwrap().unwrap();
        assert_eq!(found.title, "after");
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_returns_last_state_and_removes() {
        let store = MemoryStore::default();
        let todo = store.insert("doomed").await.unwrap();

        let deleted = store.delete_by_id(&todo.id).await.unwrap().unwrap();
        assert_eq!(deleted, todo);
        assert!(store.find_by_id(&todo.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_of_unknown_id_returns_none() {
        let store = MemoryStore::default();
        let missing = store.delete_by_id(&Ulid::new().to_string()).await.unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn id_format_check_rejects_garbage() {
        let store = MemoryStore::default();
        assert!(store.is_valid_id(&Ulid::new().to_string()));
        assert!(!store.is_valid_id(""));
        assert!(!store.is_valid_id("123"));
        assert!(!store.is_valid_id("not-a-ulid-at-all!!"));
    }
}
