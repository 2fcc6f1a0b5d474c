use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use vlist_core::{
    CreateListItemRequest, CreateListRequest, ListItemRecord, ListRecord, UpdateListItemRequest,
    UpdateListRequest,
};

use crate::error::StoreError;
use crate::traits::ListStore;

/// Contents of a provisioned index.
#[derive(Debug, Default)]
struct Index {
    lists: HashMap<String, ListRecord>,
    items: HashMap<String, ListItemRecord>,
}

/// In-memory `ListStore` backend.
///
/// Holds everything behind a single `tokio::sync::RwLock`; `None` means the
/// index has not been created (or was deleted). Suitable for the server's
/// default mode and for tests; durable backends implement the same trait.
#[derive(Debug, Default)]
pub struct MemoryStore {
    index: RwLock<Option<Index>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ListStore for MemoryStore {
    async fn create_index(&self) -> Result<(), StoreError> {
        let mut guard = self.index.write().await;
        if guard.is_some() {
            return Err(StoreError::IndexExists);
        }
        *guard = Some(Index::default());
        Ok(())
    }

    async fn delete_index(&self) -> Result<(), StoreError> {
        let mut guard = self.index.write().await;
        if guard.take().is_none() {
            return Err(StoreError::IndexMissing);
        }
        Ok(())
    }

    async fn index_exists(&self) -> Result<bool, StoreError> {
        Ok(self.index.read().await.is_some())
    }

    async fn create_list(&self, req: CreateListRequest) -> Result<ListRecord, StoreError> {
        let mut guard = self.index.write().await;
        let index = guard.as_mut().ok_or(StoreError::IndexMissing)?;

        if let Some(id) = &req.id {
            if index.lists.contains_key(id) {
                return Err(StoreError::ListExists { id: id.clone() });
            }
        }

        let record = ListRecord::from_create(req);
        index.lists.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn get_list(&self, id: &str) -> Result<ListRecord, StoreError> {
        let guard = self.index.read().await;
        let index = guard.as_ref().ok_or(StoreError::IndexMissing)?;
        index
            .lists
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::ListNotFound { id: id.to_string() })
    }

    async fn update_list(&self, req: UpdateListRequest) -> Result<ListRecord, StoreError> {
        let mut guard = self.index.write().await;
        let index = guard.as_mut().ok_or(StoreError::IndexMissing)?;

        let record = index
            .lists
            .get_mut(&req.id)
            .ok_or_else(|| StoreError::ListNotFound { id: req.id.clone() })?;
        record.apply_update(&req);
        Ok(record.clone())
    }

    async fn delete_list(&self, id: &str) -> Result<ListRecord, StoreError> {
        let mut guard = self.index.write().await;
        let index = guard.as_mut().ok_or(StoreError::IndexMissing)?;

        let record = index
            .lists
            .remove(id)
            .ok_or_else(|| StoreError::ListNotFound { id: id.to_string() })?;
        // Items cannot outlive their parent list.
        index.items.retain(|_, item| item.list_id != record.id);
        Ok(record)
    }

    async fn create_list_item(
        &self,
        req: CreateListItemRequest,
    ) -> Result<ListItemRecord, StoreError> {
        let mut guard = self.index.write().await;
        let index = guard.as_mut().ok_or(StoreError::IndexMissing)?;

        let list_type = index
            .lists
            .get(&req.list_id)
            .map(|list| list.list_type)
            .ok_or_else(|| StoreError::ListMissing {
                id: req.list_id.clone(),
            })?;

        if let Some(id) = &req.id {
            if index.items.contains_key(id) {
                return Err(StoreError::ListItemExists { id: id.clone() });
            }
        }

        let record = ListItemRecord::from_create(req, list_type);
        index.items.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn get_list_item(&self, id: &str) -> Result<ListItemRecord, StoreError> {
        let guard = self.index.read().await;
        let index = guard.as_ref().ok_or(StoreError::IndexMissing)?;
        index
            .items
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::ListItemNotFound { id: id.to_string() })
    }

    async fn update_list_item(
        &self,
        req: UpdateListItemRequest,
    ) -> Result<ListItemRecord, StoreError> {
        let mut guard = self.index.write().await;
        let index = guard.as_mut().ok_or(StoreError::IndexMissing)?;

        let record = index
            .items
            .get_mut(&req.id)
            .ok_or_else(|| StoreError::ListItemNotFound { id: req.id.clone() })?;
        record.apply_update(&req);
        Ok(record.clone())
    }

    async fn delete_list_item(&self, id: &str) -> Result<ListItemRecord, StoreError> {
        let mut guard = self.index.write().await;
        let index = guard.as_mut().ok_or(StoreError::IndexMissing)?;
        index
            .items
            .remove(id)
            .ok_or_else(|| StoreError::ListItemNotFound { id: id.to_string() })
    }
}
