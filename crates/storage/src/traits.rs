use async_trait::async_trait;

use vlist_core::{
    CreateListItemRequest, CreateListRequest, ListItemRecord, ListRecord, UpdateListItemRequest,
    UpdateListRequest,
};

use crate::error::StoreError;

/// The storage trait for vlist backends.
///
/// A `ListStore` implementation provides storage for value lists and their
/// items behind an explicit index lifecycle:
///
/// 1. `create_index()` — provision the data store
/// 2. list/item operations — all fail with `StoreError::IndexMissing` until
///    the index exists
/// 3. `delete_index()` — drop the data store and everything in it
///
/// ## Not-found contract
///
/// An update or delete targeting an unknown id MUST NOT mutate any state and
/// MUST return the matching not-found variant carrying the offending id
/// verbatim. This is the invariant the HTTP 404 path is built on.
///
/// ## Thread safety
///
/// Implementations must be `Send + Sync + 'static` to be used in axum
/// application state and across async task boundaries.
#[async_trait]
pub trait ListStore: Send + Sync + 'static {
    // ── Index lifecycle ──────────────────────────────────────────────────────

    /// Provision the index. Errors with `IndexExists` if already created.
    async fn create_index(&self) -> Result<(), StoreError>;

    /// Drop the index and all lists and items in it.
    /// Errors with `IndexMissing` if the index was never created.
    async fn delete_index(&self) -> Result<(), StoreError>;

    /// Whether the index currently exists.
    async fn index_exists(&self) -> Result<bool, StoreError>;

    // ── Lists ────────────────────────────────────────────────────────────────

    /// Create a list, generating an id when the request omits one.
    ///
    /// Errors with `ListExists` on a duplicate explicit id.
    async fn create_list(&self, req: CreateListRequest) -> Result<ListRecord, StoreError>;

    /// Read a list by id. Errors with `ListNotFound`.
    async fn get_list(&self, id: &str) -> Result<ListRecord, StoreError>;

    /// Update a list's `name` / `description`; only supplied fields change.
    /// Errors with `ListNotFound`.
    async fn update_list(&self, req: UpdateListRequest) -> Result<ListRecord, StoreError>;

    /// Delete a list and all items belonging to it; returns the deleted
    /// record. Errors with `ListNotFound`.
    async fn delete_list(&self, id: &str) -> Result<ListRecord, StoreError>;

    // ── List items ───────────────────────────────────────────────────────────

    /// Create a list item bound to an existing list. The item inherits the
    /// parent list's type.
    ///
    /// Errors with `ListMissing` when `list_id` does not resolve, and
    /// `ListItemExists` on a duplicate explicit id.
    async fn create_list_item(
        &self,
        req: CreateListItemRequest,
    ) -> Result<ListItemRecord, StoreError>;

    /// Read a list item by id. Errors with `ListItemNotFound`.
    async fn get_list_item(&self, id: &str) -> Result<ListItemRecord, StoreError>;

    /// Update a list item's `value`, preserving its membership and creation
    /// metadata. Errors with `ListItemNotFound` without mutating anything.
    async fn update_list_item(
        &self,
        req: UpdateListItemRequest,
    ) -> Result<ListItemRecord, StoreError>;

    /// Delete a list item; returns the deleted record.
    /// Errors with `ListItemNotFound`.
    async fn delete_list_item(&self, id: &str) -> Result<ListItemRecord, StoreError>;
}
