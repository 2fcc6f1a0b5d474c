/// All errors that can be returned by a ListStore implementation.
///
/// The `Display` strings are the exact messages the HTTP layer serves to
/// clients, so changing them is a wire-contract change.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing index has not been created yet.
    #[error("list index does not exist")]
    IndexMissing,

    /// The backing index already exists.
    #[error("list index already exists")]
    IndexExists,

    /// No list with the given id.
    #[error("list id: \"{id}\" not found")]
    ListNotFound { id: String },

    /// The parent list referenced at item creation does not exist.
    #[error("list id: \"{id}\" does not exist")]
    ListMissing { id: String },

    /// A list with the given id already exists.
    #[error("list id: \"{id}\" already exists")]
    ListExists { id: String },

    /// No list item with the given id.
    #[error("list item id: \"{id}\" not found")]
    ListItemNotFound { id: String },

    /// A list item with the given id already exists.
    #[error("list item id: \"{id}\" already exists")]
    ListItemExists { id: String },

    /// A backend-specific storage error (connection, serialization, etc.).
    #[error("storage backend error: {0}")]
    Backend(String),
}
