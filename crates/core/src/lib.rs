mod id;
mod item;
mod list;

pub use id::{generate_id, generate_tie_breaker, now_rfc3339, SERVICE_PRINCIPAL};
pub use item::{CreateListItemRequest, ListItemRecord, UpdateListItemRequest};
pub use list::{CreateListRequest, ListRecord, ListType, UpdateListRequest};
