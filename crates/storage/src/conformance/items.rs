use std::future::Future;

use vlist_core::{ListType, UpdateListItemRequest};

use super::{make_item_request, make_list_request, TestResult};
use crate::{ListStore, StoreError};

pub(super) async fn run_item_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.push(TestResult::from_result(
        "items",
        "create_requires_parent_list",
        create_requires_parent_list(factory).await,
    ));
    results.push(TestResult::from_result(
        "items",
        "create_inherits_list_type",
        create_inherits_list_type(factory).await,
    ));
    results.push(TestResult::from_result(
        "items",
        "create_generates_id_when_omitted",
        create_generates_id_when_omitted(factory).await,
    ));
    results.push(TestResult::from_result(
        "items",
        "create_duplicate_id_conflicts",
        create_duplicate_id_conflicts(factory).await,
    ));
    results.push(TestResult::from_result(
        "items",
        "update_changes_value_only",
        update_changes_value_only(factory).await,
    ));
    results.push(TestResult::from_result(
        "items",
        "update_unknown_id_not_found_message",
        update_unknown_id_not_found_message(factory).await,
    ));
    results.push(TestResult::from_result(
        "items",
        "update_miss_mutates_nothing",
        update_miss_mutates_nothing(factory).await,
    ));
    results.push(TestResult::from_result(
        "items",
        "repeated_update_same_value_is_stable",
        repeated_update_same_value_is_stable(factory).await,
    ));
    results.push(TestResult::from_result(
        "items",
        "delete_returns_record_and_removes",
        delete_returns_record_and_removes(factory).await,
    ));
    results.push(TestResult::from_result(
        "items",
        "deleting_list_cascades_to_items",
        deleting_list_cascades_to_items(factory).await,
    ));

    results
}

/// Fresh store with index, one list "l1", one item "i1" in it.
async fn setup<S, F, Fut>(factory: &F) -> Result<S, String>
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.create_index().await.map_err(|e| e.to_string())?;
    s.create_list(make_list_request(Some("l1")))
        .await
        .map_err(|e| e.to_string())?;
    s.create_list_item(make_item_request(Some("i1"), "l1"))
        .await
        .map_err(|e| e.to_string())?;
    Ok(s)
}

/// Creating an item for a missing list yields ListMissing with the exact
/// "does not exist" message.
async fn create_requires_parent_list<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.create_index().await.map_err(|e| e.to_string())?;
    match s.create_list_item(make_item_request(Some("i1"), "ghost")).await {
        Err(err @ StoreError::ListMissing { .. }) => {
            let msg = err.to_string();
            if msg != "list id: \"ghost\" does not exist" {
                return Err(format!("unexpected message: {}", msg));
            }
            Ok(())
        }
        other => Err(format!("expected ListMissing, got {:?}", other)),
    }
}

/// An item's type is the parent list's type, not a request field.
async fn create_inherits_list_type<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.create_index().await.map_err(|e| e.to_string())?;

    let mut req = make_list_request(Some("kw"));
    req.list_type = ListType::Keyword;
    s.create_list(req).await.map_err(|e| e.to_string())?;

    let item = s
        .create_list_item(make_item_request(Some("i1"), "kw"))
        .await
        .map_err(|e| e.to_string())?;
    if item.list_type != ListType::Keyword {
        return Err(format!("expected keyword type, got {:?}", item.list_type));
    }
    Ok(())
}

/// Create without an id yields a generated id usable in a later update.
async fn create_generates_id_when_omitted<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = setup(factory).await?;
    let created = s
        .create_list_item(make_item_request(None, "l1"))
        .await
        .map_err(|e| e.to_string())?;
    if created.id.is_empty() {
        return Err("generated item id is empty".to_string());
    }

    let updated = s
        .update_list_item(UpdateListItemRequest {
            id: created.id.clone(),
            value: "192.168.0.2".to_string(),
        })
        .await
        .map_err(|e| e.to_string())?;
    if updated.value != "192.168.0.2" {
        return Err(format!("expected updated value, got \"{}\"", updated.value));
    }
    Ok(())
}

/// Second create with the same explicit id yields ListItemExists.
async fn create_duplicate_id_conflicts<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = setup(factory).await?;
    match s.create_list_item(make_item_request(Some("i1"), "l1")).await {
        Err(StoreError::ListItemExists { id }) if id == "i1" => Ok(()),
        other => Err(format!("expected ListItemExists, got {:?}", other)),
    }
}

/// Update replaces value and bumps version; everything else is preserved.
async fn update_changes_value_only<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = setup(factory).await?;
    let before = s.get_list_item("i1").await.map_err(|e| e.to_string())?;

    let after = s
        .update_list_item(UpdateListItemRequest {
            id: "i1".to_string(),
            value: "192.168.0.2".to_string(),
        })
        .await
        .map_err(|e| e.to_string())?;

    if after.value != "192.168.0.2" {
        return Err(format!("expected new value, got \"{}\"", after.value));
    }
    if after.list_id != before.list_id {
        return Err("list_id changed on update".to_string());
    }
    if after.created_at != before.created_at {
        return Err("created_at changed on update".to_string());
    }
    if after.tie_breaker_id != before.tie_breaker_id {
        return Err("tie_breaker_id changed on update".to_string());
    }
    if after.version != before.version + 1 {
        return Err(format!(
            "expected version {}, got {}",
            before.version + 1,
            after.version
        ));
    }
    Ok(())
}

/// The not-found message interpolates the requested id verbatim.
async fn update_unknown_id_not_found_message<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = setup(factory).await?;
    match s
        .update_list_item(UpdateListItemRequest {
            id: "some-other-id".to_string(),
            value: "192.168.0.2".to_string(),
        })
        .await
    {
        Err(err @ StoreError::ListItemNotFound { .. }) => {
            let msg = err.to_string();
            if msg != "list item id: \"some-other-id\" not found" {
                return Err(format!("unexpected message: {}", msg));
            }
            Ok(())
        }
        other => Err(format!("expected ListItemNotFound, got {:?}", other)),
    }
}

/// A failed update leaves every existing item byte-for-byte unchanged.
async fn update_miss_mutates_nothing<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = setup(factory).await?;
    let before = s.get_list_item("i1").await.map_err(|e| e.to_string())?;

    let result = s
        .update_list_item(UpdateListItemRequest {
            id: "some-other-id".to_string(),
            value: "192.168.0.2".to_string(),
        })
        .await;
    if result.is_ok() {
        return Err("update of unknown id unexpectedly succeeded".to_string());
    }

    let after = s.get_list_item("i1").await.map_err(|e| e.to_string())?;
    if after != before {
        return Err("existing item mutated by a failed update".to_string());
    }
    Ok(())
}

/// Two updates with the same value yield the same observable record modulo
/// server-generated fields.
async fn repeated_update_same_value_is_stable<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = setup(factory).await?;
    let update = UpdateListItemRequest {
        id: "i1".to_string(),
        value: "192.168.0.2".to_string(),
    };

    let first = s
        .update_list_item(update.clone())
        .await
        .map_err(|e| e.to_string())?;
    let second = s
        .update_list_item(update)
        .await
        .map_err(|e| e.to_string())?;

    if first.value != second.value
        || first.id != second.id
        || first.list_id != second.list_id
        || first.created_at != second.created_at
        || first.tie_breaker_id != second.tie_breaker_id
    {
        return Err("repeated update changed non-generated fields".to_string());
    }
    Ok(())
}

/// delete_list_item returns the record; a later lookup misses.
async fn delete_returns_record_and_removes<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = setup(factory).await?;
    let deleted = s.delete_list_item("i1").await.map_err(|e| e.to_string())?;
    if deleted.id != "i1" {
        return Err(format!("expected deleted id \"i1\", got \"{}\"", deleted.id));
    }
    if !matches!(
        s.get_list_item("i1").await,
        Err(StoreError::ListItemNotFound { .. })
    ) {
        return Err("item still present after delete".to_string());
    }
    Ok(())
}

/// Deleting a list removes its items but not items of other lists.
async fn deleting_list_cascades_to_items<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = setup(factory).await?;
    s.create_list(make_list_request(Some("l2")))
        .await
        .map_err(|e| e.to_string())?;
    s.create_list_item(make_item_request(Some("i2"), "l2"))
        .await
        .map_err(|e| e.to_string())?;

    s.delete_list("l1").await.map_err(|e| e.to_string())?;

    if !matches!(
        s.get_list_item("i1").await,
        Err(StoreError::ListItemNotFound { .. })
    ) {
        return Err("item of deleted list survived".to_string());
    }
    s.get_list_item("i2").await.map_err(|e| e.to_string())?;
    Ok(())
}
