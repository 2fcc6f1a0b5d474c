use std::future::Future;

use vlist_core::UpdateListRequest;

use super::{make_list_request, TestResult};
use crate::{ListStore, StoreError};

pub(super) async fn run_list_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.push(TestResult::from_result(
        "lists",
        "create_keeps_explicit_id",
        create_keeps_explicit_id(factory).await,
    ));
    results.push(TestResult::from_result(
        "lists",
        "create_generates_id_when_omitted",
        create_generates_id_when_omitted(factory).await,
    ));
    results.push(TestResult::from_result(
        "lists",
        "create_sets_server_metadata",
        create_sets_server_metadata(factory).await,
    ));
    results.push(TestResult::from_result(
        "lists",
        "create_duplicate_id_conflicts",
        create_duplicate_id_conflicts(factory).await,
    ));
    results.push(TestResult::from_result(
        "lists",
        "get_unknown_list_is_not_found",
        get_unknown_list_is_not_found(factory).await,
    ));
    results.push(TestResult::from_result(
        "lists",
        "update_changes_only_supplied_fields",
        update_changes_only_supplied_fields(factory).await,
    ));
    results.push(TestResult::from_result(
        "lists",
        "update_unknown_list_is_not_found",
        update_unknown_list_is_not_found(factory).await,
    ));
    results.push(TestResult::from_result(
        "lists",
        "delete_returns_record_and_removes",
        delete_returns_record_and_removes(factory).await,
    ));

    results
}

async fn setup<S, F, Fut>(factory: &F) -> Result<S, String>
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.create_index().await.map_err(|e| e.to_string())?;
    Ok(s)
}

/// Explicit create id round-trips through the store.
async fn create_keeps_explicit_id<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = setup(factory).await?;
    let record = s
        .create_list(make_list_request(Some("some-list-id")))
        .await
        .map_err(|e| e.to_string())?;
    if record.id != "some-list-id" {
        return Err(format!("expected id \"some-list-id\", got \"{}\"", record.id));
    }
    let fetched = s.get_list("some-list-id").await.map_err(|e| e.to_string())?;
    if fetched != record {
        return Err("fetched record differs from created record".to_string());
    }
    Ok(())
}

/// Create without an id yields a generated id that resolves afterward.
async fn create_generates_id_when_omitted<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = setup(factory).await?;
    let record = s
        .create_list(make_list_request(None))
        .await
        .map_err(|e| e.to_string())?;
    if record.id.is_empty() {
        return Err("generated id is empty".to_string());
    }
    s.get_list(&record.id).await.map_err(|e| e.to_string())?;
    Ok(())
}

/// Fresh records carry version 1, matching timestamps, and a tie breaker.
async fn create_sets_server_metadata<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = setup(factory).await?;
    let record = s
        .create_list(make_list_request(Some("l1")))
        .await
        .map_err(|e| e.to_string())?;
    if record.version != 1 {
        return Err(format!("expected version 1, got {}", record.version));
    }
    if record.created_at.is_empty() || record.created_at != record.updated_at {
        return Err("created_at/updated_at not initialized together".to_string());
    }
    if record.tie_breaker_id.is_empty() {
        return Err("tie_breaker_id is empty".to_string());
    }
    Ok(())
}

/// Second create with the same explicit id yields ListExists.
async fn create_duplicate_id_conflicts<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = setup(factory).await?;
    s.create_list(make_list_request(Some("l1")))
        .await
        .map_err(|e| e.to_string())?;
    match s.create_list(make_list_request(Some("l1"))).await {
        Err(StoreError::ListExists { id }) if id == "l1" => Ok(()),
        other => Err(format!("expected ListExists for \"l1\", got {:?}", other)),
    }
}

/// get_list on an unknown id yields ListNotFound with the id interpolated.
async fn get_unknown_list_is_not_found<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = setup(factory).await?;
    match s.get_list("ghost").await {
        Err(err @ StoreError::ListNotFound { .. }) => {
            let msg = err.to_string();
            if msg != "list id: \"ghost\" not found" {
                return Err(format!("unexpected message: {}", msg));
            }
            Ok(())
        }
        other => Err(format!("expected ListNotFound, got {:?}", other)),
    }
}

/// Updating name leaves description untouched and bumps version.
async fn update_changes_only_supplied_fields<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = setup(factory).await?;
    let created = s
        .create_list(make_list_request(Some("l1")))
        .await
        .map_err(|e| e.to_string())?;

    let updated = s
        .update_list(UpdateListRequest {
            id: "l1".to_string(),
            name: Some("new name".to_string()),
            description: None,
        })
        .await
        .map_err(|e| e.to_string())?;

    if updated.name != "new name" {
        return Err(format!("expected name \"new name\", got \"{}\"", updated.name));
    }
    if updated.description != created.description {
        return Err("description changed without being supplied".to_string());
    }
    if updated.version != created.version + 1 {
        return Err(format!(
            "expected version {}, got {}",
            created.version + 1,
            updated.version
        ));
    }
    if updated.created_at != created.created_at {
        return Err("created_at changed on update".to_string());
    }
    Ok(())
}

/// update_list on an unknown id yields ListNotFound.
async fn update_unknown_list_is_not_found<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = setup(factory).await?;
    match s
        .update_list(UpdateListRequest {
            id: "ghost".to_string(),
            name: Some("x".to_string()),
            description: None,
        })
        .await
    {
        Err(StoreError::ListNotFound { id }) if id == "ghost" => Ok(()),
        other => Err(format!("expected ListNotFound, got {:?}", other)),
    }
}

/// delete_list returns the deleted record; a second lookup misses.
async fn delete_returns_record_and_removes<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = setup(factory).await?;
    let created = s
        .create_list(make_list_request(Some("l1")))
        .await
        .map_err(|e| e.to_string())?;

    let deleted = s.delete_list("l1").await.map_err(|e| e.to_string())?;
    if deleted != created {
        return Err("deleted record differs from created record".to_string());
    }
    if !matches!(s.get_list("l1").await, Err(StoreError::ListNotFound { .. })) {
        return Err("list still present after delete".to_string());
    }
    Ok(())
}
