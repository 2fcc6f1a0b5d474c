use std::future::Future;

use super::{make_item_request, make_list_request, TestResult};
use crate::{ListStore, StoreError};

pub(super) async fn run_index_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.push(TestResult::from_result(
        "index",
        "index_absent_until_created",
        index_absent_until_created(factory).await,
    ));
    results.push(TestResult::from_result(
        "index",
        "create_index_succeeds",
        create_index_succeeds(factory).await,
    ));
    results.push(TestResult::from_result(
        "index",
        "create_index_twice_conflicts",
        create_index_twice_conflicts(factory).await,
    ));
    results.push(TestResult::from_result(
        "index",
        "delete_index_requires_existing",
        delete_index_requires_existing(factory).await,
    ));
    results.push(TestResult::from_result(
        "index",
        "delete_index_drops_all_data",
        delete_index_drops_all_data(factory).await,
    ));
    results.push(TestResult::from_result(
        "index",
        "operations_require_index",
        operations_require_index(factory).await,
    ));

    results
}

/// A fresh store reports no index.
async fn index_absent_until_created<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let exists = s.index_exists().await.map_err(|e| e.to_string())?;
    if exists {
        return Err("fresh store reported an existing index".to_string());
    }
    Ok(())
}

/// After create_index, index_exists reports true.
async fn create_index_succeeds<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.create_index().await.map_err(|e| e.to_string())?;
    let exists = s.index_exists().await.map_err(|e| e.to_string())?;
    if !exists {
        return Err("index_exists false after create_index".to_string());
    }
    Ok(())
}

/// Creating the index twice yields IndexExists.
async fn create_index_twice_conflicts<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.create_index().await.map_err(|e| e.to_string())?;
    match s.create_index().await {
        Err(StoreError::IndexExists) => Ok(()),
        other => Err(format!("expected IndexExists, got {:?}", other)),
    }
}

/// Deleting a never-created index yields IndexMissing.
async fn delete_index_requires_existing<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    match s.delete_index().await {
        Err(StoreError::IndexMissing) => Ok(()),
        other => Err(format!("expected IndexMissing, got {:?}", other)),
    }
}

/// Data written before delete_index is gone after a create_index cycle.
async fn delete_index_drops_all_data<S, F, Fut>(factory: &F) -> Result<(), String>
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

    s.delete_index().await.map_err(|e| e.to_string())?;
    s.create_index().await.map_err(|e| e.to_string())?;

    if !matches!(s.get_list("l1").await, Err(StoreError::ListNotFound { .. })) {
        return Err("list survived index teardown".to_string());
    }
    if !matches!(
        s.get_list_item("i1").await,
        Err(StoreError::ListItemNotFound { .. })
    ) {
        return Err("list item survived index teardown".to_string());
    }
    Ok(())
}

/// List and item operations fail with IndexMissing before provisioning.
async fn operations_require_index<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;

    if !matches!(
        s.create_list(make_list_request(Some("l1"))).await,
        Err(StoreError::IndexMissing)
    ) {
        return Err("create_list did not require index".to_string());
    }
    if !matches!(
        s.create_list_item(make_item_request(Some("i1"), "l1")).await,
        Err(StoreError::IndexMissing)
    ) {
        return Err("create_list_item did not require index".to_string());
    }
    if !matches!(s.get_list("l1").await, Err(StoreError::IndexMissing)) {
        return Err("get_list did not require index".to_string());
    }
    Ok(())
}
