//! Conformance test suite for `ListStore` implementations.
//!
//! This module provides a backend-agnostic test suite that any `ListStore`
//! implementation can run to verify correctness. The suite covers:
//!
//! - **Index lifecycle**: provisioning, duplicate detection, teardown
//! - **List CRUD**: id generation, server metadata, partial update, delete
//! - **Item CRUD**: parent-list binding, value update, not-found contract
//!
//! # Usage
//!
//! Backend crates call [`run_conformance_suite`] with a factory function that
//! creates a fresh, empty storage instance for each test:
//!
//! ```ignore
//! use vlist_storage::conformance::run_conformance_suite;
//! use vlist_storage::MemoryStore;
//!
//! #[tokio::test]
//! async fn memory_conformance() {
//!     let report = run_conformance_suite(|| async { MemoryStore::new() }).await;
//!     assert!(report.failed == 0, "{report}");
//! }
//! ```

mod index;
mod items;
mod lists;

use std::fmt;
use std::future::Future;

use vlist_core::{CreateListItemRequest, CreateListRequest, ListType};

use crate::ListStore;

/// Result of a single conformance test.
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Test category (e.g. "index", "lists", "items").
    pub category: String,
    /// Test name (e.g. "update_unknown_item_is_not_found").
    pub name: String,
    /// Whether the test passed.
    pub passed: bool,
    /// Error message if the test failed.
    pub message: Option<String>,
}

impl TestResult {
    fn from_result(category: &str, name: &str, result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self {
                category: category.to_string(),
                name: name.to_string(),
                passed: true,
                message: None,
            },
            Err(msg) => Self {
                category: category.to_string(),
                name: name.to_string(),
                passed: false,
                message: Some(msg),
            },
        }
    }
}

/// Aggregated report from a full conformance suite run.
#[derive(Debug, Clone)]
pub struct ConformanceReport {
    pub results: Vec<TestResult>,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Conformance: {}/{} passed ({} failed)",
            self.passed, self.total, self.failed
        )?;
        for r in &self.results {
            if !r.passed {
                writeln!(
                    f,
                    "  FAIL [{}/{}]: {}",
                    r.category,
                    r.name,
                    r.message.as_deref().unwrap_or("(no message)")
                )?;
            }
        }
        Ok(())
    }
}

/// Run the full conformance suite against a storage backend.
///
/// The `factory` function is called once per test to create a fresh, empty
/// storage instance (no index provisioned), ensuring test isolation.
pub async fn run_conformance_suite<S, F, Fut>(factory: F) -> ConformanceReport
where
    S: ListStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.extend(index::run_index_tests(&factory).await);
    results.extend(lists::run_list_tests(&factory).await);
    results.extend(items::run_item_tests(&factory).await);

    let passed = results.iter().filter(|r| r.passed).count();
    let total = results.len();

    ConformanceReport {
        results,
        passed,
        failed: total - passed,
        total,
    }
}

// ── Helpers: request constructors with sensible defaults ─────────────────────

fn make_list_request(id: Option<&str>) -> CreateListRequest {
    CreateListRequest {
        id: id.map(String::from),
        name: "some name".to_string(),
        description: "some description".to_string(),
        list_type: ListType::Ip,
    }
}

fn make_item_request(id: Option<&str>, list_id: &str) -> CreateListItemRequest {
    CreateListItemRequest {
        id: id.map(String::from),
        list_id: list_id.to_string(),
        value: "127.0.0.1".to_string(),
    }
}
