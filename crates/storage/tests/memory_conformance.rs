//! Runs the backend-agnostic conformance suite against the in-memory store.

use vlist_storage::conformance::run_conformance_suite;
use vlist_storage::MemoryStore;

#[tokio::test]
async fn memory_store_passes_conformance_suite() {
    let report = run_conformance_suite(|| async { MemoryStore::new() }).await;
    assert!(report.failed == 0, "{report}");
}
