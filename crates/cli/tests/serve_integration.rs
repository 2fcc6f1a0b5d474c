//! Integration tests for the `vlist serve` HTTP API.
//!
//! Each test starts the server as a child process on a unique port,
//! makes HTTP requests, and verifies the responses.

use std::io::Read;
use std::net::TcpStream;
use std::process::{Child, Command};
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

/// Atomic port counter to avoid port conflicts between parallel tests.
/// Base port is derived from process ID so parallel `cargo test --workspace`
/// runs (separate test binaries) don't collide on the same port range.
static NEXT_PORT: AtomicU16 = AtomicU16::new(0);
static PORT_INIT: std::sync::Once = std::sync::Once::new();

fn next_port() -> u16 {
    PORT_INIT.call_once(|| {
        let base = 21000 + (std::process::id() as u16 % 20000);
        NEXT_PORT.store(base, Ordering::SeqCst);
    });
    NEXT_PORT.fetch_add(1, Ordering::SeqCst)
}

/// Helper: start the vlist serve process on the given port.
///
/// `create_index` pre-provisions the lists index, which most tests want.
fn start_server(port: u16, create_index: bool) -> Child {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_vlist"));
    cmd.arg("serve").arg("--port").arg(port.to_string());
    if create_index {
        cmd.arg("--create-index");
    }
    // Redirect stdout/stderr to avoid blocking
    cmd.stdout(std::process::Stdio::piped());
    cmd.stderr(std::process::Stdio::piped());

    let child = cmd.spawn().expect("failed to start vlist serve");
    // Wait for server to be ready by polling the port
    for _ in 0..50 {
        if TcpStream::connect(format!("127.0.0.1:{}", port)).is_ok() {
            return child;
        }
        std::thread::sleep(Duration::from_millis(100));
    }
    child
}

/// Helper: make an HTTP request and return (status, body).
///
/// `headers` are appended verbatim; `body` (if any) is sent as JSON.
fn http_request(
    port: u16,
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    body: Option<&str>,
) -> (u16, String) {
    let mut stream = TcpStream::connect(format!("127.0.0.1:{}", port)).expect("failed to connect");
    stream
        .set_read_timeout(Some(Duration::from_secs(10)))
        .unwrap();

    let mut header_lines = String::new();
    for (name, value) in headers {
        header_lines.push_str(&format!("{}: {}\r\n", name, value));
    }

    let request = match body {
        Some(b) => format!(
            "{} {} HTTP/1.1\r\nHost: localhost:{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n{}",
            method, path, port, b.len(), header_lines, b
        ),
        None => format!(
            "{} {} HTTP/1.1\r\nHost: localhost:{}\r\n{}Connection: close\r\n\r\n",
            method, path, port, header_lines
        ),
    };
    std::io::Write::write_all(&mut stream, request.as_bytes()).expect("failed to write");

    let mut response = String::new();
    let _ = stream.read_to_string(&mut response);

    parse_http_response(&response)
}

/// Shorthands. Mutating calls carry the kbn-xsrf header the API requires.
fn http_get(port: u16, path: &str) -> (u16, String) {
    http_request(port, "GET", path, &[], None)
}

fn http_post(port: u16, path: &str, body: &str) -> (u16, String) {
    http_request(port, "POST", path, &[("kbn-xsrf", "true")], Some(body))
}

fn http_put(port: u16, path: &str, body: &str) -> (u16, String) {
    http_request(port, "PUT", path, &[("kbn-xsrf", "true")], Some(body))
}

fn http_delete(port: u16, path: &str) -> (u16, String) {
    http_request(port, "DELETE", path, &[("kbn-xsrf", "true")], None)
}

/// Parse an HTTP response into (status_code, body).
fn parse_http_response(response: &str) -> (u16, String) {
    let parts: Vec<&str> = response.splitn(2, "\r\n\r\n").collect();
    let headers = parts.first().unwrap_or(&"").to_string();
    let body = parts.get(1).unwrap_or(&"").to_string();

    let status_line = headers.lines().next().unwrap_or("");
    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(0);

    // Handle chunked transfer encoding
    let body = if headers.contains("Transfer-Encoding: chunked") {
        decode_chunked(&body)
    } else {
        body
    };

    (status, body)
}

/// Decode chunked transfer encoding.
fn decode_chunked(data: &str) -> String {
    let mut result = String::new();
    let mut remaining = data;

    while let Some(line_end) = remaining.find("\r\n") {
        let size_str = &remaining[..line_end];
        let size = match usize::from_str_radix(size_str.trim(), 16) {
            Ok(s) => s,
            Err(_) => break,
        };
        if size == 0 {
            break;
        }
        let chunk_start = line_end + 2;
        let chunk_end = chunk_start + size;
        if chunk_end > remaining.len() {
            // Partial chunk, take what we have
            result.push_str(&remaining[chunk_start..]);
            break;
        }
        result.push_str(&remaining[chunk_start..chunk_end]);
        // Skip past chunk data + \r\n
        remaining = if chunk_end + 2 <= remaining.len() {
            &remaining[chunk_end + 2..]
        } else {
            ""
        };
    }

    result
}

/// Minimal list creation body, explicit id.
fn minimal_list_body() -> String {
    serde_json::json!({
        "id": "some-list-id",
        "name": "some name",
        "description": "some description",
        "type": "ip",
    })
    .to_string()
}

/// Minimal list item creation body, explicit id.
fn minimal_item_body() -> String {
    serde_json::json!({
        "id": "some-list-item-id",
        "list_id": "some-list-id",
        "value": "127.0.0.1",
    })
    .to_string()
}

/// Strip server-generated fields before equality comparison.
fn remove_server_generated(mut body: serde_json::Value) -> serde_json::Value {
    if let Some(obj) = body.as_object_mut() {
        for key in ["created_at", "updated_at", "tie_breaker_id", "version"] {
            obj.remove(key);
        }
    }
    body
}

#[test]
fn health_returns_200_with_version() {
    let port = next_port();
    let mut child = start_server(port, false);

    let (status, body) = http_get(port, "/health");
    child.kill().ok();
    child.wait().ok();

    assert_eq!(status, 200);
    let json: serde_json::Value = serde_json::from_str(&body).expect("valid JSON");
    assert_eq!(json["status"], "ok");
    assert!(
        json.get("version").is_some(),
        "version field must be present"
    );
}

#[test]
fn index_lifecycle_create_status_delete() {
    let port = next_port();
    let mut child = start_server(port, false);

    // Absent before creation
    let (status, body) = http_get(port, "/api/lists/index");
    assert_eq!(status, 404, "body: {}", body);
    let json: serde_json::Value = serde_json::from_str(&body).expect("valid JSON");
    assert_eq!(json["message"], "list index does not exist");

    // Create
    let (status, body) = http_post(port, "/api/lists/index", "");
    assert_eq!(status, 200, "body: {}", body);
    let json: serde_json::Value = serde_json::from_str(&body).expect("valid JSON");
    assert_eq!(json["acknowledged"], true);

    // Status shows both index flags
    let (status, body) = http_get(port, "/api/lists/index");
    assert_eq!(status, 200, "body: {}", body);
    let json: serde_json::Value = serde_json::from_str(&body).expect("valid JSON");
    assert_eq!(json["list_index"], true);
    assert_eq!(json["list_item_index"], true);

    // Second create conflicts
    let (status, body) = http_post(port, "/api/lists/index", "");
    assert_eq!(status, 409, "body: {}", body);
    let json: serde_json::Value = serde_json::from_str(&body).expect("valid JSON");
    assert_eq!(json["message"], "list index already exists");

    // Delete, then delete again misses
    let (status, _) = http_delete(port, "/api/lists/index");
    assert_eq!(status, 200);
    let (status, body) = http_delete(port, "/api/lists/index");

    child.kill().ok();
    child.wait().ok();

    assert_eq!(status, 404, "body: {}", body);
    let json: serde_json::Value = serde_json::from_str(&body).expect("valid JSON");
    assert_eq!(
        json,
        serde_json::json!({
            "status_code": 404,
            "message": "list index does not exist",
        })
    );
}

#[test]
fn mutations_require_xsrf_header() {
    let port = next_port();
    let mut child = start_server(port, true);

    // POST without the header is rejected before routing
    let (status, body) = http_request(port, "POST", "/api/lists", &[], Some(&minimal_list_body()));
    assert_eq!(status, 400, "body: {}", body);
    let json: serde_json::Value = serde_json::from_str(&body).expect("valid JSON");
    assert_eq!(
        json,
        serde_json::json!({
            "status_code": 400,
            "message": "Request must contain a kbn-xsrf header",
        })
    );

    // GET is exempt
    let (status, _) = http_request(port, "GET", "/api/lists/index", &[], None);

    child.kill().ok();
    child.wait().ok();

    assert_eq!(status, 200);
}

#[test]
fn operations_before_index_creation_return_400() {
    let port = next_port();
    let mut child = start_server(port, false);

    let (status, body) = http_post(port, "/api/lists", &minimal_list_body());

    child.kill().ok();
    child.wait().ok();

    assert_eq!(status, 400, "body: {}", body);
    let json: serde_json::Value = serde_json::from_str(&body).expect("valid JSON");
    assert_eq!(json["message"], "list index does not exist");
}

#[test]
fn update_list_item_value_with_explicit_id() {
    let port = next_port();
    let mut child = start_server(port, true);

    // create a simple list
    let (status, body) = http_post(port, "/api/lists", &minimal_list_body());
    assert_eq!(status, 200, "list create failed, body: {}", body);

    // create a simple list item
    let (status, body) = http_post(port, "/api/lists/items", &minimal_item_body());
    assert_eq!(status, 200, "item create failed, body: {}", body);

    // update the item's value
    let update = serde_json::json!({
        "id": "some-list-item-id",
        "value": "192.168.0.2",
    })
    .to_string();
    let (status, body) = http_put(port, "/api/lists/items", &update);

    child.kill().ok();
    child.wait().ok();

    assert_eq!(status, 200, "update failed, body: {}", body);
    let json: serde_json::Value = serde_json::from_str(&body).expect("valid JSON");
    assert_eq!(
        remove_server_generated(json),
        serde_json::json!({
            "id": "some-list-item-id",
            "list_id": "some-list-id",
            "type": "ip",
            "value": "192.168.0.2",
            "created_by": "vlist",
            "updated_by": "vlist",
        })
    );
}

#[test]
fn update_list_item_with_auto_generated_ids() {
    let port = next_port();
    let mut child = start_server(port, true);

    // create a list with no id, capturing the generated one
    let list_body = serde_json::json!({
        "name": "some name",
        "description": "some description",
        "type": "ip",
    })
    .to_string();
    let (status, body) = http_post(port, "/api/lists", &list_body);
    assert_eq!(status, 200, "list create failed, body: {}", body);
    let list: serde_json::Value = serde_json::from_str(&body).expect("valid JSON");
    let list_id = list["id"].as_str().expect("list id").to_string();
    assert_eq!(list_id.len(), 32, "generated list id should be 32 hex chars");

    // create an item with no id against the generated list id
    let item_body = serde_json::json!({
        "list_id": list_id,
        "value": "127.0.0.1",
    })
    .to_string();
    let (status, body) = http_post(port, "/api/lists/items", &item_body);
    assert_eq!(status, 200, "item create failed, body: {}", body);
    let item: serde_json::Value = serde_json::from_str(&body).expect("valid JSON");
    let item_id = item["id"].as_str().expect("item id").to_string();

    // update through the generated item id
    let update = serde_json::json!({
        "id": item_id,
        "value": "192.168.0.2",
    })
    .to_string();
    let (status, body) = http_put(port, "/api/lists/items", &update);

    child.kill().ok();
    child.wait().ok();

    assert_eq!(status, 200, "update failed, body: {}", body);
    let json: serde_json::Value = serde_json::from_str(&body).expect("valid JSON");
    assert_eq!(
        remove_server_generated(json),
        serde_json::json!({
            "id": item_id,
            "list_id": list_id,
            "type": "ip",
            "value": "192.168.0.2",
            "created_by": "vlist",
            "updated_by": "vlist",
        })
    );
}

#[test]
fn update_list_changes_only_supplied_fields() {
    let port = next_port();
    let mut child = start_server(port, true);

    let (status, _) = http_post(port, "/api/lists", &minimal_list_body());
    assert_eq!(status, 200);

    let update = serde_json::json!({
        "id": "some-list-id",
        "name": "new name",
    })
    .to_string();
    let (status, body) = http_put(port, "/api/lists", &update);

    child.kill().ok();
    child.wait().ok();

    assert_eq!(status, 200, "update failed, body: {}", body);
    let json: serde_json::Value = serde_json::from_str(&body).expect("valid JSON");
    assert_eq!(json["name"], "new name");
    assert_eq!(json["description"], "some description");
    assert_eq!(json["version"], 2);
}

#[test]
fn update_with_unknown_item_id_returns_404() {
    let port = next_port();
    let mut child = start_server(port, true);

    let (status, body) = http_post(port, "/api/lists", &minimal_list_body());
    assert_eq!(status, 200, "list create failed, body: {}", body);
    let (status, body) = http_post(port, "/api/lists/items", &minimal_item_body());
    assert_eq!(status, 200, "item create failed, body: {}", body);

    let update = serde_json::json!({
        "id": "some-other-id",
        "value": "192.168.0.2",
    })
    .to_string();
    let (status, body) = http_put(port, "/api/lists/items", &update);

    child.kill().ok();
    child.wait().ok();

    assert_eq!(status, 404, "body: {}", body);
    let json: serde_json::Value = serde_json::from_str(&body).expect("valid JSON");
    assert_eq!(
        json,
        serde_json::json!({
            "status_code": 404,
            "message": "list item id: \"some-other-id\" not found",
        })
    );
}

#[test]
fn failed_update_does_not_mutate_existing_item() {
    let port = next_port();
    let mut child = start_server(port, true);

    let (status, _) = http_post(port, "/api/lists", &minimal_list_body());
    assert_eq!(status, 200);
    let (status, _) = http_post(port, "/api/lists/items", &minimal_item_body());
    assert_eq!(status, 200);

    let update = serde_json::json!({
        "id": "some-other-id",
        "value": "192.168.0.2",
    })
    .to_string();
    let (status, _) = http_put(port, "/api/lists/items", &update);
    assert_eq!(status, 404);

    let (status, body) = http_get(port, "/api/lists/items?id=some-list-item-id");

    child.kill().ok();
    child.wait().ok();

    assert_eq!(status, 200, "body: {}", body);
    let json: serde_json::Value = serde_json::from_str(&body).expect("valid JSON");
    assert_eq!(json["value"], "127.0.0.1");
    assert_eq!(json["version"], 1);
}

#[test]
fn repeated_update_with_same_value_is_idempotent() {
    let port = next_port();
    let mut child = start_server(port, true);

    let (status, _) = http_post(port, "/api/lists", &minimal_list_body());
    assert_eq!(status, 200);
    let (status, _) = http_post(port, "/api/lists/items", &minimal_item_body());
    assert_eq!(status, 200);

    let update = serde_json::json!({
        "id": "some-list-item-id",
        "value": "192.168.0.2",
    })
    .to_string();
    let (status, first) = http_put(port, "/api/lists/items", &update);
    assert_eq!(status, 200, "first update failed, body: {}", first);
    let (status, second) = http_put(port, "/api/lists/items", &update);

    child.kill().ok();
    child.wait().ok();

    assert_eq!(status, 200, "second update failed, body: {}", second);
    let first: serde_json::Value = serde_json::from_str(&first).expect("valid JSON");
    let second: serde_json::Value = serde_json::from_str(&second).expect("valid JSON");
    assert_eq!(
        remove_server_generated(first),
        remove_server_generated(second)
    );
}

#[test]
fn create_item_for_missing_list_returns_404() {
    let port = next_port();
    let mut child = start_server(port, true);

    let item_body = serde_json::json!({
        "list_id": "no-such-list",
        "value": "127.0.0.1",
    })
    .to_string();
    let (status, body) = http_post(port, "/api/lists/items", &item_body);

    child.kill().ok();
    child.wait().ok();

    assert_eq!(status, 404, "body: {}", body);
    let json: serde_json::Value = serde_json::from_str(&body).expect("valid JSON");
    assert_eq!(json["message"], "list id: \"no-such-list\" does not exist");
}

#[test]
fn duplicate_item_id_returns_409() {
    let port = next_port();
    let mut child = start_server(port, true);

    let (status, _) = http_post(port, "/api/lists", &minimal_list_body());
    assert_eq!(status, 200);
    let (status, _) = http_post(port, "/api/lists/items", &minimal_item_body());
    assert_eq!(status, 200);
    let (status, body) = http_post(port, "/api/lists/items", &minimal_item_body());

    child.kill().ok();
    child.wait().ok();

    assert_eq!(status, 409, "body: {}", body);
    let json: serde_json::Value = serde_json::from_str(&body).expect("valid JSON");
    assert_eq!(
        json["message"],
        "list item id: \"some-list-item-id\" already exists"
    );
}

#[test]
fn deleting_list_removes_its_items() {
    let port = next_port();
    let mut child = start_server(port, true);

    let (status, _) = http_post(port, "/api/lists", &minimal_list_body());
    assert_eq!(status, 200);
    let (status, _) = http_post(port, "/api/lists/items", &minimal_item_body());
    assert_eq!(status, 200);

    let (status, body) = http_delete(port, "/api/lists?id=some-list-id");
    assert_eq!(status, 200, "list delete failed, body: {}", body);
    let json: serde_json::Value = serde_json::from_str(&body).expect("valid JSON");
    assert_eq!(json["id"], "some-list-id");

    let (status, body) = http_get(port, "/api/lists/items?id=some-list-item-id");

    child.kill().ok();
    child.wait().ok();

    assert_eq!(status, 404, "body: {}", body);
    let json: serde_json::Value = serde_json::from_str(&body).expect("valid JSON");
    assert_eq!(
        json["message"],
        "list item id: \"some-list-item-id\" not found"
    );
}

#[test]
fn index_teardown_resets_state() {
    let port = next_port();
    let mut child = start_server(port, true);

    let (status, _) = http_post(port, "/api/lists", &minimal_list_body());
    assert_eq!(status, 200);

    // Tear down and re-provision: nothing survives
    let (status, _) = http_delete(port, "/api/lists/index");
    assert_eq!(status, 200);
    let (status, _) = http_post(port, "/api/lists/index", "");
    assert_eq!(status, 200);

    let (status, body) = http_get(port, "/api/lists?id=some-list-id");

    child.kill().ok();
    child.wait().ok();

    assert_eq!(status, 404, "body: {}", body);
    let json: serde_json::Value = serde_json::from_str(&body).expect("valid JSON");
    assert_eq!(json["message"], "list id: \"some-list-id\" not found");
}

#[test]
fn unmatched_route_returns_404() {
    let port = next_port();
    let mut child = start_server(port, false);

    let (status, body) = http_get(port, "/nonexistent");

    child.kill().ok();
    child.wait().ok();

    assert_eq!(status, 404);
    let json: serde_json::Value = serde_json::from_str(&body).expect("valid JSON");
    assert_eq!(
        json,
        serde_json::json!({
            "status_code": 404,
            "message": "not found",
        })
    );
}
