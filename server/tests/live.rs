//! End-to-end lifecycle over real HTTP.
//!
//! Starts the server on a random port backed by an in-memory database and
//! drives it with ureq, so routing, body handling and status lines are
//! exercised exactly as a client sees them.

use std::sync::Arc;

use serde_json::Value;
use task_server::{db, AppState, SqliteTaskRepository};

struct Response {
    status: u16,
    body: String,
}

impl Response {
    fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Returns 4xx/5xx as data instead of `Err` so the test can assert on them.
fn execute(method: &str, url: &str, body: Option<&str>) -> Response {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match (method, body) {
        ("GET", _) => agent.get(url).call(),
        ("DELETE", _) => agent.delete(url).call(),
        ("POST", Some(body)) => agent.post(url).content_type("application/json").send(body.as_bytes()),
        ("PUT", Some(body)) => agent.put(url).content_type("application/json").send(body.as_bytes()),
        other => panic!("unsupported request: {other:?}"),
    }
    .expect("HTTP transport error");

    Response {
        status: response.status().as_u16(),
        body: response.body_mut().read_to_string().unwrap_or_default(),
    }
}

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let pool = db::connect_in_memory().await.unwrap();
            db::init_schema(&pool).await.unwrap();
            let state = AppState::new(Arc::new(SqliteTaskRepository::new(pool)));
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            task_server::run(listener, state).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn crud_lifecycle() {
    let base = start_server();
    let tasks_url = format!("{base}/tasks");

    // Empty at start.
    let resp = execute("GET", &tasks_url, None);
    assert_eq!(resp.status, 200);
    assert_eq!(resp.json(), serde_json::json!([]));

    // Create.
    let resp = execute(
        "POST",
        &tasks_url,
        Some(r#"{"title":"Test Task","description":"Test Description","status":"ToDo"}"#),
    );
    assert_eq!(resp.status, 201);
    let created = resp.json();
    assert_eq!(created["status"], "ToDo");
    let id = created["id"].as_i64().unwrap();
    let task_url = format!("{tasks_url}/{id}");

    // Round-trip through get.
    let resp = execute("GET", &task_url, None);
    assert_eq!(resp.status, 200);
    let fetched = resp.json();
    assert_eq!(fetched["title"], "Test Task");
    assert_eq!(fetched["description"], "Test Description");
    assert_eq!(fetched["status"], "ToDo");

    // Update.
    let resp = execute(
        "PUT",
        &task_url,
        Some(r#"{"title":"Updated Task","description":"Updated Description","status":"Done"}"#),
    );
    assert_eq!(resp.status, 200);
    let updated = resp.json();
    assert_eq!(updated["status"], "Done");
    assert_eq!(updated["id"], id);
    assert_eq!(updated["createdAt"], created["createdAt"]);

    // Delete, then it is gone.
    let resp = execute("DELETE", &task_url, None);
    assert_eq!(resp.status, 204);
    assert!(resp.body.is_empty());

    let resp = execute("GET", &task_url, None);
    assert_eq!(resp.status, 404);
    assert_eq!(resp.json()["error"]["code"], "task_not_found");

    let resp = execute("DELETE", &task_url, None);
    assert_eq!(resp.status, 404);

    // Bad id and bad body.
    let resp = execute("GET", &format!("{tasks_url}/abc"), None);
    assert_eq!(resp.status, 400);
    assert_eq!(resp.json()["error"]["code"], "invalid_request");

    let resp = execute("POST", &tasks_url, Some(r#"{"title":"","description":"D"}"#));
    assert_eq!(resp.status, 400);
    assert_eq!(resp.json()["error"]["code"], "invalid_request");

    let resp = execute("GET", &tasks_url, None);
    assert_eq!(resp.json(), serde_json::json!([]));
}
