//! In-process task server fixture
//!
//! A small axum app that stands in for the real task-board backend:
//! bearer auth with one seeded account, tasks held in memory, and a
//! switch that makes status updates fail so the client's rollback path
//! can be exercised. It speaks the same JSON dialect as the backend
//! the runtime client talks to, down to the `{"error": ...}` bodies
//! and offset-less ISO timestamps.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use taskdeck::api::ApiClient;

pub const USERNAME: &str = "maria";
pub const PASSWORD: &str = "secret";
pub const TOKEN: &str = "fixture-token-1";

type SharedState = Arc<Mutex<ServerState>>;

pub struct TestServer {
    pub base_url: String,
    state: SharedState,
}

struct ServerState {
    tasks: Vec<Value>,
    users: Vec<Value>,
    logins: HashMap<String, String>,
    next_id: i64,
    fail_status_updates: bool,
}

impl TestServer {
    pub async fn spawn() -> Self {
        Self::spawn_with_tasks(Vec::new()).await
    }

    pub async fn spawn_with_tasks(tasks: Vec<Value>) -> Self {
        let state = Arc::new(Mutex::new(ServerState {
            tasks,
            users: seed_users(),
            logins: HashMap::from([(USERNAME.to_string(), PASSWORD.to_string())]),
            next_id: 100,
            fail_status_updates: false,
        }));

        let app = Router::new()
            .route("/api/health", get(health))
            .route("/api/auth/login", post(login))
            .route("/api/auth/register", post(register))
            .route("/api/tasks", get(list_tasks).post(create_task))
            .route(
                "/api/tasks/{id}",
                get(get_task).put(update_task).delete(delete_task),
            )
            .route("/api/tasks/{id}/status", patch(update_status))
            .route("/api/users", get(list_users))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// Make every PATCH /api/tasks/{id}/status answer 500 until reset.
    pub fn set_fail_status_updates(&self, fail: bool) {
        self.state.lock().unwrap().fail_status_updates = fail;
    }

    pub fn task_count(&self) -> usize {
        self.state.lock().unwrap().tasks.len()
    }

    /// Status of a task as the server currently stores it.
    pub fn task_status(&self, id: i64) -> Option<String> {
        let state = self.state.lock().unwrap();
        state
            .tasks
            .iter()
            .find(|t| t["id"] == id)
            .map(|t| t["status"].as_str().unwrap().to_string())
    }
}

/// Log in with the seeded account and return a client carrying the token.
pub async fn authed_client(server: &TestServer) -> ApiClient {
    let client = ApiClient::new(&server.base_url).unwrap();
    let response = client.login(USERNAME, PASSWORD).await.unwrap();
    client.with_token(&response.access_token)
}

/// A task JSON body in the server's wire shape.
pub fn make_task(id: i64, title: &str, status: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "status": status,
        "priority": "medium",
        "due_date": null,
        "assigned_to": null,
        "created_by": null,
        "created_at": "2026-08-20T10:00:00",
        "updated_at": "2026-08-20T10:00:00"
    })
}

fn seed_users() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "username": "maria",
            "email": "maria@example.com",
            "full_name": "Maria Petrova",
            "created_at": "2026-08-01T09:00:00"
        }),
        json!({
            "id": 2,
            "username": "lee",
            "email": "lee@example.com",
            "full_name": "Lee Chen",
            "created_at": "2026-08-02T10:30:00"
        }),
    ]
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Task not found")
}

fn check_auth(headers: &HeaderMap) -> Result<(), Response> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if value == format!("Bearer {TOKEN}") {
        Ok(())
    } else {
        Err(error_response(StatusCode::UNAUTHORIZED, "Token is missing"))
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn login(State(state): State<SharedState>, Json(body): Json<Value>) -> Response {
    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let state = state.lock().unwrap();
    if state.logins.get(username).map(String::as_str) != Some(password) {
        return error_response(StatusCode::UNAUTHORIZED, "Invalid username or password");
    }
    let user = state
        .users
        .iter()
        .find(|u| u["username"] == username)
        .cloned()
        .unwrap();
    Json(json!({ "access_token": TOKEN, "user": user })).into_response()
}

async fn register(State(state): State<SharedState>, Json(body): Json<Value>) -> Response {
    let username = body["username"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();
    if username.is_empty() || password.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Missing required fields");
    }

    let mut state = state.lock().unwrap();
    if state.logins.contains_key(&username) {
        return error_response(StatusCode::BAD_REQUEST, "Username already exists");
    }

    let id = state.next_id;
    state.next_id += 1;
    let user = json!({
        "id": id,
        "username": username,
        "email": body["email"],
        "full_name": body["full_name"],
        "created_at": "2026-08-20T11:00:00"
    });
    state.users.push(user);
    state.logins.insert(username, password);
    (
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    )
        .into_response()
}

async fn list_tasks(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if let Err(resp) = check_auth(&headers) {
        return resp;
    }
    let tasks = state.lock().unwrap().tasks.clone();
    Json(tasks).into_response()
}

async fn create_task(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = check_auth(&headers) {
        return resp;
    }

    let title = body["title"].as_str().unwrap_or_default().trim().to_string();
    if title.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Title is required");
    }

    let mut state = state.lock().unwrap();
    let id = state.next_id;
    state.next_id += 1;
    let task = build_task(&state, id, &title, &body);
    state.tasks.push(task.clone());
    (StatusCode::CREATED, Json(task)).into_response()
}

async fn get_task(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if let Err(resp) = check_auth(&headers) {
        return resp;
    }
    let state = state.lock().unwrap();
    match state.tasks.iter().find(|t| t["id"] == id) {
        Some(task) => Json(task.clone()).into_response(),
        None => not_found(),
    }
}

async fn update_task(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = check_auth(&headers) {
        return resp;
    }

    let title = body["title"].as_str().unwrap_or_default().trim().to_string();
    if title.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Title is required");
    }

    let mut state = state.lock().unwrap();
    let Some(index) = state.tasks.iter().position(|t| t["id"] == id) else {
        return not_found();
    };
    let mut task = build_task(&state, id, &title, &body);
    task["created_at"] = state.tasks[index]["created_at"].clone();
    task["updated_at"] = json!("2026-08-20T12:00:00");
    state.tasks[index] = task.clone();
    Json(task).into_response()
}

async fn update_status(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = check_auth(&headers) {
        return resp;
    }

    let mut state = state.lock().unwrap();
    if state.fail_status_updates {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Database error");
    }

    let Some(status) = body.get("status").and_then(Value::as_str).map(String::from) else {
        return error_response(StatusCode::BAD_REQUEST, "Status is required");
    };
    if !["backlog", "todo", "in_progress", "done"].contains(&status.as_str()) {
        return error_response(StatusCode::BAD_REQUEST, "Invalid status");
    }

    let Some(task) = state.tasks.iter_mut().find(|t| t["id"] == id) else {
        return not_found();
    };
    task["status"] = json!(status);
    task["updated_at"] = json!("2026-08-20T12:30:00");
    Json(task.clone()).into_response()
}

async fn delete_task(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if let Err(resp) = check_auth(&headers) {
        return resp;
    }
    let mut state = state.lock().unwrap();
    let before = state.tasks.len();
    state.tasks.retain(|t| t["id"] != id);
    if state.tasks.len() == before {
        return not_found();
    }
    Json(json!({ "message": "Task deleted successfully" })).into_response()
}

async fn list_users(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if let Err(resp) = check_auth(&headers) {
        return resp;
    }
    Json(state.lock().unwrap().users.clone()).into_response()
}

fn build_task(state: &ServerState, id: i64, title: &str, body: &Value) -> Value {
    let assigned_to = match body.get("assigned_to").and_then(Value::as_i64) {
        Some(user_id) => state
            .users
            .iter()
            .find(|u| u["id"] == user_id)
            .cloned()
            .unwrap_or(Value::Null),
        None => Value::Null,
    };
    json!({
        "id": id,
        "title": title,
        "description": body.get("description").cloned().unwrap_or(Value::Null),
        "status": body.get("status").and_then(Value::as_str).unwrap_or("backlog"),
        "priority": body.get("priority").and_then(Value::as_str).unwrap_or("medium"),
        "due_date": body.get("due_date").cloned().unwrap_or(Value::Null),
        "assigned_to": assigned_to,
        "created_by": state.users[0].clone(),
        "created_at": "2026-08-20T10:00:00",
        "updated_at": "2026-08-20T10:00:00"
    })
}
