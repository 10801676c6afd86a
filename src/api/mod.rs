//! HTTP client for the task-board server
//!
//! One method per server endpoint. The client is a cheap-to-clone value;
//! `with_token` produces an authenticated copy, so a login yields a new
//! client rather than mutating shared state.

mod error;

pub use error::{ApiError, Result};

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::task::{Status, Task, TaskPayload, User};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterPayload {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct StatusRequest {
    status: Status,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("taskdeck")
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Returns a copy of this client that sends `Authorization: Bearer`.
    pub fn with_token(&self, token: &str) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token: Some(token.to_string()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), &body));
        }
        Ok(response.json().await?)
    }

    async fn read_ok(response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), &body));
        }
        Ok(())
    }

    pub async fn health(&self) -> Result<()> {
        let response = self.request(Method::GET, "/api/health").send().await?;
        Self::read_ok(response).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let response = self
            .request(Method::POST, "/api/auth/login")
            .json(&LoginRequest { username, password })
            .send()
            .await?;
        Self::read_json(response).await
    }

    pub async fn register(&self, payload: &RegisterPayload) -> Result<()> {
        let response = self
            .request(Method::POST, "/api/auth/register")
            .json(payload)
            .send()
            .await?;
        Self::read_ok(response).await
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        let response = self.request(Method::GET, "/api/tasks").send().await?;
        Self::read_json(response).await
    }

    pub async fn get_task(&self, id: i64) -> Result<Task> {
        let response = self
            .request(Method::GET, &format!("/api/tasks/{id}"))
            .send()
            .await?;
        Self::read_json(response).await
    }

    pub async fn create_task(&self, payload: &TaskPayload) -> Result<Task> {
        let response = self
            .request(Method::POST, "/api/tasks")
            .json(payload)
            .send()
            .await?;
        Self::read_json(response).await
    }

    pub async fn update_task(&self, id: i64, payload: &TaskPayload) -> Result<Task> {
        let response = self
            .request(Method::PUT, &format!("/api/tasks/{id}"))
            .json(payload)
            .send()
            .await?;
        Self::read_json(response).await
    }

    /// Partial update used by the board's drag-and-drop sync.
    pub async fn update_task_status(&self, id: i64, status: Status) -> Result<Task> {
        let response = self
            .request(Method::PATCH, &format!("/api/tasks/{id}/status"))
            .json(&StatusRequest { status })
            .send()
            .await?;
        Self::read_json(response).await
    }

    pub async fn delete_task(&self, id: i64) -> Result<()> {
        let response = self
            .request(Method::DELETE, &format!("/api/tasks/{id}"))
            .send()
            .await?;
        Self::read_ok(response).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        let response = self.request(Method::GET, "/api/users").send().await?;
        Self::read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_stripped() {
        let client = ApiClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_bare_url_unchanged() {
        let client = ApiClient::new("http://localhost:5000").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_with_token_preserves_base_url() {
        let client = ApiClient::new("http://example.com/api/").unwrap();
        let authed = client.with_token("abc123");
        assert_eq!(authed.base_url(), "http://example.com/api");
        assert!(authed.token.is_some());
        // The original stays unauthenticated.
        assert!(client.token.is_none());
    }

    #[test]
    fn test_login_request_shape() {
        let body = serde_json::to_value(LoginRequest {
            username: "maria",
            password: "hunter2",
        })
        .unwrap();
        assert_eq!(body["username"], "maria");
        assert_eq!(body["password"], "hunter2");
    }

    #[test]
    fn test_status_request_uses_wire_name() {
        let body = serde_json::to_value(StatusRequest {
            status: Status::InProgress,
        })
        .unwrap();
        assert_eq!(body["status"], "in_progress");
    }
}
