use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use worknest_types::api::{
    AddCommentRequest, AuthResponse, CreateTaskRequest, CreateUserRequest, DashboardResponse,
    ErrorResponse, LoginRequest, RegisterRequest, TaskResponse, TasksResponse,
    UpdateStatusRequest, UsersResponse,
};
use worknest_types::{Task, TaskStatus, User};

use crate::error::ClientError;

/// Thin typed wrapper over the WorkNest REST API.
///
/// One attempt per call: no retries and no timeouts. Authenticated calls take
/// the header map produced by [`SessionManager::auth_headers`](crate::SessionManager::auth_headers).
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // -- Auth --

    pub async fn login(&self, req: &LoginRequest) -> Result<AuthResponse, ClientError> {
        self.fetch(self.http.post(self.url("/auth/login")).json(req)).await
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        self.fetch(self.http.post(self.url("/auth/register")).json(req)).await
    }

    // -- Dashboard --

    pub async fn admin_dashboard(&self, auth: &HeaderMap) -> Result<DashboardResponse, ClientError> {
        self.fetch(self.get("/dashboard/admin", auth)).await
    }

    /// Scoped to the caller by the token; no user id is sent.
    pub async fn user_dashboard(&self, auth: &HeaderMap) -> Result<DashboardResponse, ClientError> {
        self.fetch(self.get("/dashboard/user", auth)).await
    }

    // -- Users --

    pub async fn list_users(&self, auth: &HeaderMap) -> Result<Vec<User>, ClientError> {
        let body: UsersResponse = self.fetch(self.get("/users", auth)).await?;
        Ok(body.users)
    }

    pub async fn create_user(&self, auth: &HeaderMap, req: &CreateUserRequest) -> Result<(), ClientError> {
        let builder = self.http.post(self.url("/users")).headers(auth.clone()).json(req);
        self.execute(builder).await.map(drop)
    }

    pub async fn delete_user(&self, auth: &HeaderMap, user_id: i64) -> Result<(), ClientError> {
        let builder = self
            .http
            .delete(self.url(&format!("/users/{}", user_id)))
            .headers(auth.clone());
        self.execute(builder).await.map(drop)
    }

    // -- Tasks --

    pub async fn list_tasks(&self, auth: &HeaderMap) -> Result<Vec<Task>, ClientError> {
        let body: TasksResponse = self.fetch(self.get("/tasks", auth)).await?;
        Ok(body.tasks)
    }

    pub async fn my_tasks(&self, auth: &HeaderMap) -> Result<Vec<Task>, ClientError> {
        let body: TasksResponse = self.fetch(self.get("/tasks/my-tasks", auth)).await?;
        Ok(body.tasks)
    }

    pub async fn get_task(&self, auth: &HeaderMap, task_id: i64) -> Result<Task, ClientError> {
        let body: TaskResponse = self.fetch(self.get(&format!("/tasks/{}", task_id), auth)).await?;
        Ok(body.task)
    }

    pub async fn create_task(&self, auth: &HeaderMap, req: &CreateTaskRequest) -> Result<(), ClientError> {
        let builder = self.http.post(self.url("/tasks")).headers(auth.clone()).json(req);
        self.execute(builder).await.map(drop)
    }

    pub async fn delete_task(&self, auth: &HeaderMap, task_id: i64) -> Result<(), ClientError> {
        let builder = self
            .http
            .delete(self.url(&format!("/tasks/{}", task_id)))
            .headers(auth.clone());
        self.execute(builder).await.map(drop)
    }

    pub async fn update_task_status(
        &self,
        auth: &HeaderMap,
        task_id: i64,
        status: TaskStatus,
    ) -> Result<(), ClientError> {
        let builder = self
            .http
            .patch(self.url(&format!("/tasks/{}/status", task_id)))
            .headers(auth.clone())
            .json(&UpdateStatusRequest { status });
        self.execute(builder).await.map(drop)
    }

    pub async fn add_comment(
        &self,
        auth: &HeaderMap,
        task_id: i64,
        comment_text: &str,
    ) -> Result<(), ClientError> {
        let builder = self
            .http
            .post(self.url(&format!("/tasks/{}/comments", task_id)))
            .headers(auth.clone())
            .json(&AddCommentRequest {
                comment_text: comment_text.to_string(),
            });
        self.execute(builder).await.map(drop)
    }

    // -- Plumbing --

    fn get(&self, path: &str, auth: &HeaderMap) -> RequestBuilder {
        self.http.get(self.url(path)).headers(auth.clone())
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let resp = self.execute(builder).await?;
        Ok(resp.json::<T>().await?)
    }

    /// Send once; map non-2xx into [`ClientError::Api`] carrying the server's message.
    async fn execute(&self, builder: RequestBuilder) -> Result<Response, ClientError> {
        let req = builder.build()?;
        let method = req.method().clone();
        let url = req.url().clone();
        debug!("{} {}", method, url);

        let resp = self.http.execute(req).await.map_err(|e| {
            warn!("{} {} failed: {}", method, url, e);
            ClientError::Network(e)
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .ok()
            .and_then(|e| e.message);
        warn!("{} {} returned {}: {}", method, url, status, message.as_deref().unwrap_or(&body));
        Err(ClientError::Api { status, message })
    }
}
