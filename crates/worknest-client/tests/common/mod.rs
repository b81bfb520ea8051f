#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::IntoResponse;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};

use worknest_client::controller::PageContext;
use worknest_client::session::{TOKEN_KEY, USER_KEY};
use worknest_client::{ApiClient, MemoryStorage, PageHost, SessionManager, Storage};

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

impl Recorded {
    pub fn line(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

#[derive(Default)]
struct BackendState {
    routes: Mutex<HashMap<String, (StatusCode, Value)>>,
    requests: Mutex<Vec<Recorded>>,
}

/// In-process stand-in for the WorkNest REST API.
///
/// Responses are keyed by `"METHOD /path"` (path without the `/api` prefix);
/// unknown routes answer 404. Every request is recorded in arrival order.
pub struct FakeBackend {
    pub base_url: String,
    state: Arc<BackendState>,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let state = Arc::new(BackendState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/api", addr),
            state,
        }
    }

    pub fn respond(&self, route: &str, status: u16, body: Value) -> &Self {
        self.state.routes.lock().unwrap().insert(
            route.to_string(),
            (StatusCode::from_u16(status).unwrap(), body),
        );
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.requests().iter().map(Recorded::line).collect()
    }

    pub fn count(&self, line: &str) -> usize {
        self.lines().iter().filter(|l| *l == line).count()
    }

    pub fn api(&self) -> ApiClient {
        ApiClient::new(&self.base_url)
    }
}

async fn handle(
    State(state): State<Arc<BackendState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    let path = uri.path().strip_prefix("/api").unwrap_or(uri.path()).to_string();
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let key = format!("{} {}", method, path);
    state.requests.lock().unwrap().push(Recorded {
        method,
        path,
        authorization,
        body,
    });

    let (status, body) = state
        .routes
        .lock()
        .unwrap()
        .get(&key)
        .cloned()
        .unwrap_or((StatusCode::NOT_FOUND, json!({"message": "Not found"})));
    (status, axum::Json(body))
}

/// An API base URL nothing is listening on.
pub async fn dead_api() -> ApiClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    ApiClient::new(format!("http://{}/api", addr))
}

#[derive(Debug, Default)]
pub struct RecordingHost {
    pub redirects: Vec<String>,
    pub alerts: Vec<String>,
    pub confirms: Vec<String>,
    pub decline: bool,
}

impl PageHost for RecordingHost {
    fn redirect(&mut self, path: &str) {
        self.redirects.push(path.to_string());
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.confirms.push(message.to_string());
        !self.decline
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub const TOKEN: &str = "tok-abc";

pub fn admin_profile() -> Value {
    json!({"id": 1, "name": "Ada Admin", "email": "ada@worknest.io", "role": "admin"})
}

pub fn user_profile() -> Value {
    json!({"id": 2, "name": "Sam User", "email": "sam@worknest.io", "role": "user"})
}

pub fn context(api: ApiClient, profile: Option<Value>) -> PageContext<MemoryStorage, RecordingHost> {
    let mut storage = MemoryStorage::new();
    if let Some(profile) = profile {
        storage.set(TOKEN_KEY, TOKEN).unwrap();
        storage.set(USER_KEY, &profile.to_string()).unwrap();
    }
    PageContext::new(api, SessionManager::new(storage), RecordingHost::default()).with_clock(fixed_now)
}

pub fn task_json(id: i64, title: &str, status: &str, due: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("About {}", title),
        "status": status,
        "start_date": "2024-05-01",
        "due_date": due,
        "assigned_user_id": 2,
        "assigned_user_name": "Sam User"
    })
}

pub fn dashboard_json() -> Value {
    json!({
        "taskStats": {"pending": 4, "in_progress": 2, "completed": 9, "delayed": 1},
        "recentTasks": [
            task_json(10, "Overdue audit", "pending", "2024-05-20"),
            task_json(11, "Future plan", "in_progress", "2024-07-15")
        ],
        "recentComments": [
            {"user_name": "Sam User", "comment_text": "Started on it", "created_at": "2024-05-30T10:00:00", "task_title": "Overdue audit"}
        ]
    })
}

pub fn users_json() -> Value {
    json!({"users": [
        {"id": 1, "name": "Ada Admin", "email": "ada@worknest.io", "role": "admin", "created_at": "2024-01-01"},
        {"id": 2, "name": "Sam User", "email": "sam@worknest.io", "role": "user", "created_at": "2024-02-01"}
    ]})
}
