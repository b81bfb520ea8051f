pub mod admin;
pub mod auth;
pub mod user;

use chrono::{DateTime, Utc};

use crate::api::ApiClient;
use crate::document::Document;
use crate::error::{ClientError, NETWORK_ERROR};
use crate::host::PageHost;
use crate::session::SessionManager;
use crate::storage::Storage;

pub use admin::{AddTaskForm, AdminController, AdminTab};
pub use auth::{AuthController, RegisterForm};
pub use user::{CommentModal, StatusModal, UserController, UserTab};

/// Load state of one tab. Each tab moves through this independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TabState {
    #[default]
    Idle,
    Loading,
    Rendered,
    Error,
}

/// Everything a page controller works against.
pub struct PageContext<S, H> {
    pub api: ApiClient,
    pub session: SessionManager<S>,
    pub host: H,
    pub document: Document,
    clock: fn() -> DateTime<Utc>,
}

impl<S: Storage, H: PageHost> PageContext<S, H> {
    pub fn new(api: ApiClient, session: SessionManager<S>, host: H) -> Self {
        Self {
            api,
            session,
            host,
            document: Document::new(),
            clock: Utc::now,
        }
    }

    /// Replace the clock used for the derived "delayed" status.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Clear the session and go to the login page.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.session.logout(&mut self.host)
    }
}

/// Inline message for a failed load: transport problems read the same
/// everywhere, anything else gets the container's own wording.
pub(crate) fn load_failure_message(err: &ClientError, fallback: &str) -> String {
    if err.is_network() {
        NETWORK_ERROR.to_string()
    } else {
        fallback.to_string()
    }
}
