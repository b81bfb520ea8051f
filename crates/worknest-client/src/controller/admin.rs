use std::collections::BTreeMap;

use futures_util::future::join;
use tracing::{error, info};

use worknest_types::api::{CreateTaskRequest, CreateUserRequest};

use super::{PageContext, TabState, load_failure_message};
use crate::error::ClientError;
use crate::host::PageHost;
use crate::render;
use crate::storage::Storage;

pub const ADMIN_NAME: &str = "adminName";
pub const STATS_CARDS: &str = "statsCards";
pub const RECENT_TASKS: &str = "recentTasks";
pub const RECENT_COMMENTS: &str = "recentComments";
pub const USERS_TABLE: &str = "usersTable";
pub const TASKS_TABLE: &str = "tasksTable";
pub const ASSIGNEE_SELECT: &str = "assignedUser";
pub const COMMENTS_TABLE: &str = "commentsTable";
pub const ADD_USER_MODAL: &str = "addUserModal";
pub const ADD_TASK_MODAL: &str = "addTaskModal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AdminTab {
    Stats,
    Users,
    Tasks,
    Comments,
}

/// Raw values of the add-task form, as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddTaskForm {
    pub title: String,
    pub description: String,
    /// Value of the assignee select; empty when nothing was picked.
    pub assigned_user_id: String,
    pub start_date: String,
    pub due_date: String,
}

impl AddTaskForm {
    pub fn to_request(&self) -> CreateTaskRequest {
        CreateTaskRequest {
            title: self.title.clone(),
            description: Some(self.description.clone()).filter(|d| !d.is_empty()),
            assigned_user_id: self.assigned_user_id.trim().parse().ok(),
            start_date: self.start_date.clone(),
            due_date: self.due_date.clone(),
        }
    }
}

/// Admin dashboard: stats, users, tasks and comments tabs.
///
/// Every mutation is followed by a full re-fetch of the affected list; nothing
/// is patched in place.
pub struct AdminController<S, H> {
    ctx: PageContext<S, H>,
    tabs: BTreeMap<AdminTab, TabState>,
}

impl<S: Storage, H: PageHost> AdminController<S, H> {
    pub fn new(ctx: PageContext<S, H>) -> Self {
        Self {
            ctx,
            tabs: BTreeMap::new(),
        }
    }

    pub fn ctx(&self) -> &PageContext<S, H> {
        &self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut PageContext<S, H> {
        &mut self.ctx
    }

    pub fn tab_state(&self, tab: AdminTab) -> TabState {
        self.tabs.get(&tab).copied().unwrap_or_default()
    }

    /// Page load: role gate, admin name, dashboard stats.
    ///
    /// Returns `false` (after redirecting to `/login`) for non-admins.
    pub async fn init(&mut self) -> bool {
        if !self.ctx.session.check_admin_auth(&mut self.ctx.host) {
            return false;
        }

        let name = self.ctx.session.current_user().name.unwrap_or_default();
        self.ctx.document.set_text(ADMIN_NAME, &name);

        let _ = self.load_stats().await;
        true
    }

    /// Tab activation.
    pub async fn activate(&mut self, tab: AdminTab) -> Result<(), ClientError> {
        match tab {
            AdminTab::Stats => self.load_stats().await,
            AdminTab::Users => self.load_users().await,
            AdminTab::Tasks => self.load_tasks().await,
            AdminTab::Comments => self.load_comments().await,
        }
    }

    fn begin(&mut self, tab: AdminTab, container: &str) {
        self.tabs.insert(tab, TabState::Loading);
        self.ctx.document.set_html(container, render::loading());
    }

    fn fail(&mut self, tab: AdminTab, container: &str, err: &ClientError, fallback: &str) {
        error!("Loading {:?} failed: {}", tab, err);
        self.tabs.insert(tab, TabState::Error);
        let message = load_failure_message(err, fallback);
        self.ctx.document.set_html(container, render::error_alert(&message));
    }

    pub async fn load_stats(&mut self) -> Result<(), ClientError> {
        self.begin(AdminTab::Stats, STATS_CARDS);
        let auth = self.ctx.session.auth_headers();

        match self.ctx.api.admin_dashboard(&auth).await {
            Ok(dash) => {
                let now = self.ctx.now();
                let doc = &mut self.ctx.document;
                doc.set_html(STATS_CARDS, render::stats_cards(&dash.task_stats));
                doc.set_html(RECENT_TASKS, render::recent_tasks(&dash.recent_tasks, now));
                doc.set_html(RECENT_COMMENTS, render::recent_comments(&dash.recent_comments));
                self.tabs.insert(AdminTab::Stats, TabState::Rendered);
                Ok(())
            }
            Err(e) => {
                self.fail(AdminTab::Stats, STATS_CARDS, &e, "Failed to load dashboard stats");
                Err(e)
            }
        }
    }

    pub async fn load_users(&mut self) -> Result<(), ClientError> {
        self.begin(AdminTab::Users, USERS_TABLE);
        let auth = self.ctx.session.auth_headers();

        match self.ctx.api.list_users(&auth).await {
            Ok(users) => {
                self.ctx.document.set_html(USERS_TABLE, render::users_table(&users));
                self.tabs.insert(AdminTab::Users, TabState::Rendered);
                Ok(())
            }
            Err(e) => {
                self.fail(AdminTab::Users, USERS_TABLE, &e, "Failed to load users");
                Err(e)
            }
        }
    }

    /// Tasks and users are fetched together. If either fails nothing is
    /// rendered but the error.
    pub async fn load_tasks(&mut self) -> Result<(), ClientError> {
        self.begin(AdminTab::Tasks, TASKS_TABLE);
        let auth = self.ctx.session.auth_headers();

        let (tasks, users) = join(self.ctx.api.list_tasks(&auth), self.ctx.api.list_users(&auth)).await;

        let (tasks, users) = match (tasks, users) {
            (Ok(tasks), Ok(users)) => (tasks, users),
            (Err(a), Err(b)) => {
                // A transport failure on either side wins the message.
                let e = if b.is_network() && !a.is_network() { b } else { a };
                self.fail(AdminTab::Tasks, TASKS_TABLE, &e, "Failed to load tasks");
                return Err(e);
            }
            (Err(e), Ok(_)) | (Ok(_), Err(e)) => {
                self.fail(AdminTab::Tasks, TASKS_TABLE, &e, "Failed to load tasks");
                return Err(e);
            }
        };

        let now = self.ctx.now();
        let doc = &mut self.ctx.document;
        doc.set_html(TASKS_TABLE, render::tasks_table(&tasks, now));
        doc.set_html(ASSIGNEE_SELECT, render::assignee_options(&users));
        self.tabs.insert(AdminTab::Tasks, TabState::Rendered);
        Ok(())
    }

    /// The comments tab reuses the dashboard endpoint's recent comments.
    pub async fn load_comments(&mut self) -> Result<(), ClientError> {
        self.begin(AdminTab::Comments, COMMENTS_TABLE);
        let auth = self.ctx.session.auth_headers();

        match self.ctx.api.admin_dashboard(&auth).await {
            Ok(dash) => {
                self.ctx
                    .document
                    .set_html(COMMENTS_TABLE, render::comments_table(&dash.recent_comments));
                self.tabs.insert(AdminTab::Comments, TabState::Rendered);
                Ok(())
            }
            Err(e) => {
                self.fail(AdminTab::Comments, COMMENTS_TABLE, &e, "Failed to load comments");
                Err(e)
            }
        }
    }

    pub fn open_add_user_modal(&mut self) {
        self.ctx.document.open_modal(ADD_USER_MODAL);
    }

    pub fn open_add_task_modal(&mut self) {
        self.ctx.document.open_modal(ADD_TASK_MODAL);
    }

    /// Submit the add-user form.
    ///
    /// On success the form is cleared, the modal closed and users re-fetched.
    /// On failure the server's message (or a fallback) is alerted and both the
    /// form and the modal are left as they were.
    pub async fn add_user(&mut self, form: &mut CreateUserRequest) -> Result<(), ClientError> {
        let auth = self.ctx.session.auth_headers();

        if let Err(e) = self.ctx.api.create_user(&auth, form).await {
            error!("Add user failed: {}", e);
            self.ctx.host.alert(&e.display_message("Failed to add user"));
            return Err(e);
        }

        info!("Created user {}", form.email);
        *form = CreateUserRequest::default();
        self.ctx.document.close_modal(ADD_USER_MODAL);
        let _ = self.load_users().await;
        Ok(())
    }

    /// Submit the add-task form. Success also refreshes the stats, since the
    /// counts changed.
    pub async fn add_task(&mut self, form: &mut AddTaskForm) -> Result<(), ClientError> {
        let auth = self.ctx.session.auth_headers();

        if let Err(e) = self.ctx.api.create_task(&auth, &form.to_request()).await {
            error!("Add task failed: {}", e);
            self.ctx.host.alert(&e.display_message("Failed to add task"));
            return Err(e);
        }

        info!("Created task {:?}", form.title);
        *form = AddTaskForm::default();
        self.ctx.document.close_modal(ADD_TASK_MODAL);
        let _ = self.load_tasks().await;
        let _ = self.load_stats().await;
        Ok(())
    }

    /// Asks for confirmation, deletes, then re-fetches the user list once,
    /// whatever the outcome. Returns `Ok(false)` if the user cancelled.
    pub async fn delete_user(&mut self, user_id: i64) -> Result<bool, ClientError> {
        if !self.ctx.host.confirm("Are you sure you want to delete this user?") {
            return Ok(false);
        }

        let auth = self.ctx.session.auth_headers();
        let result = self.ctx.api.delete_user(&auth, user_id).await;
        if let Err(e) = &result {
            error!("Delete user {} failed: {}", user_id, e);
            self.ctx.host.alert(&e.display_message("Failed to delete user"));
        }

        let _ = self.load_users().await;
        result.map(|()| true)
    }

    /// Same contract as [`delete_user`](Self::delete_user), for tasks.
    pub async fn delete_task(&mut self, task_id: i64) -> Result<bool, ClientError> {
        if !self.ctx.host.confirm("Are you sure you want to delete this task?") {
            return Ok(false);
        }

        let auth = self.ctx.session.auth_headers();
        let result = self.ctx.api.delete_task(&auth, task_id).await;
        if let Err(e) = &result {
            error!("Delete task {} failed: {}", task_id, e);
            self.ctx.host.alert(&e.display_message("Failed to delete task"));
        }

        let _ = self.load_tasks().await;
        result.map(|()| true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_task_form_without_assignee_sends_none() {
        let form = AddTaskForm {
            title: "Audit".into(),
            description: String::new(),
            assigned_user_id: String::new(),
            start_date: "2024-01-01".into(),
            due_date: "2024-01-31".into(),
        };
        let req = form.to_request();
        assert_eq!(req.assigned_user_id, None);
        assert_eq!(req.description, None);
    }

    #[test]
    fn add_task_form_parses_assignee() {
        let form = AddTaskForm {
            assigned_user_id: "12".into(),
            description: "Check the books".into(),
            ..Default::default()
        };
        let req = form.to_request();
        assert_eq!(req.assigned_user_id, Some(12));
        assert_eq!(req.description.as_deref(), Some("Check the books"));
    }
}
