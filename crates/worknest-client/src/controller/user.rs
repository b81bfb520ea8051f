use std::collections::BTreeMap;

use tracing::{error, info};

use worknest_types::TaskStatus;

use super::{PageContext, TabState, load_failure_message};
use crate::error::ClientError;
use crate::filter::TaskFilter;
use crate::host::PageHost;
use crate::render;
use crate::storage::Storage;

pub const USER_NAME: &str = "userName";
pub const USER_STATS_CARDS: &str = "userStatsCards";
pub const RECENT_USER_TASKS: &str = "recentUserTasks";
pub const MY_TASKS_LIST: &str = "myTasksList";
pub const TASK_DETAIL_TITLE: &str = "taskDetailTitle";
pub const TASK_DETAIL_CONTENT: &str = "taskDetailContent";
pub const TASK_DETAIL_MODAL: &str = "taskDetailModal";
pub const UPDATE_STATUS_MODAL: &str = "updateStatusModal";
pub const ADD_COMMENT_MODAL: &str = "addCommentModal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UserTab {
    Stats,
    MyTasks,
}

/// The update-status dialog, bound to the task it was opened for.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusModal {
    pub task_id: i64,
    /// Pre-selected with the task's stored status.
    pub status: TaskStatus,
}

/// The add-comment dialog, bound to the task it was opened for.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentModal {
    pub task_id: i64,
    pub comment_text: String,
}

/// Dashboard for the signed-in user: own stats and assigned tasks.
pub struct UserController<S, H> {
    ctx: PageContext<S, H>,
    tabs: BTreeMap<UserTab, TabState>,
    filter: TaskFilter,
}

impl<S: Storage, H: PageHost> UserController<S, H> {
    pub fn new(ctx: PageContext<S, H>) -> Self {
        Self {
            ctx,
            tabs: BTreeMap::new(),
            filter: TaskFilter::All,
        }
    }

    pub fn ctx(&self) -> &PageContext<S, H> {
        &self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut PageContext<S, H> {
        &mut self.ctx
    }

    pub fn tab_state(&self, tab: UserTab) -> TabState {
        self.tabs.get(&tab).copied().unwrap_or_default()
    }

    /// Filter applied by the last task list load.
    pub fn active_filter(&self) -> TaskFilter {
        self.filter
    }

    /// Page load. Any stored profile with an id may enter, admins included.
    pub async fn init(&mut self) -> bool {
        if !self.ctx.session.check_user_auth(&mut self.ctx.host) {
            return false;
        }

        let name = self.ctx.session.current_user().name.unwrap_or_default();
        self.ctx.document.set_text(USER_NAME, &name);

        let _ = self.load_stats().await;
        true
    }

    pub async fn activate(&mut self, tab: UserTab) -> Result<(), ClientError> {
        match tab {
            UserTab::Stats => self.load_stats().await,
            UserTab::MyTasks => self.load_my_tasks(TaskFilter::All).await,
        }
    }

    fn fail(&mut self, tab: UserTab, container: &str, err: &ClientError, fallback: &str) {
        error!("Loading {:?} failed: {}", tab, err);
        self.tabs.insert(tab, TabState::Error);
        let message = load_failure_message(err, fallback);
        self.ctx.document.set_html(container, render::error_alert(&message));
    }

    pub async fn load_stats(&mut self) -> Result<(), ClientError> {
        self.tabs.insert(UserTab::Stats, TabState::Loading);
        self.ctx.document.set_html(USER_STATS_CARDS, render::loading());
        let auth = self.ctx.session.auth_headers();

        match self.ctx.api.user_dashboard(&auth).await {
            Ok(dash) => {
                let now = self.ctx.now();
                let doc = &mut self.ctx.document;
                doc.set_html(USER_STATS_CARDS, render::stats_cards(&dash.task_stats));
                doc.set_html(RECENT_USER_TASKS, render::user_recent_tasks(&dash.recent_tasks, now));
                self.tabs.insert(UserTab::Stats, TabState::Rendered);
                Ok(())
            }
            Err(e) => {
                self.fail(UserTab::Stats, USER_STATS_CARDS, &e, "Failed to load dashboard stats");
                Err(e)
            }
        }
    }

    /// Fetch the caller's tasks and render the subset matching `filter`.
    ///
    /// Every call re-fetches, including filter switches; nothing is cached
    /// between loads.
    pub async fn load_my_tasks(&mut self, filter: TaskFilter) -> Result<(), ClientError> {
        self.filter = filter;
        self.tabs.insert(UserTab::MyTasks, TabState::Loading);
        self.ctx.document.set_html(MY_TASKS_LIST, render::loading());
        let auth = self.ctx.session.auth_headers();

        match self.ctx.api.my_tasks(&auth).await {
            Ok(tasks) => {
                let now = self.ctx.now();
                let visible = filter.apply(&tasks, now);
                self.ctx.document.set_html(MY_TASKS_LIST, render::my_tasks(&visible, now));
                self.tabs.insert(UserTab::MyTasks, TabState::Rendered);
                Ok(())
            }
            Err(e) => {
                self.fail(UserTab::MyTasks, MY_TASKS_LIST, &e, "Failed to load tasks");
                Err(e)
            }
        }
    }

    /// Fetch one task and show it, with its full comment thread, in the detail modal.
    pub async fn show_task_detail(&mut self, task_id: i64) -> Result<(), ClientError> {
        let auth = self.ctx.session.auth_headers();

        match self.ctx.api.get_task(&auth, task_id).await {
            Ok(task) => {
                let now = self.ctx.now();
                let doc = &mut self.ctx.document;
                doc.set_text(TASK_DETAIL_TITLE, &task.title);
                doc.set_html(TASK_DETAIL_CONTENT, render::task_detail(&task, now));
                doc.open_modal(TASK_DETAIL_MODAL);
                Ok(())
            }
            Err(e) => {
                error!("Task detail {} failed: {}", task_id, e);
                self.ctx.host.alert(&load_failure_message(&e, "Failed to load task details"));
                Err(e)
            }
        }
    }

    pub fn open_status_modal(&mut self, task_id: i64, current: TaskStatus) -> StatusModal {
        self.ctx.document.open_modal(UPDATE_STATUS_MODAL);
        StatusModal {
            task_id,
            status: current,
        }
    }

    /// PATCH the status chosen in `modal`; on success close it and reload
    /// both the task list and the stats.
    pub async fn update_status(&mut self, modal: &StatusModal) -> Result<(), ClientError> {
        let auth = self.ctx.session.auth_headers();

        if let Err(e) = self
            .ctx
            .api
            .update_task_status(&auth, modal.task_id, modal.status)
            .await
        {
            error!("Update status of task {} failed: {}", modal.task_id, e);
            self.ctx.host.alert(&e.display_message("Failed to update status"));
            return Err(e);
        }

        info!("Task {} is now {}", modal.task_id, modal.status);
        self.ctx.document.close_modal(UPDATE_STATUS_MODAL);
        let _ = self.load_my_tasks(TaskFilter::All).await;
        let _ = self.load_stats().await;
        Ok(())
    }

    pub fn open_comment_modal(&mut self, task_id: i64) -> CommentModal {
        self.ctx.document.open_modal(ADD_COMMENT_MODAL);
        CommentModal {
            task_id,
            comment_text: String::new(),
        }
    }

    /// POST the comment in `modal`; on success clear it, close it and reload
    /// the task list.
    pub async fn add_comment(&mut self, modal: &mut CommentModal) -> Result<(), ClientError> {
        let auth = self.ctx.session.auth_headers();

        if let Err(e) = self
            .ctx
            .api
            .add_comment(&auth, modal.task_id, &modal.comment_text)
            .await
        {
            error!("Add comment to task {} failed: {}", modal.task_id, e);
            self.ctx.host.alert(&e.display_message("Failed to add comment"));
            return Err(e);
        }

        info!("Commented on task {}", modal.task_id);
        modal.comment_text.clear();
        self.ctx.document.close_modal(ADD_COMMENT_MODAL);
        let _ = self.load_my_tasks(TaskFilter::All).await;
        Ok(())
    }
}
