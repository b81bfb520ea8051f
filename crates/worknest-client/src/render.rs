//! Pure HTML rendering. Every interpolated value goes through [`escape_text`]
//! or [`escape_attr`]; nothing from the server reaches markup unencoded.

use std::borrow::Cow;

use chrono::{DateTime, Utc};

use worknest_types::dates::format_date;
use worknest_types::{Comment, Role, Task, TaskStats, User};

const COMMENT_PREVIEW_CHARS: usize = 100;
const DESCRIPTION_PREVIEW_CHARS: usize = 50;

pub fn escape_text(s: &str) -> Cow<'_, str> {
    html_escape::encode_text(s)
}

pub fn escape_attr(s: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(s)
}

/// First `max` characters, with `...` appended only when something was cut.
pub fn truncate(s: &str, max: usize) -> Cow<'_, str> {
    match s.char_indices().nth(max) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &s[..cut])),
        None => Cow::Borrowed(s),
    }
}

// -- Shared fragments --

pub fn loading() -> String {
    r#"<div class="spinner-container"><div class="spinner-border text-primary" role="status"><span class="visually-hidden">Loading...</span></div><div class="loading-text">Loading...</div></div>"#
        .to_string()
}

/// Inline error that replaces a container's content.
pub fn error_alert(message: &str) -> String {
    format!(r#"<div class="alert alert-danger">{}</div>"#, escape_text(message))
}

/// Dismissible alert, `kind` being a Bootstrap contextual class such as `danger`.
pub fn alert(message: &str, kind: &str) -> String {
    format!(
        r#"<div class="alert alert-{} alert-dismissible fade show" role="alert">{}<button type="button" class="btn-close" data-bs-dismiss="alert"></button></div>"#,
        escape_attr(kind),
        escape_text(message)
    )
}

pub fn empty(message: &str) -> String {
    format!(r#"<p class="text-muted">{}</p>"#, escape_text(message))
}

fn badge(class: &str, label: &str) -> String {
    format!(
        r#"<span class="badge status-{}">{}</span>"#,
        escape_attr(class),
        escape_text(label)
    )
}

// -- Dashboard --

pub fn stats_cards(stats: &TaskStats) -> String {
    let cards = [
        (stats.pending, "Pending Tasks", "fa-clock", None),
        (
            stats.in_progress,
            "In Progress",
            "fa-spinner",
            Some("background: linear-gradient(135deg, #17a2b8 0%, #20c997 100%);"),
        ),
        (
            stats.completed,
            "Completed",
            "fa-check-circle",
            Some("background: linear-gradient(135deg, #28a745 0%, #20c997 100%);"),
        ),
        (
            stats.delayed,
            "Delayed",
            "fa-exclamation-triangle",
            Some("background: linear-gradient(135deg, #dc3545 0%, #fd7e14 100%);"),
        ),
    ];

    cards
        .iter()
        .map(|(count, label, icon, style)| {
            let style = style.map(|s| format!(r#" style="{}""#, s)).unwrap_or_default();
            format!(
                r#"<div class="col-md-3 mb-3"><div class="stat-card"{style}><div class="d-flex justify-content-between align-items-center"><div><div class="stat-number">{count}</div><div class="stat-label">{label}</div></div><div class="stat-icon"><i class="fas {icon}"></i></div></div></div></div>"#
            )
        })
        .collect()
}

/// Admin dashboard list of recently created tasks, with assignee.
pub fn recent_tasks(tasks: &[Task], now: DateTime<Utc>) -> String {
    if tasks.is_empty() {
        return empty("No recent tasks found");
    }

    tasks
        .iter()
        .map(|task| {
            let status = task.display_status(now);
            format!(
                r#"<div class="task-card card mb-2 {class}"><div class="card-body p-3"><div class="d-flex justify-content-between align-items-start"><div><h6 class="card-title mb-1">{title}</h6><small class="text-muted"><i class="fas fa-user me-1"></i>{assignee}<i class="fas fa-calendar ms-2 me-1"></i>{due}</small></div>{badge}</div></div></div>"#,
                class = escape_attr(status.css_class()),
                title = escape_text(&task.title),
                assignee = escape_text(task.assigned_user_name.as_deref().unwrap_or("Unassigned")),
                due = escape_text(&format_date(task.due_date.as_deref())),
                badge = badge(status.css_class(), status.label()),
            )
        })
        .collect()
}

pub fn recent_comments(comments: &[Comment]) -> String {
    if comments.is_empty() {
        return empty("No recent comments found");
    }

    comments
        .iter()
        .map(|c| {
            format!(
                r#"<div class="comment-item mb-2"><div class="comment-author">{}</div><div class="comment-text">{}</div><div class="comment-time">{}</div></div>"#,
                escape_text(&c.user_name),
                escape_text(&truncate(&c.comment_text, COMMENT_PREVIEW_CHARS)),
                escape_text(&format_date(c.created_at.as_deref())),
            )
        })
        .collect()
}

// -- Admin tables --

fn table(headers: &[&str], rows: String) -> String {
    let head: String = headers.iter().map(|h| format!("<th>{}</th>", h)).collect();
    format!(
        r#"<div class="table-responsive"><table class="table table-striped"><thead><tr>{head}</tr></thead><tbody>{rows}</tbody></table></div>"#
    )
}

/// Admins get a disabled delete button. The button is still rendered.
pub fn users_table(users: &[User]) -> String {
    if users.is_empty() {
        return empty("No users found");
    }

    let rows: String = users
        .iter()
        .map(|u| {
            let is_admin = u.role == Role::Admin;
            format!(
                r#"<tr><td>{name}</td><td>{email}</td><td><span class="badge bg-{bg}">{role}</span></td><td>{created}</td><td><button class="btn btn-sm btn-outline-danger" data-action="delete-user" data-id="{id}"{disabled}><i class="fas fa-trash"></i></button></td></tr>"#,
                name = escape_text(&u.name),
                email = escape_text(&u.email),
                bg = if is_admin { "primary" } else { "secondary" },
                role = escape_text(u.role.as_str()),
                created = escape_text(&format_date(u.created_at.as_deref())),
                id = u.id,
                disabled = if is_admin { " disabled" } else { "" },
            )
        })
        .collect();

    table(&["Name", "Email", "Role", "Created", "Actions"], rows)
}

pub fn tasks_table(tasks: &[Task], now: DateTime<Utc>) -> String {
    if tasks.is_empty() {
        return empty("No tasks found");
    }

    let rows: String = tasks
        .iter()
        .map(|t| {
            let status = t.display_status(now);
            let description = t
                .description
                .as_deref()
                .filter(|d| !d.is_empty())
                .map(|d| {
                    format!(
                        r#"<br><small class="text-muted">{}</small>"#,
                        escape_text(&truncate(d, DESCRIPTION_PREVIEW_CHARS))
                    )
                })
                .unwrap_or_default();
            format!(
                r#"<tr><td><strong>{title}</strong>{description}</td><td>{assignee}</td><td>{badge}</td><td>{due}</td><td><button class="btn btn-sm btn-outline-danger" data-action="delete-task" data-id="{id}"><i class="fas fa-trash"></i></button></td></tr>"#,
                title = escape_text(&t.title),
                assignee = escape_text(t.assigned_user_name.as_deref().unwrap_or("Unassigned")),
                badge = badge(status.css_class(), status.label()),
                due = escape_text(&format_date(t.due_date.as_deref())),
                id = t.id,
            )
        })
        .collect();

    table(&["Title", "Assigned To", "Status", "Due Date", "Actions"], rows)
}

/// Options for the assignee `<select>`. Only plain users can be assigned.
pub fn assignee_options(users: &[User]) -> String {
    let mut html = String::from(r#"<option value="">Select User</option>"#);
    for u in users.iter().filter(|u| u.role == Role::User) {
        html.push_str(&format!(
            r#"<option value="{}">{}</option>"#,
            u.id,
            escape_text(&u.name)
        ));
    }
    html
}

pub fn comments_table(comments: &[Comment]) -> String {
    if comments.is_empty() {
        return empty("No comments found");
    }

    let rows: String = comments
        .iter()
        .map(|c| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_text(&c.user_name),
                escape_text(c.task_title.as_deref().unwrap_or("")),
                escape_text(&truncate(&c.comment_text, COMMENT_PREVIEW_CHARS)),
                escape_text(&format_date(c.created_at.as_deref())),
            )
        })
        .collect();

    table(&["User", "Task", "Comment", "Date"], rows)
}

// -- User dashboard --

pub fn user_recent_tasks(tasks: &[Task], now: DateTime<Utc>) -> String {
    if tasks.is_empty() {
        return empty("No recent tasks found");
    }

    tasks
        .iter()
        .map(|t| {
            let status = t.display_status(now);
            format!(
                r#"<div class="task-card card mb-2 {class}" data-action="show-task" data-id="{id}"><div class="card-body p-3"><div class="d-flex justify-content-between align-items-start"><div><h6 class="card-title mb-1">{title}</h6><small class="text-muted"><i class="fas fa-calendar me-1"></i>Due: {due}</small></div>{badge}</div></div></div>"#,
                class = escape_attr(status.css_class()),
                id = t.id,
                title = escape_text(&t.title),
                due = escape_text(&format_date(t.due_date.as_deref())),
                badge = badge(status.css_class(), status.label()),
            )
        })
        .collect()
}

pub fn my_tasks(tasks: &[&Task], now: DateTime<Utc>) -> String {
    if tasks.is_empty() {
        return empty("No tasks found");
    }

    tasks
        .iter()
        .map(|t| {
            let status = t.display_status(now);
            format!(
                r#"<div class="task-card card mb-3 {class}"><div class="card-body"><div class="d-flex justify-content-between align-items-start mb-2"><div><h5 class="card-title">{title}</h5><p class="card-text text-muted">{description}</p></div>{badge}</div><div class="row mb-3"><div class="col-md-6"><small class="text-muted"><i class="fas fa-calendar-alt me-1"></i>Start: {start}</small></div><div class="col-md-6"><small class="text-muted"><i class="fas fa-calendar-check me-1"></i>Due: {due}</small></div></div><div class="d-flex gap-2"><button class="btn btn-sm btn-outline-primary" data-action="show-task" data-id="{id}"><i class="fas fa-eye me-1"></i>View Details</button><button class="btn btn-sm btn-outline-success" data-action="update-status" data-id="{id}" data-status="{stored}"><i class="fas fa-edit me-1"></i>Update Status</button><button class="btn btn-sm btn-outline-info" data-action="add-comment" data-id="{id}"><i class="fas fa-comment me-1"></i>Add Comment</button></div></div></div>"#,
                class = escape_attr(status.css_class()),
                title = escape_text(&t.title),
                description = escape_text(description_or_placeholder(t)),
                badge = badge(status.css_class(), status.label()),
                start = escape_text(&format_date(t.start_date.as_deref())),
                due = escape_text(&format_date(t.due_date.as_deref())),
                id = t.id,
                stored = t.status.as_str(),
            )
        })
        .collect()
}

/// Body of the task detail modal. The comment thread is shown in full.
pub fn task_detail(task: &Task, now: DateTime<Utc>) -> String {
    let status = task.display_status(now);

    let comments: String = match task.comments.as_deref() {
        Some(comments) if !comments.is_empty() => comments
            .iter()
            .map(|c| {
                format!(
                    r#"<div class="comment-item mb-2"><div class="comment-author">{}</div><div class="comment-text">{}</div><div class="comment-time">{}</div></div>"#,
                    escape_text(&c.user_name),
                    escape_text(&c.comment_text),
                    escape_text(&format_date(c.created_at.as_deref())),
                )
            })
            .collect(),
        _ => empty("No comments yet"),
    };

    format!(
        r#"<div class="mb-3"><h6>Description:</h6><p>{description}</p></div><div class="row mb-3"><div class="col-md-4"><h6>Status:</h6>{badge}</div><div class="col-md-4"><h6>Start Date:</h6><p>{start}</p></div><div class="col-md-4"><h6>Due Date:</h6><p>{due}</p></div></div><div class="mb-3"><h6>Comments:</h6><div id="taskComments">{comments}</div></div>"#,
        description = escape_text(description_or_placeholder(task)),
        badge = badge(status.css_class(), status.label()),
        start = escape_text(&format_date(task.start_date.as_deref())),
        due = escape_text(&format_date(task.due_date.as_deref())),
    )
}

fn description_or_placeholder(task: &Task) -> &str {
    task.description
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or("No description provided")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use worknest_types::TaskStatus;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn task(status: TaskStatus, due: &str) -> Task {
        Task {
            id: 7,
            title: "Quarterly report".into(),
            description: Some("Collect numbers".into()),
            status,
            start_date: Some("2024-05-01".into()),
            due_date: Some(due.into()),
            assigned_user_id: Some(2),
            assigned_user_name: Some("Sam".into()),
            comments: None,
        }
    }

    fn user(id: i64, name: &str, role: Role) -> User {
        User {
            id,
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            role,
            created_at: Some("2024-01-10T09:00:00".into()),
        }
    }

    fn comment(text: &str) -> Comment {
        Comment {
            id: Some(1),
            task_id: Some(7),
            task_title: Some("Quarterly report".into()),
            user_name: "Sam".into(),
            comment_text: text.into(),
            created_at: Some("2024-05-02".into()),
        }
    }

    #[test]
    fn truncate_only_marks_cut_text() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn overdue_tasks_render_as_delayed_everywhere() {
        let overdue = [task(TaskStatus::Pending, "2024-05-01")];

        for html in [
            recent_tasks(&overdue, now()),
            user_recent_tasks(&overdue, now()),
            tasks_table(&overdue, now()),
            my_tasks(&[&overdue[0]], now()),
            task_detail(&overdue[0], now()),
        ] {
            assert!(html.contains(r#"<span class="badge status-delayed">DELAYED</span>"#), "{html}");
            assert!(!html.contains("PENDING"), "{html}");
        }
    }

    #[test]
    fn on_time_task_keeps_stored_badge() {
        let html = recent_tasks(&[task(TaskStatus::InProgress, "2024-07-01")], now());
        assert!(html.contains(r#"status-in_progress">IN PROGRESS</span>"#));
        assert!(html.contains("7/1/2024"));
    }

    #[test]
    fn server_values_are_escaped() {
        let mut t = task(TaskStatus::Pending, "2024-07-01");
        t.title = "<script>alert(1)</script>".into();
        t.comments = Some(vec![comment("<img src=x onerror=alert(1)>")]);

        let html = task_detail(&t, now()) + &my_tasks(&[&t], now());
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
    }

    #[test]
    fn admin_delete_button_is_disabled_not_removed() {
        let html = users_table(&[user(1, "Ada", Role::Admin), user(2, "Sam", Role::User)]);
        assert!(html.contains(r#"data-action="delete-user" data-id="1" disabled>"#));
        assert!(html.contains(r#"data-action="delete-user" data-id="2">"#));
        assert!(html.contains(r#"<span class="badge bg-primary">admin</span>"#));
    }

    #[test]
    fn assignee_options_skip_admins() {
        let html = assignee_options(&[user(1, "Ada", Role::Admin), user(2, "Sam", Role::User)]);
        assert_eq!(
            html,
            r#"<option value="">Select User</option><option value="2">Sam</option>"#
        );
    }

    #[test]
    fn comment_previews_are_truncated_but_detail_is_not() {
        let long = "x".repeat(150);
        let preview = recent_comments(&[comment(&long)]);
        assert!(preview.contains(&format!("{}...", "x".repeat(100))));
        assert!(!preview.contains(&"x".repeat(101)));

        let mut t = task(TaskStatus::Completed, "2024-05-01");
        t.comments = Some(vec![comment(&long)]);
        assert!(task_detail(&t, now()).contains(&long));
    }

    #[test]
    fn empty_lists_render_messages() {
        assert_eq!(users_table(&[]), empty("No users found"));
        assert_eq!(tasks_table(&[], now()), empty("No tasks found"));
        assert_eq!(comments_table(&[]), empty("No comments found"));
        assert_eq!(recent_comments(&[]), empty("No recent comments found"));
        assert_eq!(my_tasks(&[], now()), empty("No tasks found"));

        let t = task(TaskStatus::Pending, "2024-07-01");
        assert!(task_detail(&t, now()).contains("No comments yet"));
    }

    #[test]
    fn stats_cards_show_all_four_counts() {
        let html = stats_cards(&TaskStats {
            pending: 4,
            in_progress: 3,
            completed: 9,
            delayed: 2,
        });
        for expected in [
            r#"<div class="stat-number">4</div><div class="stat-label">Pending Tasks</div>"#,
            r#"<div class="stat-number">3</div><div class="stat-label">In Progress</div>"#,
            r#"<div class="stat-number">9</div><div class="stat-label">Completed</div>"#,
            r#"<div class="stat-number">2</div><div class="stat-label">Delayed</div>"#,
        ] {
            assert!(html.contains(expected), "missing {expected}");
        }
    }
}
