use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use worknest_types::{Task, TaskStatus};

/// Client-side filter over the caller's task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskFilter {
    #[default]
    All,
    Status(TaskStatus),
    /// Overdue and not completed, computed at filter time.
    Delayed,
}

impl TaskFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Status(status) => status.as_str(),
            Self::Delayed => "delayed",
        }
    }

    pub fn matches(&self, task: &Task, now: DateTime<Utc>) -> bool {
        match self {
            Self::All => true,
            Self::Status(status) => task.status == *status,
            Self::Delayed => task.is_delayed(now),
        }
    }

    /// Matching tasks, in their original order.
    pub fn apply<'a>(&self, tasks: &'a [Task], now: DateTime<Utc>) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t, now)).collect()
    }
}

impl fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "delayed" => Ok(Self::Delayed),
            other => other
                .parse::<TaskStatus>()
                .map(Self::Status)
                .map_err(|_| format!("unknown filter: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn task(id: i64, status: TaskStatus, due: &str) -> Task {
        Task {
            id,
            title: format!("task {id}"),
            description: None,
            status,
            start_date: None,
            due_date: Some(due.to_string()),
            assigned_user_id: None,
            assigned_user_name: None,
            comments: None,
        }
    }

    fn fixture() -> Vec<Task> {
        vec![
            task(1, TaskStatus::Pending, "2024-05-01"),
            task(2, TaskStatus::Completed, "2024-05-01"),
            task(3, TaskStatus::InProgress, "2024-07-01"),
            task(4, TaskStatus::InProgress, "2024-05-20"),
            task(5, TaskStatus::Pending, "2024-08-01"),
            task(6, TaskStatus::Completed, "2024-09-01"),
        ]
    }

    fn ids(tasks: Vec<&Task>) -> Vec<i64> {
        tasks.into_iter().map(|t| t.id).collect()
    }

    #[test]
    fn delayed_filter_keeps_overdue_open_tasks_in_order() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let tasks = fixture();
        assert_eq!(ids(TaskFilter::Delayed.apply(&tasks, now)), vec![1, 4]);
    }

    #[test]
    fn status_filters_use_stored_status() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let tasks = fixture();
        assert_eq!(ids(TaskFilter::Status(TaskStatus::Pending).apply(&tasks, now)), vec![1, 5]);
        assert_eq!(ids(TaskFilter::Status(TaskStatus::InProgress).apply(&tasks, now)), vec![3, 4]);
        assert_eq!(ids(TaskFilter::Status(TaskStatus::Completed).apply(&tasks, now)), vec![2, 6]);
        assert_eq!(TaskFilter::All.apply(&tasks, now).len(), 6);
    }

    #[test]
    fn parses_filter_names() {
        assert_eq!("all".parse::<TaskFilter>(), Ok(TaskFilter::All));
        assert_eq!("delayed".parse::<TaskFilter>(), Ok(TaskFilter::Delayed));
        assert_eq!("in_progress".parse::<TaskFilter>(), Ok(TaskFilter::Status(TaskStatus::InProgress)));
        assert!("overdue".parse::<TaskFilter>().is_err());
    }
}
