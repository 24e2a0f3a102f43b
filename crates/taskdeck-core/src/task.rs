use std::cmp::Ordering;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::view::{ListFilter, Searchable, SortDirection, SortKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Completed => "COMPLETED",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Completed => "Completed",
        }
    }

    /// The status a toggle moves to. There are only two states.
    pub fn toggled(&self) -> Self {
        match self {
            TaskStatus::Pending => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(TaskStatus::Pending),
            "COMPLETED" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
    pub created_at: NaiveDateTime,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// Completion filter for the task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl TaskFilter {
    pub const ALL: &[TaskFilter] = &[TaskFilter::All, TaskFilter::Pending, TaskFilter::Completed];

    pub fn display_name(&self) -> &'static str {
        match self {
            TaskFilter::All => "All",
            TaskFilter::Pending => "Pending",
            TaskFilter::Completed => "Completed",
        }
    }

    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl ListFilter<Task> for TaskFilter {
    fn matches(&self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Pending => task.status == TaskStatus::Pending,
            TaskFilter::Completed => task.status == TaskStatus::Completed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSortKey {
    Title,
    DueDate,
    CreatedAt,
    Status,
}

impl TaskSortKey {
    pub const ALL: &[TaskSortKey] = &[
        TaskSortKey::Title,
        TaskSortKey::DueDate,
        TaskSortKey::CreatedAt,
        TaskSortKey::Status,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            TaskSortKey::Title => "Title",
            TaskSortKey::DueDate => "Due date",
            TaskSortKey::CreatedAt => "Created",
            TaskSortKey::Status => "Status",
        }
    }
}

impl SortKey<Task> for TaskSortKey {
    fn cmp(&self, a: &Task, b: &Task) -> Ordering {
        match self {
            TaskSortKey::Title => a.title.cmp(&b.title),
            TaskSortKey::DueDate => a.due_date.cmp(&b.due_date),
            TaskSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            TaskSortKey::Status => a.status.as_str().cmp(b.status.as_str()),
        }
    }

    fn compare(&self, a: &Task, b: &Task, direction: SortDirection) -> Ordering {
        match (self, a.due_date, b.due_date) {
            // Undated tasks go last no matter the direction.
            (TaskSortKey::DueDate, Some(x), Some(y)) => direction.apply(x.cmp(&y)),
            (TaskSortKey::DueDate, Some(_), None) => Ordering::Less,
            (TaskSortKey::DueDate, None, Some(_)) => Ordering::Greater,
            (TaskSortKey::DueDate, None, None) => Ordering::Equal,
            _ => direction.apply(self.cmp(a, b)),
        }
    }

    fn all() -> &'static [Self] {
        Self::ALL
    }
}

impl Searchable for Task {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
