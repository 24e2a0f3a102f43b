use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::progress::{clamp_percentage, Progress};
use crate::view::{ListFilter, Searchable, SortKey};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub total_tasks: u32,
    #[serde(default)]
    pub completed_tasks: u32,
    #[serde(default)]
    pub progress_percentage: f64,
}

impl Project {
    pub fn progress(&self) -> Progress {
        Progress::new(
            self.progress_percentage,
            self.completed_tasks,
            self.total_tasks,
        )
    }

    /// Derived lifecycle bucket. A project with no tasks is never
    /// considered complete, whatever percentage the backend reports.
    pub fn status(&self) -> ProjectStatus {
        if self.total_tasks == 0 {
            ProjectStatus::NotStarted
        } else if clamp_percentage(self.progress_percentage) >= 100.0 {
            ProjectStatus::Completed
        } else {
            ProjectStatus::InProgress
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProject {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::NotStarted => "not-started",
            ProjectStatus::InProgress => "in-progress",
            ProjectStatus::Completed => "completed",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProjectStatus::NotStarted => "Not started",
            ProjectStatus::InProgress => "In progress",
            ProjectStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress filter for the project list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProjectFilter {
    #[default]
    All,
    NotStarted,
    InProgress,
    Completed,
}

impl ProjectFilter {
    pub const ALL: &[ProjectFilter] = &[
        ProjectFilter::All,
        ProjectFilter::NotStarted,
        ProjectFilter::InProgress,
        ProjectFilter::Completed,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ProjectFilter::All => "All",
            ProjectFilter::NotStarted => "Not started",
            ProjectFilter::InProgress => "In progress",
            ProjectFilter::Completed => "Completed",
        }
    }

    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl ListFilter<Project> for ProjectFilter {
    fn matches(&self, project: &Project) -> bool {
        match self {
            ProjectFilter::All => true,
            ProjectFilter::NotStarted => project.status() == ProjectStatus::NotStarted,
            ProjectFilter::InProgress => project.status() == ProjectStatus::InProgress,
            ProjectFilter::Completed => project.status() == ProjectStatus::Completed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectSortKey {
    Title,
    Progress,
    TaskCount,
}

impl ProjectSortKey {
    pub const ALL: &[ProjectSortKey] = &[
        ProjectSortKey::Title,
        ProjectSortKey::Progress,
        ProjectSortKey::TaskCount,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ProjectSortKey::Title => "Title",
            ProjectSortKey::Progress => "Progress",
            ProjectSortKey::TaskCount => "Task count",
        }
    }
}

impl SortKey<Project> for ProjectSortKey {
    fn cmp(&self, a: &Project, b: &Project) -> Ordering {
        match self {
            ProjectSortKey::Title => a.title.cmp(&b.title),
            ProjectSortKey::Progress => clamp_percentage(a.progress_percentage)
                .total_cmp(&clamp_percentage(b.progress_percentage)),
            ProjectSortKey::TaskCount => a.total_tasks.cmp(&b.total_tasks),
        }
    }

    fn all() -> &'static [Self] {
        Self::ALL
    }
}

impl Searchable for Project {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
