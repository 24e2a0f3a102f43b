use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Local, NaiveDate, NaiveDateTime};
use taskdeck_core::project::Project;
use taskdeck_core::task::{Task, TaskStatus};

use crate::auth::sha256_hex;

pub(crate) struct UserRecord {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

pub(crate) struct ProjectRecord {
    pub id: i64,
    pub owner: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

pub(crate) struct TaskRecord {
    pub id: i64,
    pub project_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
    pub created_at: NaiveDateTime,
}

impl TaskRecord {
    pub fn to_task(&self) -> Task {
        Task {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: self.due_date,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

#[derive(Default)]
pub(crate) struct Store {
    pub users: HashMap<String, UserRecord>,
    /// bearer token -> user email
    pub tokens: HashMap<String, String>,
    pub projects: Vec<ProjectRecord>,
    pub tasks: Vec<TaskRecord>,
    next_id: i64,
}

impl Store {
    pub fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// A project visible to `owner`, as the API reports it.
    pub fn project_view(&self, id: i64, owner: &str) -> Option<Project> {
        let record = self
            .projects
            .iter()
            .find(|p| p.id == id && p.owner == owner)?;
        let tasks: Vec<&TaskRecord> = self.tasks.iter().filter(|t| t.project_id == id).collect();
        let total = tasks.len() as u32;
        let completed = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count() as u32;
        let progress = if total > 0 {
            completed as f64 * 100.0 / total as f64
        } else {
            0.0
        };
        Some(Project {
            id: record.id,
            title: record.title.clone(),
            description: record.description.clone(),
            created_at: Some(record.created_at),
            total_tasks: total,
            completed_tasks: completed,
            progress_percentage: (progress * 100.0).round() / 100.0,
        })
    }

    pub fn owns_project(&self, id: i64, owner: &str) -> bool {
        self.projects.iter().any(|p| p.id == id && p.owner == owner)
    }
}

/// Shared in-memory backend state.
#[derive(Clone, Default)]
pub struct BackendState {
    inner: Arc<Mutex<Store>>,
}

impl BackendState {
    pub(crate) fn lock(&self) -> MutexGuard<'_, Store> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a user account directly, bypassing `/auth/register`.
    pub fn add_user(&self, name: &str, email: &str, password: &str) {
        self.lock().users.insert(
            email.to_string(),
            UserRecord {
                name: name.to_string(),
                email: email.to_string(),
                password_hash: sha256_hex(password),
            },
        );
    }

    /// Mint a token for an existing user without going through login.
    pub fn issue_token(&self, email: &str) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        self.lock().tokens.insert(token.clone(), email.to_string());
        token
    }

    /// Expire every outstanding token; the next authenticated call gets 401.
    pub fn revoke_tokens(&self) {
        self.lock().tokens.clear();
    }

    pub fn token_count(&self) -> usize {
        self.lock().tokens.len()
    }

    pub fn add_project(&self, owner: &str, title: &str, description: Option<&str>) -> Project {
        let mut store = self.lock();
        let id = store.next_id();
        store.projects.push(ProjectRecord {
            id,
            owner: owner.to_string(),
            title: title.to_string(),
            description: description.map(String::from),
            created_at: Local::now().naive_local(),
        });
        store
            .project_view(id, owner)
            .expect("project was just inserted")
    }

    pub fn add_task(
        &self,
        project_id: i64,
        title: &str,
        due_date: Option<NaiveDate>,
        status: TaskStatus,
    ) -> Task {
        let mut store = self.lock();
        let id = store.next_id();
        let record = TaskRecord {
            id,
            project_id,
            title: title.to_string(),
            description: None,
            due_date,
            status,
            created_at: Local::now().naive_local(),
        };
        let task = record.to_task();
        store.tasks.push(record);
        task
    }

    pub fn tasks_for(&self, project_id: i64) -> Vec<Task> {
        self.lock()
            .tasks
            .iter()
            .filter(|t| t.project_id == project_id)
            .map(TaskRecord::to_task)
            .collect()
    }

    pub fn project_count(&self) -> usize {
        self.lock().projects.len()
    }
}
