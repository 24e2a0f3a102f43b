use async_trait::async_trait;
use taskdeck_core::auth::{LoginRequest, RegisterRequest, RegisterResponse};
use taskdeck_core::project::{CreateProject, Project};
use taskdeck_core::task::{CreateTask, Task};
use thiserror::Error;

use crate::session::Session;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The backend answered 401. The session has already been cleared by
    /// the time a caller sees this.
    #[error("unauthorized")]
    Unauthorized,

    /// No response at all: connection refused, DNS, timeout.
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx answer carrying a message for the user.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("invalid response: {0}")]
    Decode(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ServiceError::Unauthorized)
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ServiceError::Network(_))
    }

    /// Text for the error banner. Backend messages are shown verbatim;
    /// anything else gets the caller's generic fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ServiceError::Api { message, .. } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Decoded body plus the HTTP status it came with.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: u16,
}

/// The backend's REST contract.
///
/// `HttpService` implements it over reqwest; the TUI reaches it through
/// `BlockingHttpService`.
#[async_trait]
pub trait TaskdeckApi: Send + Sync {
    // -- Auth --
    /// Authenticate and store the resulting session.
    async fn login(&self, input: &LoginRequest) -> Result<Session, ServiceError>;
    async fn register(&self, input: &RegisterRequest) -> Result<RegisterResponse, ServiceError>;

    // -- Projects --
    async fn list_projects(&self) -> Result<Vec<Project>, ServiceError>;
    async fn get_project(&self, id: i64) -> Result<Project, ServiceError>;
    async fn create_project(&self, input: &CreateProject) -> Result<Project, ServiceError>;

    // -- Tasks --
    async fn list_tasks(&self, project_id: i64) -> Result<Vec<Task>, ServiceError>;
    async fn create_task(&self, project_id: i64, input: &CreateTask)
        -> Result<Task, ServiceError>;
    async fn toggle_task(&self, project_id: i64, task_id: i64) -> Result<Task, ServiceError>;
    async fn delete_task(&self, project_id: i64, task_id: i64) -> Result<(), ServiceError>;

    /// Fetch a project and its tasks together. Either failure fails the pair.
    async fn load_project_with_tasks(
        &self,
        project_id: i64,
    ) -> Result<(Project, Vec<Task>), ServiceError> {
        tokio::try_join!(self.get_project(project_id), self.list_tasks(project_id))
    }
}
