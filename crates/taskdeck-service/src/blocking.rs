use taskdeck_core::auth::{LoginRequest, RegisterRequest, RegisterResponse};
use taskdeck_core::project::{CreateProject, Project};
use taskdeck_core::task::{CreateTask, Task};
use tokio::runtime::Runtime;

use crate::session::{Session, SessionContext};
use crate::{HttpService, ServiceError, TaskdeckApi};

/// Blocking wrapper around the async `HttpService`.
///
/// Owns a tokio runtime and uses `block_on()` for each call, for sync
/// callers like the TUI event loop.
pub struct BlockingHttpService {
    inner: HttpService,
    rt: Runtime,
}

impl BlockingHttpService {
    pub fn new(base_url: &str, session: SessionContext) -> Result<Self, ServiceError> {
        let rt = Runtime::new()
            .map_err(|e| ServiceError::Internal(format!("failed to create tokio runtime: {e}")))?;
        Ok(Self {
            inner: HttpService::new(base_url, session),
            rt,
        })
    }

    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }

    pub fn session(&self) -> &SessionContext {
        self.inner.session()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.session().is_authenticated()
    }

    pub fn logout(&self) {
        self.inner.logout()
    }

    // -- Trait method delegates --

    pub fn login(&self, input: &LoginRequest) -> Result<Session, ServiceError> {
        self.rt.block_on(self.inner.login(input))
    }

    pub fn register(&self, input: &RegisterRequest) -> Result<RegisterResponse, ServiceError> {
        self.rt.block_on(self.inner.register(input))
    }

    pub fn list_projects(&self) -> Result<Vec<Project>, ServiceError> {
        self.rt.block_on(self.inner.list_projects())
    }

    pub fn get_project(&self, id: i64) -> Result<Project, ServiceError> {
        self.rt.block_on(self.inner.get_project(id))
    }

    pub fn create_project(&self, input: &CreateProject) -> Result<Project, ServiceError> {
        self.rt.block_on(self.inner.create_project(input))
    }

    pub fn list_tasks(&self, project_id: i64) -> Result<Vec<Task>, ServiceError> {
        self.rt.block_on(self.inner.list_tasks(project_id))
    }

    pub fn create_task(&self, project_id: i64, input: &CreateTask) -> Result<Task, ServiceError> {
        self.rt.block_on(self.inner.create_task(project_id, input))
    }

    pub fn toggle_task(&self, project_id: i64, task_id: i64) -> Result<Task, ServiceError> {
        self.rt.block_on(self.inner.toggle_task(project_id, task_id))
    }

    pub fn delete_task(&self, project_id: i64, task_id: i64) -> Result<(), ServiceError> {
        self.rt.block_on(self.inner.delete_task(project_id, task_id))
    }

    pub fn load_project_with_tasks(
        &self,
        project_id: i64,
    ) -> Result<(Project, Vec<Task>), ServiceError> {
        self.rt
            .block_on(self.inner.load_project_with_tasks(project_id))
    }
}
