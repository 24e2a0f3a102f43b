use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use taskdeck_core::auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use taskdeck_core::project::{CreateProject, Project};
use taskdeck_core::task::{CreateTask, Task};
use tracing::{debug, warn};

use crate::session::{Session, SessionContext};
use crate::{ApiResponse, ServiceError, TaskdeckApi};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/api";

/// Async HTTP client for the task-manager backend.
///
/// Attaches the bearer token from the shared [`SessionContext`] and turns a
/// 401 from any endpoint into a cleared session plus
/// [`ServiceError::Unauthorized`].
pub struct HttpService {
    base_url: String,
    client: Client,
    session: SessionContext,
}

impl HttpService {
    pub fn new(base_url: &str, session: SessionContext) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            client: Client::new(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Forget the current user.
    pub fn logout(&self) {
        self.session.invalidate();
    }

    /// Issue a request without a body.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
    ) -> Result<ApiResponse<T>, ServiceError> {
        let builder = self.builder(method, path);
        self.execute(builder).await
    }

    /// Issue a request with a JSON body.
    pub async fn request_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse<T>, ServiceError> {
        let builder = self.builder(method, path).json(body);
        self.execute(builder).await
    }

    fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "request");
        let builder = self
            .client
            .request(method, format!("{}{path}", self.base_url));
        if !requires_auth(path) {
            return builder;
        }
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<ApiResponse<T>, ServiceError> {
        let resp = builder.send().await.map_err(|e| {
            warn!("request failed without a response: {e}");
            ServiceError::Network(e.to_string())
        })?;
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!(url = %resp.url(), "backend returned 401, clearing session");
            self.session.invalidate();
            return Err(ServiceError::Unauthorized);
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ServiceError::Network(format!("read body: {e}")))?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        Ok(ApiResponse {
            data: decode_body(&body)?,
            status: status.as_u16(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ServiceError> {
        Ok(self.request(Method::GET, path).await?.data)
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        Ok(self.request_json(Method::POST, path, body).await?.data)
    }
}

/// Login and registration are the only anonymous endpoints.
fn requires_auth(path: &str) -> bool {
    !path.starts_with("/auth/")
}

/// An empty body (204, or a bare 200) decodes as JSON `null`.
fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ServiceError> {
    let text = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(text).map_err(|e| ServiceError::Decode(format!("json decode: {e}")))
}

fn api_error(status: StatusCode, body: &str) -> ServiceError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v["message"]
                .as_str()
                .or_else(|| v["error"].as_str())
                .map(String::from)
        })
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
    ServiceError::Api {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl TaskdeckApi for HttpService {
    async fn login(&self, input: &LoginRequest) -> Result<Session, ServiceError> {
        let resp: LoginResponse = self.post_json("/auth/login", input).await?;
        let session = Session::from(resp);
        self.session.establish(session.clone())?;
        Ok(session)
    }

    async fn register(&self, input: &RegisterRequest) -> Result<RegisterResponse, ServiceError> {
        let resp: Option<RegisterResponse> = self.post_json("/auth/register", input).await?;
        Ok(resp.unwrap_or_default())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, ServiceError> {
        self.get_json("/projects").await
    }

    async fn get_project(&self, id: i64) -> Result<Project, ServiceError> {
        self.get_json(&format!("/projects/{id}")).await
    }

    async fn create_project(&self, input: &CreateProject) -> Result<Project, ServiceError> {
        self.post_json("/projects", input).await
    }

    async fn list_tasks(&self, project_id: i64) -> Result<Vec<Task>, ServiceError> {
        self.get_json(&format!("/projects/{project_id}/tasks")).await
    }

    async fn create_task(
        &self,
        project_id: i64,
        input: &CreateTask,
    ) -> Result<Task, ServiceError> {
        self.post_json(&format!("/projects/{project_id}/tasks"), input)
            .await
    }

    async fn toggle_task(&self, project_id: i64, task_id: i64) -> Result<Task, ServiceError> {
        let resp: ApiResponse<Task> = self
            .request(
                Method::PUT,
                &format!("/projects/{project_id}/tasks/{task_id}/toggle"),
            )
            .await?;
        Ok(resp.data)
    }

    async fn delete_task(&self, project_id: i64, task_id: i64) -> Result<(), ServiceError> {
        let resp: ApiResponse<Option<serde_json::Value>> = self
            .request(
                Method::DELETE,
                &format!("/projects/{project_id}/tasks/{task_id}"),
            )
            .await?;
        debug!(status = resp.status, project_id, task_id, "task deleted");
        Ok(())
    }
}
