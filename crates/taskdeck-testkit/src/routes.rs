use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, put},
    Extension, Json, Router,
};
use chrono::Local;
use serde_json::{json, Value};
use taskdeck_core::project::CreateProject;
use taskdeck_core::task::{CreateTask, TaskStatus};
use tracing::debug;

use crate::auth::{self, auth_middleware, CurrentUser};
use crate::state::{BackendState, ProjectRecord, TaskRecord};

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

enum BackendError {
    NotFound(&'static str),
    InvalidInput(String),
}

fn to_error(e: BackendError) -> (StatusCode, Json<Value>) {
    let (status, msg) = match e {
        BackendError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
        BackendError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
    };
    (status, Json(json!({ "message": msg })))
}

pub(crate) fn build_router(state: BackendState) -> Router {
    let protected = Router::new()
        .route("/api/projects", get(list_projects).post(create_project))
        .route("/api/projects/{id}", get(get_project))
        .route(
            "/api/projects/{id}/tasks",
            get(list_tasks).post(create_task),
        )
        .route(
            "/api/projects/{id}/tasks/{task_id}",
            axum::routing::delete(delete_task),
        )
        .route(
            "/api/projects/{id}/tasks/{task_id}/toggle",
            put(toggle_task),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    auth::routes().merge(protected).with_state(state)
}

async fn list_projects(
    State(state): State<BackendState>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
) -> Json<Value> {
    let store = state.lock();
    let projects: Vec<_> = store
        .projects
        .iter()
        .filter(|p| p.owner == owner)
        .filter_map(|p| store.project_view(p.id, &owner))
        .collect();
    Json(json!(projects))
}

async fn get_project(
    State(state): State<BackendState>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    state
        .lock()
        .project_view(id, &owner)
        .map(|p| Json(json!(p)))
        .ok_or_else(|| to_error(BackendError::NotFound("Project")))
}

async fn create_project(
    State(state): State<BackendState>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    Json(input): Json<CreateProject>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(to_error(BackendError::InvalidInput(
            "Title is required".into(),
        )));
    }
    let mut store = state.lock();
    let id = store.next_id();
    store.projects.push(ProjectRecord {
        id,
        owner: owner.clone(),
        title: title.to_string(),
        description: input.description,
        created_at: Local::now().naive_local(),
    });
    debug!(id, %owner, "project created");
    store
        .project_view(id, &owner)
        .map(|p| (StatusCode::CREATED, Json(json!(p))))
        .ok_or_else(|| to_error(BackendError::NotFound("Project")))
}

async fn list_tasks(
    State(state): State<BackendState>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let store = state.lock();
    if !store.owns_project(id, &owner) {
        return Err(to_error(BackendError::NotFound("Project")));
    }
    let tasks: Vec<_> = store
        .tasks
        .iter()
        .filter(|t| t.project_id == id)
        .map(TaskRecord::to_task)
        .collect();
    Ok(Json(json!(tasks)))
}

async fn create_task(
    State(state): State<BackendState>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(input): Json<CreateTask>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(to_error(BackendError::InvalidInput(
            "title is required".into(),
        )));
    }
    let today = Local::now().date_naive();
    if input.due_date.is_some_and(|d| d < today) {
        return Err(to_error(BackendError::InvalidInput(
            "Due date cannot be in the past".into(),
        )));
    }
    let mut store = state.lock();
    if !store.owns_project(id, &owner) {
        return Err(to_error(BackendError::NotFound("Project")));
    }
    let task_id = store.next_id();
    let record = TaskRecord {
        id: task_id,
        project_id: id,
        title: title.to_string(),
        description: input.description,
        due_date: input.due_date,
        status: TaskStatus::Pending,
        created_at: Local::now().naive_local(),
    };
    let task = record.to_task();
    store.tasks.push(record);
    Ok((StatusCode::CREATED, Json(json!(task))))
}

async fn toggle_task(
    State(state): State<BackendState>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    Path((id, task_id)): Path<(i64, i64)>,
) -> ApiResult<Json<Value>> {
    let mut store = state.lock();
    if !store.owns_project(id, &owner) {
        return Err(to_error(BackendError::NotFound("Project")));
    }
    let task = store
        .tasks
        .iter_mut()
        .find(|t| t.id == task_id && t.project_id == id)
        .ok_or_else(|| to_error(BackendError::NotFound("Task")))?;
    task.status = task.status.toggled();
    Ok(Json(json!(task.to_task())))
}

async fn delete_task(
    State(state): State<BackendState>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    Path((id, task_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    let mut store = state.lock();
    if !store.owns_project(id, &owner) {
        return Err(to_error(BackendError::NotFound("Project")));
    }
    let before = store.tasks.len();
    store
        .tasks
        .retain(|t| !(t.id == task_id && t.project_id == id));
    if store.tasks.len() == before {
        return Err(to_error(BackendError::NotFound("Task")));
    }
    Ok(StatusCode::NO_CONTENT)
}
