//! HttpService and BlockingHttpService against the in-process fake backend.
//!
//! Each test spawns its own backend on 127.0.0.1:0 and drives the client
//! through the full request/response cycle.

use chrono::{Days, Local};
use taskdeck_core::auth::{LoginRequest, RegisterRequest};
use taskdeck_core::project::CreateProject;
use taskdeck_core::task::{CreateTask, TaskStatus};
use taskdeck_service::{
    BlockingHttpService, FileSessionStore, HttpService, ServiceError, SessionContext, TaskdeckApi,
};
use taskdeck_testkit::spawn_test_backend;

const EMAIL: &str = "ada@example.com";
const PASSWORD: &str = "password123";

fn login_request() -> LoginRequest {
    LoginRequest {
        email: EMAIL.into(),
        password: PASSWORD.into(),
    }
}

fn project(title: &str) -> CreateProject {
    CreateProject {
        title: title.into(),
        description: None,
    }
}

async fn signed_in(url: &str) -> HttpService {
    let svc = HttpService::new(url, SessionContext::in_memory());
    svc.login(&login_request()).await.unwrap();
    svc
}

#[tokio::test]
async fn register_then_login_stores_session() {
    let backend = spawn_test_backend().await;
    let svc = HttpService::new(&backend.base_url, SessionContext::in_memory());
    assert!(!svc.session().is_authenticated());

    let resp = svc
        .register(&RegisterRequest {
            name: "Ada".into(),
            email: EMAIL.into(),
            password: PASSWORD.into(),
        })
        .await
        .unwrap();
    assert_eq!(resp.message.as_deref(), Some("User registered successfully"));
    // Registering does not sign anyone in.
    assert!(!svc.session().is_authenticated());

    let session = svc.login(&login_request()).await.unwrap();
    assert!(!session.token.is_empty());
    assert_eq!(session.display_name(), Some("Ada"));
    assert_eq!(svc.session().token(), Some(session.token));
}

#[tokio::test]
async fn wrong_password_is_unauthorized_and_stores_nothing() {
    let backend = spawn_test_backend().await;
    backend.state.add_user("Ada", EMAIL, PASSWORD);
    let svc = HttpService::new(&backend.base_url, SessionContext::in_memory());

    let err = svc
        .login(&LoginRequest {
            email: EMAIL.into(),
            password: "wrong".into(),
        })
        .await
        .unwrap_err();
    // A 401 on login is still a 401: nothing was stored.
    assert!(err.is_unauthorized());
    assert!(!svc.session().is_authenticated());
}

#[tokio::test]
async fn duplicate_registration_is_an_api_error() {
    let backend = spawn_test_backend().await;
    backend.state.add_user("Ada", EMAIL, PASSWORD);
    let svc = HttpService::new(&backend.base_url, SessionContext::in_memory());

    let err = svc
        .register(&RegisterRequest {
            name: "Ada".into(),
            email: EMAIL.into(),
            password: PASSWORD.into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Api { status: 409, .. }));
    assert_eq!(
        err.user_message("Registration failed"),
        "Email is already registered"
    );
}

#[tokio::test]
async fn project_create_get_list() {
    let backend = spawn_test_backend().await;
    backend.state.add_user("Ada", EMAIL, PASSWORD);
    let svc = signed_in(&backend.base_url).await;

    assert!(svc.list_projects().await.unwrap().is_empty());

    let created = svc
        .create_project(&CreateProject {
            title: "Launch".into(),
            description: Some("Ship it".into()),
        })
        .await
        .unwrap();
    assert_eq!(created.title, "Launch");
    assert_eq!(created.description.as_deref(), Some("Ship it"));
    assert_eq!(created.total_tasks, 0);

    let fetched = svc.get_project(created.id).await.unwrap();
    assert_eq!(fetched.id, created.id);

    svc.create_project(&project("Second")).await.unwrap();
    assert_eq!(svc.list_projects().await.unwrap().len(), 2);
}

#[tokio::test]
async fn missing_project_is_not_found() {
    let backend = spawn_test_backend().await;
    backend.state.add_user("Ada", EMAIL, PASSWORD);
    let svc = signed_in(&backend.base_url).await;

    let err = svc.get_project(999).await.unwrap_err();
    assert!(matches!(err, ServiceError::Api { status: 404, .. }));
    assert_eq!(err.to_string(), "Project not found");
}

#[tokio::test]
async fn task_with_only_a_title_starts_pending() {
    let backend = spawn_test_backend().await;
    backend.state.add_user("Ada", EMAIL, PASSWORD);
    let svc = signed_in(&backend.base_url).await;
    let p = svc.create_project(&project("Launch")).await.unwrap();

    let task = svc
        .create_task(
            p.id,
            &CreateTask {
                title: "Write docs".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.due_date, None);

    let tasks = svc.list_tasks(p.id).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Write docs");
    assert_eq!(tasks[0].status, TaskStatus::Pending);
}

#[tokio::test]
async fn toggle_twice_restores_status_and_moves_progress() {
    let backend = spawn_test_backend().await;
    backend.state.add_user("Ada", EMAIL, PASSWORD);
    let svc = signed_in(&backend.base_url).await;
    let p = svc.create_project(&project("Launch")).await.unwrap();
    let a = svc
        .create_task(p.id, &CreateTask { title: "a".into(), ..Default::default() })
        .await
        .unwrap();
    svc.create_task(p.id, &CreateTask { title: "b".into(), ..Default::default() })
        .await
        .unwrap();

    let toggled = svc.toggle_task(p.id, a.id).await.unwrap();
    assert_eq!(toggled.status, TaskStatus::Completed);
    let after = svc.get_project(p.id).await.unwrap();
    assert_eq!(after.completed_tasks, 1);
    assert_eq!(after.progress().percent(), 50);

    let back = svc.toggle_task(p.id, a.id).await.unwrap();
    assert_eq!(back.status, TaskStatus::Pending);
    assert_eq!(svc.get_project(p.id).await.unwrap().completed_tasks, 0);
}

#[tokio::test]
async fn delete_removes_task() {
    let backend = spawn_test_backend().await;
    backend.state.add_user("Ada", EMAIL, PASSWORD);
    let svc = signed_in(&backend.base_url).await;
    let p = svc.create_project(&project("Launch")).await.unwrap();
    let t = svc
        .create_task(p.id, &CreateTask { title: "gone".into(), ..Default::default() })
        .await
        .unwrap();

    svc.delete_task(p.id, t.id).await.unwrap();
    assert!(svc.list_tasks(p.id).await.unwrap().is_empty());

    let err = svc.delete_task(p.id, t.id).await.unwrap_err();
    assert_eq!(err.to_string(), "Task not found");
}

#[tokio::test]
async fn load_project_with_tasks_fetches_both() {
    let backend = spawn_test_backend().await;
    backend.state.add_user("Ada", EMAIL, PASSWORD);
    let seeded = backend.state.add_project(EMAIL, "Seeded", Some("from state"));
    backend
        .state
        .add_task(seeded.id, "one", None, TaskStatus::Completed);
    backend.state.add_task(seeded.id, "two", None, TaskStatus::Pending);
    let svc = signed_in(&backend.base_url).await;

    let (p, tasks) = svc.load_project_with_tasks(seeded.id).await.unwrap();
    assert_eq!(p.title, "Seeded");
    assert_eq!(p.total_tasks, 2);
    assert_eq!(tasks.len(), 2);

    let err = svc.load_project_with_tasks(seeded.id + 100).await.unwrap_err();
    assert_eq!(err.to_string(), "Project not found");
}

#[tokio::test]
async fn backend_validation_message_is_verbatim() {
    let backend = spawn_test_backend().await;
    backend.state.add_user("Ada", EMAIL, PASSWORD);
    let svc = signed_in(&backend.base_url).await;
    let p = svc.create_project(&project("Launch")).await.unwrap();

    let err = svc
        .create_task(p.id, &CreateTask { title: "  ".into(), ..Default::default() })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Api { status: 400, .. }));
    assert_eq!(err.user_message("Failed to create task"), "title is required");

    let yesterday = Local::now().date_naive().checked_sub_days(Days::new(1));
    let err = svc
        .create_task(
            p.id,
            &CreateTask {
                title: "late".into(),
                description: None,
                due_date: yesterday,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Due date cannot be in the past");
}

#[tokio::test]
async fn expired_token_clears_stored_session() {
    let backend = spawn_test_backend().await;
    backend.state.add_user("Ada", EMAIL, PASSWORD);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let svc = HttpService::new(
        &backend.base_url,
        SessionContext::new(FileSessionStore::new(&path)),
    );
    svc.login(&login_request()).await.unwrap();
    assert!(path.exists());

    backend.state.revoke_tokens();
    let err = svc.list_projects().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(!svc.session().is_authenticated());
    assert!(!path.exists());

    // A fresh context over the same file starts signed out.
    let reopened = SessionContext::new(FileSessionStore::new(&path));
    assert!(!reopened.is_authenticated());
}

#[tokio::test]
async fn stored_session_is_reused_across_clients() {
    let backend = spawn_test_backend().await;
    backend.state.add_user("Ada", EMAIL, PASSWORD);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let first = HttpService::new(
        &backend.base_url,
        SessionContext::new(FileSessionStore::new(&path)),
    );
    first.login(&login_request()).await.unwrap();
    first.create_project(&project("Persisted")).await.unwrap();

    let second = HttpService::new(
        &backend.base_url,
        SessionContext::new(FileSessionStore::new(&path)),
    );
    let projects = second.list_projects().await.unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].title, "Persisted");
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let svc = HttpService::new(&format!("http://{addr}/api"), SessionContext::in_memory());
    let err = svc.login(&login_request()).await.unwrap_err();
    assert!(err.is_network());
    assert_eq!(err.user_message("Login failed"), "Login failed");
}

#[tokio::test]
async fn logout_forgets_token() {
    let backend = spawn_test_backend().await;
    backend.state.add_user("Ada", EMAIL, PASSWORD);
    let svc = signed_in(&backend.base_url).await;
    svc.logout();
    assert!(!svc.session().is_authenticated());

    let err = svc.list_projects().await.unwrap_err();
    assert!(err.is_unauthorized());
}

// ---- BlockingHttpService ----

// BlockingHttpService owns a runtime, so the backend runs on its own thread
// to avoid nesting runtimes.
fn spawn_blocking_backend() -> (String, taskdeck_testkit::BackendState) {
    let (tx, rx) = std::sync::mpsc::sync_channel(1);
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let backend = spawn_test_backend().await;
            tx.send((backend.base_url.clone(), backend.state.clone()))
                .unwrap();
            std::future::pending::<()>().await;
        });
    });
    rx.recv().unwrap()
}

#[test]
fn blocking_round_trip() {
    let (url, state) = spawn_blocking_backend();
    state.add_user("Ada", EMAIL, PASSWORD);
    let svc = BlockingHttpService::new(&url, SessionContext::in_memory()).unwrap();

    svc.login(&login_request()).unwrap();
    assert!(svc.is_authenticated());

    let p = svc.create_project(&project("Blocking")).unwrap();
    let t = svc
        .create_task(p.id, &CreateTask { title: "t".into(), ..Default::default() })
        .unwrap();
    assert_eq!(
        svc.toggle_task(p.id, t.id).unwrap().status,
        TaskStatus::Completed
    );

    let (loaded, tasks) = svc.load_project_with_tasks(p.id).unwrap();
    assert_eq!(loaded.completed_tasks, 1);
    assert_eq!(tasks.len(), 1);

    svc.delete_task(p.id, t.id).unwrap();
    assert!(svc.list_tasks(p.id).unwrap().is_empty());

    svc.logout();
    assert!(!svc.is_authenticated());
}
