//! In-process fake of the task-manager backend, for tests.
//!
//! Speaks the same REST contract as the real server under `/api`, keeps
//! everything in memory, and exposes [`BackendState`] so tests can seed data
//! or revoke tokens behind the client's back.

mod auth;
mod routes;
mod state;

use axum::Router;
use tokio::net::TcpListener;

pub use auth::sha256_hex;
pub use state::BackendState;

/// Build the router over `state`.
pub fn router(state: BackendState) -> Router {
    routes::build_router(state)
}

/// A running fake backend with its base URL (including the `/api` prefix).
pub struct TestBackend {
    pub base_url: String,
    pub state: BackendState,
    _handle: tokio::task::JoinHandle<()>,
}

/// Spawn the fake backend on a random local port.
pub async fn spawn_test_backend() -> TestBackend {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}/api");
    let state = BackendState::default();
    let app = router(state.clone());
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestBackend {
        base_url,
        state,
        _handle: handle,
    }
}
