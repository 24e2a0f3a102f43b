use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use taskdeck_core::auth::{LoginRequest, RegisterRequest};
use tracing::debug;

use crate::state::{BackendState, UserRecord};

/// Email of the user a bearer token resolved to.
#[derive(Debug, Clone)]
pub(crate) struct CurrentUser(pub String);

/// SHA-256 hash a raw secret, returning the hex-encoded digest.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub(crate) fn routes() -> Router<BackendState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
}

async fn register(
    State(state): State<BackendState>,
    Json(input): Json<RegisterRequest>,
) -> (StatusCode, Json<Value>) {
    if input.email.trim().is_empty() || input.password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Email and password are required" })),
        );
    }
    let mut store = state.lock();
    if store.users.contains_key(&input.email) {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "Email is already registered" })),
        );
    }
    store.users.insert(
        input.email.clone(),
        UserRecord {
            name: input.name,
            email: input.email,
            password_hash: sha256_hex(&input.password),
        },
    );
    (
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    )
}

async fn login(
    State(state): State<BackendState>,
    Json(input): Json<LoginRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let user = {
        let store = state.lock();
        store
            .users
            .get(&input.email)
            .filter(|u| u.password_hash == sha256_hex(&input.password))
            .map(|u| (u.name.clone(), u.email.clone()))
    };
    let Some((name, email)) = user else {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid email or password" })),
        ));
    };
    let token = state.issue_token(&email);
    debug!(%email, "issued token");
    Ok(Json(json!({ "token": token, "name": name, "email": email })))
}

/// Rejects requests without a live `Authorization: Bearer <token>` header.
pub(crate) async fn auth_middleware(
    State(state): State<BackendState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let email = token.and_then(|t| state.lock().tokens.get(t).cloned());
    match email {
        Some(email) => {
            request.extensions_mut().insert(CurrentUser(email));
            next.run(request).await
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Unauthorized" })),
        )
            .into_response(),
    }
}
