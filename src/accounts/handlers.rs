use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{error, instrument};

use crate::{
    accounts::{
        dto::{PublicUser, UserRequest, VerifyRequest, VerifyResponse},
        AccountError, LookupKind,
    },
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", put(update_user))
}

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/verify", post(verify))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<UserRequest>,
) -> Result<(StatusCode, Json<PublicUser>), (StatusCode, String)> {
    let user = state
        .accounts
        .create(&payload.username, &payload.email, &payload.password)
        .await
        .map_err(rejection)?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UserRequest>,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    let user = state
        .accounts
        .update(id, &payload.username, &payload.email, &payload.password)
        .await
        .map_err(rejection)?;
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<PublicUser>>, (StatusCode, String)> {
    let users = state.accounts.list_all().await.map_err(rejection)?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

#[instrument(skip(state, payload))]
pub async fn verify(
    State(state): State<AppState>,
    Json(payload): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, (StatusCode, String)> {
    let kind: LookupKind = payload.kind.parse().map_err(rejection)?;
    let verified = state
        .accounts
        .verify(kind, &payload.identifier, &payload.password)
        .await
        .map_err(rejection)?;
    Ok(Json(VerifyResponse { verified }))
}

fn rejection(e: AccountError) -> (StatusCode, String) {
    match e {
        AccountError::Conflict(_) => (StatusCode::CONFLICT, e.to_string()),
        AccountError::NotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
        AccountError::InvalidInput(_) => (StatusCode::BAD_REQUEST, e.to_string()),
        AccountError::Codec(_) | AccountError::Storage(_) => {
            error!(error = %e, "request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".into(),
            )
        }
    }
}
