use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    http::StatusCode,
    Json,
};
use models::{User, UserId, UserInput};
use service::ServiceError;
use tracing::{debug, error};

use crate::errors::JsonApiError;
use crate::observability::{
    USERS_CREATED_TOTAL, USERS_DELETED_TOTAL, USERS_STORED, VALIDATION_FAILURES_TOTAL,
};
use crate::routes::ServerState;

fn user_id(path: Result<Path<UserId>, PathRejection>) -> Result<UserId, JsonApiError> {
    path.map(|Path(id)| id).map_err(|e| JsonApiError::bad_request(e.body_text()))
}

fn user_input(body: Result<Json<UserInput>, JsonRejection>) -> Result<UserInput, JsonApiError> {
    body.map(|Json(input)| input).map_err(|e| JsonApiError::bad_request(e.body_text()))
}

fn reject(op: &'static str, e: ServiceError) -> JsonApiError {
    match e {
        ServiceError::Validation(_) => {
            VALIDATION_FAILURES_TOTAL.inc();
            debug!(op, error = %e, "user request rejected");
        }
        ServiceError::NotFound(_) => debug!(op, error = %e, "user request rejected"),
        ServiceError::IdsExhausted => error!(op, error = %e, "user id space exhausted"),
    }
    e.into()
}

/// List all users, ascending by id
pub async fn list_users(State(state): State<ServerState>) -> Json<Vec<User>> {
    Json(state.users.list().await)
}

/// Fetch one user
pub async fn get_user(
    State(state): State<ServerState>,
    path: Result<Path<UserId>, PathRejection>,
) -> Result<Json<User>, JsonApiError> {
    let id = user_id(path)?;
    state.users.get(id).await
        .map(Json)
        .map_err(|e| reject("get", e))
}

/// Create a user; the id is assigned by the store
pub async fn create_user(
    State(state): State<ServerState>,
    body: Result<Json<UserInput>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), JsonApiError> {
    let input = user_input(body)?;
    let created = state.users.create(input).await.map_err(|e| reject("create", e))?;
    USERS_CREATED_TOTAL.inc();
    USERS_STORED.inc();
    debug!(id = created.id, "user created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace every field of a user
pub async fn update_user(
    State(state): State<ServerState>,
    path: Result<Path<UserId>, PathRejection>,
    body: Result<Json<UserInput>, JsonRejection>,
) -> Result<Json<User>, JsonApiError> {
    let id = user_id(path)?;
    let input = user_input(body)?;
    state.users.update(id, input).await
        .map(Json)
        .map_err(|e| reject("update", e))
}

/// Delete a user
pub async fn delete_user(
    State(state): State<ServerState>,
    path: Result<Path<UserId>, PathRejection>,
) -> Result<StatusCode, JsonApiError> {
    let id = user_id(path)?;
    state.users.delete(id).await.map_err(|e| reject("delete", e))?;
    USERS_DELETED_TOTAL.inc();
    USERS_STORED.dec();
    Ok(StatusCode::NO_CONTENT)
}
