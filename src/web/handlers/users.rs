use crate::auth::{hash_password, JwtAuth};
use crate::error::validation_error;
use crate::models::{Role, Section, UserAccount, UserSummary};
use crate::web::{ApiResult, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: Role,
}

pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<JwtAuth>,
) -> ApiResult<Json<Vec<UserSummary>>> {
    auth.require(Section::Users)?;
    let mut users: Vec<UserSummary> = state
        .users
        .list()
        .await?
        .iter()
        .map(UserSummary::from)
        .collect();
    users.sort_by(|a, b| a.username.cmp(&b.username));
    Ok(Json(users))
}

pub async fn create_user(
    State(state): State<AppState>,
    Extension(auth): Extension<JwtAuth>,
    Json(new_user): Json<NewUser>,
) -> ApiResult<(StatusCode, Json<UserSummary>)> {
    auth.require(Section::Users)?;

    let username = new_user.username.trim();
    if username.is_empty() || new_user.password.is_empty() {
        return Err(validation_error("Username and password are required").into());
    }
    let existing = state.users.list().await?;
    if existing.iter().any(|user| user.username == username) {
        return Err(validation_error(&format!("User {} already exists", username)).into());
    }

    let account = state
        .users
        .insert(UserAccount {
            id: None,
            username: username.to_string(),
            password_hash: hash_password(&new_user.password)?,
            role: new_user.role,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(UserSummary::from(&account))))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<JwtAuth>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    auth.require(Section::Users)?;
    if auth.claims.sub == id {
        return Err(validation_error("You cannot delete your own account").into());
    }
    state.users.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
