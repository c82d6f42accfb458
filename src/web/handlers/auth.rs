use crate::auth::{AuthError, Credentials, JwtAuth, AUTH_COOKIE};
use crate::models::Section;
use crate::web::AppState;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::json;

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Log in and receive a token, both in the body and as a cookie
pub async fn login_handler(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Response, AuthError> {
    let login = state
        .auth_service
        .authenticate(&credentials.username, &credentials.password)
        .await?;

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Strict",
        AUTH_COOKIE, login.token
    );
    Ok(([(header::SET_COOKIE, cookie)], Json(login)).into_response())
}

/// The caller's identity and the sections their role opens
pub async fn me_handler(Extension(auth): Extension<JwtAuth>) -> impl IntoResponse {
    let sections: Vec<Section> = auth.claims.role.sections().to_vec();
    Json(json!({
        "_id": auth.claims.sub,
        "username": auth.claims.name,
        "role": auth.claims.role,
        "sections": sections,
    }))
}
