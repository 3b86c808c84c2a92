use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};
use serde_json::json;

use crate::api::auth::public_user;
use crate::api::middleware::AuthUser;
use crate::api::{db_error, fail};
use crate::entities::user;

// GET /users/me
pub async fn get_me(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
) -> Response {
    match user::Entity::find_by_id(auth.id).one(&db).await {
        Ok(Some(u)) => (
            StatusCode::OK,
            Json(json!({"status": "success", "data": {"user": public_user(&u)}})),
        )
            .into_response(),
        Ok(None) => fail(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => db_error(e),
    }
}

#[derive(serde::Deserialize)]
pub struct UpdateMeRequest {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    password_confirm: Option<String>,
}

// PATCH /users/update-me
pub async fn update_me(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<UpdateMeRequest>,
) -> Response {
    // Password changes go through a dedicated flow, not the profile route
    if payload.password.is_some() || payload.password_confirm.is_some() {
        return fail(
            StatusCode::BAD_REQUEST,
            "This route is not for password updates.",
        );
    }

    let user = match user::Entity::find_by_id(auth.id).one(&db).await {
        Ok(Some(u)) => u,
        Ok(None) => return fail(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => return db_error(e),
    };

    let mut active_user = user.into_active_model();
    if let Some(name) = payload.name {
        active_user.name = Set(name.trim().to_string());
    }
    if let Some(email) = payload.email {
        active_user.email = Set(email.trim().to_lowercase());
    }
    active_user.updated_at = Set(chrono::Utc::now().naive_utc());

    match active_user.update(&db).await {
        Ok(u) => {
            tracing::Span::current()
                .record("table", "users")
                .record("action", "update_me")
                .record("user_id", u.id);
            (
                StatusCode::OK,
                Json(json!({"status": "success", "data": {"user": public_user(&u)}})),
            )
                .into_response()
        }
        Err(e) => db_error(e),
    }
}
