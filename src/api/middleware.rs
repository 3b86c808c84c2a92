use axum::{
    extract::{Extension, Request},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde_json::json;

use crate::api::token::{self, TokenError};
use crate::entities::user;

/// The authenticated caller, injected into request extensions by
/// `auth_middleware` and consumed by every protected handler.
#[derive(Clone)]
pub struct AuthUser {
    pub id: i32,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

pub async fn auth_middleware(
    Extension(db): Extension<DatabaseConnection>,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    let Some(raw_token) = bearer else {
        return unauthorized("You are not logged in. Please log in to get access.");
    };

    let claims = match token::decode_token(raw_token, &token::jwt_secret()) {
        Ok(claims) => claims,
        Err(TokenError::Expired) => {
            return unauthorized("Your token has expired. Please log in again.")
        }
        Err(TokenError::Invalid) => {
            return unauthorized("Invalid token. Please log in again.")
        }
    };

    let Ok(user_id) = claims.sub.parse::<i32>() else {
        return unauthorized("Invalid token. Please log in again.");
    };

    // The account may have been deleted since the token was issued
    let user = match user::Entity::find_by_id(user_id).one(&db).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return unauthorized("The user belonging to this token no longer exists.")
        }
        Err(e) => {
            tracing::error!("auth lookup failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": "error", "message": e.to_string()})),
            )
                .into_response();
        }
    };

    request.extensions_mut().insert(AuthUser {
        id: user.id,
        role: user.role,
    });
    next.run(request).await
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"status": "fail", "message": message})),
    )
        .into_response()
}
