use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde_json::json;
use tracing::field::display;

use crate::api::token;
use crate::api::{db_error, fail, internal_error};
use crate::entities::user;

#[derive(serde::Deserialize)]
pub struct RegisterRequest {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

pub async fn register(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<RegisterRequest>,
) -> Response {
    let (Some(name), Some(email), Some(password)) =
        (payload.name, payload.email, payload.password)
    else {
        return fail(
            StatusCode::BAD_REQUEST,
            "Please provide name, email and password",
        );
    };

    if password.len() < 8 {
        return fail(
            StatusCode::BAD_REQUEST,
            "Password must be at least 8 characters",
        );
    }

    let email = email.trim().to_lowercase();

    match user::Entity::find()
        .filter(user::Column::Email.eq(email.clone()))
        .one(&db)
        .await
    {
        Ok(Some(_)) => return fail(StatusCode::BAD_REQUEST, "Email already in use"),
        Ok(None) => {}
        Err(e) => return db_error(e),
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = match Argon2::default().hash_password(password.as_bytes(), &salt) {
        Ok(hash) => hash.to_string(),
        Err(_) => return internal_error("Failed to hash password"),
    };

    let now = chrono::Utc::now().naive_utc();
    let new_user = user::ActiveModel {
        name: Set(name.trim().to_string()),
        email: Set(email),
        password_hash: Set(password_hash),
        role: Set("user".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_user.insert(&db).await {
        Ok(user) => {
            tracing::Span::current()
                .record("table", "users")
                .record("action", "register_user")
                .record("user_id", user.id)
                .record("business_event", "User registered successfully");

            metrics::counter!("folias_users_registered_total").increment(1);
            metrics::gauge!("folias_users_total").increment(1.0);

            let token = match token::issue_token(user.id, &token::jwt_secret()) {
                Ok(t) => t,
                Err(_) => return internal_error("Failed to issue token"),
            };

            (
                StatusCode::CREATED,
                Json(json!({
                    "status": "success",
                    "token": token,
                    "data": { "user": public_user(&user) },
                })),
            )
                .into_response()
        }
        Err(e) => {
            tracing::Span::current()
                .record("table", "users")
                .record("action", "register_user_error")
                .record("error", display(&e));
            db_error(e)
        }
    }
}

#[derive(serde::Deserialize)]
pub struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

pub async fn login(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<LoginRequest>,
) -> Response {
    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return fail(StatusCode::BAD_REQUEST, "Please provide email and password");
    };

    let user = match user::Entity::find()
        .filter(user::Column::Email.eq(email.trim().to_lowercase()))
        .one(&db)
        .await
    {
        Ok(Some(u)) => u,
        Ok(None) => return fail(StatusCode::UNAUTHORIZED, "Incorrect email or password"),
        Err(e) => return db_error(e),
    };

    let parsed_hash = match PasswordHash::new(&user.password_hash) {
        Ok(h) => h,
        Err(_) => return internal_error("Invalid password hash in DB"),
    };

    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        tracing::Span::current()
            .record("table", "users")
            .record("action", "login_user_failed")
            .record("error", "invalid_credentials");
        return fail(StatusCode::UNAUTHORIZED, "Incorrect email or password");
    }

    let token = match token::issue_token(user.id, &token::jwt_secret()) {
        Ok(t) => t,
        Err(_) => return internal_error("Failed to issue token"),
    };

    tracing::Span::current()
        .record("table", "users")
        .record("action", "login_user")
        .record("user_id", user.id)
        .record("business_event", "User logged in successfully");

    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "token": token,
            "data": { "user": public_user(&user) },
        })),
    )
        .into_response()
}

/// The user as exposed over the API; the password hash never leaves the row.
pub fn public_user(user: &user::Model) -> serde_json::Value {
    json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
        "role": user.role,
    })
}
