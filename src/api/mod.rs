use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub mod auth;
pub mod care_log;
pub mod config;
pub mod middleware;
pub mod plant;
pub mod room;
pub mod token;
pub mod user;

// One envelope everywhere: client failures are {"status":"fail"},
// unexpected failures {"status":"error"}.

pub(crate) fn fail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"status": "fail", "message": message}))).into_response()
}

pub(crate) fn internal_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"status": "error", "message": message})),
    )
        .into_response()
}

pub(crate) fn db_error(e: sea_orm::DbErr) -> Response {
    tracing::Span::current().record("error", tracing::field::display(&e));
    internal_error(&e.to_string())
}
