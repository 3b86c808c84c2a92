use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, Set,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::middleware::AuthUser;
use crate::api::{db_error, fail};
use crate::entities::config_entry;

/// Map a URL segment (`plant-types`) onto the stored discriminator
/// (`plant_type`). Unknown segments fall through to 404.
fn parse_kind(segment: &str) -> Option<&'static str> {
    match segment {
        "plant-types" => Some("plant_type"),
        "soil-types" => Some("soil_type"),
        "pot-sizes" => Some("pot_size"),
        "light-conditions" => Some("light_condition"),
        _ => None,
    }
}

fn unknown_kind() -> Response {
    fail(StatusCode::NOT_FOUND, "Unknown configuration type")
}

/// Lookup tables are deployment-global; changing them is an admin
/// capability, checked as a precondition on every mutating operation.
fn forbid_non_admin(auth: &AuthUser) -> Option<Response> {
    if auth.is_admin() {
        None
    } else {
        Some(fail(
            StatusCode::FORBIDDEN,
            "You do not have permission to perform this action",
        ))
    }
}

async fn find_entry(
    db: &DatabaseConnection,
    kind: &str,
    id: i32,
) -> Result<Option<config_entry::Model>, sea_orm::DbErr> {
    config_entry::Entity::find_by_id(id)
        .filter(config_entry::Column::Kind.eq(kind))
        .one(db)
        .await
}

// GET /config/:kind
pub async fn list_entries(
    Extension(db): Extension<DatabaseConnection>,
    Path(kind): Path<String>,
) -> Response {
    let Some(kind) = parse_kind(&kind) else {
        return unknown_kind();
    };

    match config_entry::Entity::find()
        .filter(config_entry::Column::Kind.eq(kind))
        .all(&db)
        .await
    {
        Ok(entries) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "results": entries.len(),
                "data": { "entries": entries },
            })),
        )
            .into_response(),
        Err(e) => db_error(e),
    }
}

#[derive(Deserialize)]
pub struct CreateConfigEntryRequest {
    slug: String,
    label: String,
}

// POST /config/:kind
pub async fn create_entry(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(kind): Path<String>,
    Json(payload): Json<CreateConfigEntryRequest>,
) -> Response {
    let Some(kind) = parse_kind(&kind) else {
        return unknown_kind();
    };
    if let Some(r) = forbid_non_admin(&auth) {
        return r;
    }

    let slug = payload.slug.trim().to_string();
    let label = payload.label.trim().to_string();
    if slug.is_empty() || label.is_empty() {
        return fail(StatusCode::BAD_REQUEST, "Slug and label are required");
    }

    match config_entry::Entity::find()
        .filter(config_entry::Column::Kind.eq(kind))
        .filter(config_entry::Column::Slug.eq(slug.clone()))
        .one(&db)
        .await
    {
        Ok(Some(_)) => {
            return fail(
                StatusCode::BAD_REQUEST,
                "An entry with this slug already exists",
            )
        }
        Ok(None) => {}
        Err(e) => return db_error(e),
    }

    let now = chrono::Utc::now().naive_utc();
    let new_entry = config_entry::ActiveModel {
        kind: Set(kind.to_string()),
        slug: Set(slug),
        label: Set(label),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_entry.insert(&db).await {
        Ok(entry) => {
            tracing::Span::current()
                .record("table", "config_entries")
                .record("action", "create_config_entry")
                .record("user_id", auth.id);
            (
                StatusCode::CREATED,
                Json(json!({"status": "success", "data": {"entry": entry}})),
            )
                .into_response()
        }
        Err(e) => db_error(e),
    }
}

// GET /config/:kind/:id
pub async fn get_entry(
    Extension(db): Extension<DatabaseConnection>,
    Path((kind, id)): Path<(String, i32)>,
) -> Response {
    let Some(kind) = parse_kind(&kind) else {
        return unknown_kind();
    };

    match find_entry(&db, kind, id).await {
        Ok(Some(entry)) => (
            StatusCode::OK,
            Json(json!({"status": "success", "data": {"entry": entry}})),
        )
            .into_response(),
        Ok(None) => fail(StatusCode::NOT_FOUND, "Configuration entry not found"),
        Err(e) => db_error(e),
    }
}

#[derive(Deserialize)]
pub struct UpdateConfigEntryRequest {
    slug: Option<String>,
    label: Option<String>,
}

// PATCH /config/:kind/:id
pub async fn update_entry(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path((kind, id)): Path<(String, i32)>,
    Json(payload): Json<UpdateConfigEntryRequest>,
) -> Response {
    let Some(kind) = parse_kind(&kind) else {
        return unknown_kind();
    };
    if let Some(r) = forbid_non_admin(&auth) {
        return r;
    }

    let entry = match find_entry(&db, kind, id).await {
        Ok(Some(entry)) => entry,
        Ok(None) => return fail(StatusCode::NOT_FOUND, "Configuration entry not found"),
        Err(e) => return db_error(e),
    };

    if let Some(slug) = payload.slug.as_deref() {
        let slug = slug.trim();
        if slug.is_empty() {
            return fail(StatusCode::BAD_REQUEST, "Slug and label are required");
        }
        match config_entry::Entity::find()
            .filter(config_entry::Column::Kind.eq(kind))
            .filter(config_entry::Column::Slug.eq(slug))
            .filter(config_entry::Column::Id.ne(entry.id))
            .one(&db)
            .await
        {
            Ok(Some(_)) => {
                return fail(
                    StatusCode::BAD_REQUEST,
                    "An entry with this slug already exists",
                )
            }
            Ok(None) => {}
            Err(e) => return db_error(e),
        }
    }

    let mut active_entry = entry.into_active_model();
    if let Some(slug) = payload.slug {
        active_entry.slug = Set(slug.trim().to_string());
    }
    if let Some(label) = payload.label {
        active_entry.label = Set(label.trim().to_string());
    }
    active_entry.updated_at = Set(chrono::Utc::now().naive_utc());

    match active_entry.update(&db).await {
        Ok(entry) => (
            StatusCode::OK,
            Json(json!({"status": "success", "data": {"entry": entry}})),
        )
            .into_response(),
        Err(e) => db_error(e),
    }
}

// DELETE /config/:kind/:id
pub async fn delete_entry(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path((kind, id)): Path<(String, i32)>,
) -> Response {
    let Some(kind) = parse_kind(&kind) else {
        return unknown_kind();
    };
    if let Some(r) = forbid_non_admin(&auth) {
        return r;
    }

    let entry = match find_entry(&db, kind, id).await {
        Ok(Some(entry)) => entry,
        Ok(None) => return fail(StatusCode::NOT_FOUND, "Configuration entry not found"),
        Err(e) => return db_error(e),
    };

    match entry.delete(&db).await {
        Ok(_) => {
            tracing::Span::current()
                .record("table", "config_entries")
                .record("action", "delete_config_entry")
                .record("user_id", auth.id);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => db_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_kind;

    #[test]
    fn url_segments_map_to_kinds() {
        assert_eq!(parse_kind("plant-types"), Some("plant_type"));
        assert_eq!(parse_kind("soil-types"), Some("soil_type"));
        assert_eq!(parse_kind("pot-sizes"), Some("pot_size"));
        assert_eq!(parse_kind("light-conditions"), Some("light_condition"));
        assert_eq!(parse_kind("blogs"), None);
    }
}
