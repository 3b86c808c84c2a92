use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::middleware::AuthUser;
use crate::api::{db_error, fail};
use crate::cascade;
use crate::entities::{care_log, plant};

pub const LOG_TYPES: [&str; 4] = ["watering", "fertilizing", "repotting", "health"];

#[derive(Serialize)]
pub struct CareLogResponse {
    pub id: i32,
    pub plant_id: i32,
    pub created_by: i32,
    pub log_type: String,
    pub date: chrono::NaiveDateTime,
    pub quantity: Option<f64>,
    pub fertilizer_name: Option<String>,
    pub pot_size: Option<String>,
    pub soil_type: Option<String>,
    pub issue: Option<String>,
    pub description: Option<String>,
    pub treatment: Option<String>,
    pub photo_url: Option<String>,
    pub notes: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl From<care_log::Model> for CareLogResponse {
    fn from(model: care_log::Model) -> Self {
        Self {
            id: model.id,
            plant_id: model.plant_id,
            created_by: model.created_by,
            log_type: model.log_type,
            date: model.date,
            quantity: model.quantity,
            fertilizer_name: model.fertilizer_name,
            pot_size: model.pot_size,
            soil_type: model.soil_type,
            issue: model.issue,
            description: model.description,
            treatment: model.treatment,
            photo_url: model.photo_url,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

fn list_response(logs: Vec<care_log::Model>) -> Response {
    let logs: Vec<CareLogResponse> = logs.into_iter().map(Into::into).collect();
    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "results": logs.len(),
            "data": { "care_logs": logs },
        })),
    )
        .into_response()
}

#[derive(Deserialize)]
pub struct CreateCareLogRequest {
    plant_id: i32,
    log_type: String,
    date: Option<chrono::NaiveDateTime>,
    quantity: Option<f64>,
    fertilizer_name: Option<String>,
    pot_size: Option<String>,
    soil_type: Option<String>,
    issue: Option<String>,
    description: Option<String>,
    treatment: Option<String>,
    photo_url: Option<String>,
    notes: Option<String>,
}

// POST /care-logs
pub async fn create_care_log(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateCareLogRequest>,
) -> Response {
    if !LOG_TYPES.contains(&payload.log_type.as_str()) {
        return fail(StatusCode::BAD_REQUEST, "Invalid care log type");
    }

    // The plant must exist and belong to the caller
    match plant::Entity::find_by_id(payload.plant_id)
        .filter(plant::Column::OwnerId.eq(auth.id))
        .one(&db)
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => return fail(StatusCode::NOT_FOUND, "Plant not found"),
        Err(e) => return db_error(e),
    }

    let now = chrono::Utc::now().naive_utc();
    let new_log = care_log::ActiveModel {
        plant_id: Set(payload.plant_id),
        created_by: Set(auth.id),
        log_type: Set(payload.log_type),
        date: Set(payload.date.unwrap_or(now)),
        quantity: Set(payload.quantity),
        fertilizer_name: Set(payload.fertilizer_name),
        pot_size: Set(payload.pot_size),
        soil_type: Set(payload.soil_type),
        issue: Set(payload.issue),
        description: Set(payload.description),
        treatment: Set(payload.treatment),
        photo_url: Set(payload.photo_url),
        notes: Set(payload.notes),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_log.insert(&db).await {
        Ok(log) => {
            tracing::Span::current()
                .record("table", "care_logs")
                .record("action", "create_care_log")
                .record("user_id", auth.id)
                .record("plant_id", log.plant_id);
            metrics::counter!("folias_care_logs_created_total", "log_type" => log.log_type.clone())
                .increment(1);
            metrics::gauge!("folias_care_logs_total").increment(1.0);

            // Post-commit hook: the plant update rides outside the request
            // path and must never fail this response.
            let cascade_db = db.clone();
            let cascade_log = log.clone();
            tokio::spawn(async move {
                cascade::apply_care_log_cascade(&cascade_db, &cascade_log).await;
            });

            (
                StatusCode::CREATED,
                Json(json!({"status": "success", "data": {"care_log": CareLogResponse::from(log)}})),
            )
                .into_response()
        }
        Err(e) => db_error(e),
    }
}

// GET /care-logs/:id
pub async fn get_care_log(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(log_id): Path<i32>,
) -> Response {
    match care_log::Entity::find_by_id(log_id)
        .filter(care_log::Column::CreatedBy.eq(auth.id))
        .one(&db)
        .await
    {
        Ok(Some(log)) => (
            StatusCode::OK,
            Json(json!({"status": "success", "data": {"care_log": CareLogResponse::from(log)}})),
        )
            .into_response(),
        Ok(None) => fail(StatusCode::NOT_FOUND, "Care log not found"),
        Err(e) => db_error(e),
    }
}

#[derive(Deserialize)]
pub struct UpdateCareLogRequest {
    date: Option<chrono::NaiveDateTime>,
    quantity: Option<f64>,
    fertilizer_name: Option<String>,
    pot_size: Option<String>,
    soil_type: Option<String>,
    issue: Option<String>,
    description: Option<String>,
    treatment: Option<String>,
    photo_url: Option<String>,
    notes: Option<String>,
}

// PATCH /care-logs/:id
//
// Edits do not re-run the cascade; only creation carries side effects.
pub async fn update_care_log(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(log_id): Path<i32>,
    Json(payload): Json<UpdateCareLogRequest>,
) -> Response {
    let log = match care_log::Entity::find_by_id(log_id)
        .filter(care_log::Column::CreatedBy.eq(auth.id))
        .one(&db)
        .await
    {
        Ok(Some(log)) => log,
        Ok(None) => return fail(StatusCode::NOT_FOUND, "Care log not found"),
        Err(e) => return db_error(e),
    };

    let mut active_log = log.into_active_model();
    if let Some(date) = payload.date {
        active_log.date = Set(date);
    }
    if let Some(quantity) = payload.quantity {
        active_log.quantity = Set(Some(quantity));
    }
    if let Some(fertilizer_name) = payload.fertilizer_name {
        active_log.fertilizer_name = Set(Some(fertilizer_name));
    }
    if let Some(pot_size) = payload.pot_size {
        active_log.pot_size = Set(Some(pot_size));
    }
    if let Some(soil_type) = payload.soil_type {
        active_log.soil_type = Set(Some(soil_type));
    }
    if let Some(issue) = payload.issue {
        active_log.issue = Set(Some(issue));
    }
    if let Some(description) = payload.description {
        active_log.description = Set(Some(description));
    }
    if let Some(treatment) = payload.treatment {
        active_log.treatment = Set(Some(treatment));
    }
    if let Some(photo_url) = payload.photo_url {
        active_log.photo_url = Set(Some(photo_url));
    }
    if let Some(notes) = payload.notes {
        active_log.notes = Set(Some(notes));
    }
    active_log.updated_at = Set(chrono::Utc::now().naive_utc());

    match active_log.update(&db).await {
        Ok(log) => (
            StatusCode::OK,
            Json(json!({"status": "success", "data": {"care_log": CareLogResponse::from(log)}})),
        )
            .into_response(),
        Err(e) => db_error(e),
    }
}

// DELETE /care-logs/:id
pub async fn delete_care_log(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(log_id): Path<i32>,
) -> Response {
    let log = match care_log::Entity::find_by_id(log_id)
        .filter(care_log::Column::CreatedBy.eq(auth.id))
        .one(&db)
        .await
    {
        Ok(Some(log)) => log,
        Ok(None) => return fail(StatusCode::NOT_FOUND, "Care log not found"),
        Err(e) => return db_error(e),
    };

    match log.delete(&db).await {
        Ok(_) => {
            metrics::gauge!("folias_care_logs_total").decrement(1.0);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => db_error(e),
    }
}

// GET /care-logs/plant/:plant_id
pub async fn care_logs_for_plant(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(plant_id): Path<i32>,
) -> Response {
    match plant::Entity::find_by_id(plant_id)
        .filter(plant::Column::OwnerId.eq(auth.id))
        .one(&db)
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => return fail(StatusCode::NOT_FOUND, "Plant not found"),
        Err(e) => return db_error(e),
    }

    match care_log::Entity::find()
        .filter(care_log::Column::PlantId.eq(plant_id))
        .filter(care_log::Column::CreatedBy.eq(auth.id))
        .order_by_desc(care_log::Column::Date)
        .all(&db)
        .await
    {
        Ok(logs) => list_response(logs),
        Err(e) => db_error(e),
    }
}

// GET /care-logs/type/:log_type
pub async fn care_logs_by_type(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(log_type): Path<String>,
) -> Response {
    match care_log::Entity::find()
        .filter(care_log::Column::CreatedBy.eq(auth.id))
        .filter(care_log::Column::LogType.eq(log_type))
        .order_by_desc(care_log::Column::Date)
        .all(&db)
        .await
    {
        Ok(logs) => list_response(logs),
        Err(e) => db_error(e),
    }
}

#[derive(Deserialize)]
pub struct RecentParams {
    limit: Option<u64>,
}

// GET /care-logs/recent?limit=N
pub async fn recent_care_logs(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<RecentParams>,
) -> Response {
    let limit = params.limit.unwrap_or(10);

    match care_log::Entity::find()
        .filter(care_log::Column::CreatedBy.eq(auth.id))
        .order_by_desc(care_log::Column::Date)
        .limit(limit)
        .all(&db)
        .await
    {
        Ok(logs) => list_response(logs),
        Err(e) => db_error(e),
    }
}
