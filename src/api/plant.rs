use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveTime;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::middleware::AuthUser;
use crate::api::{db_error, fail};
use crate::entities::{plant, room};
use crate::schedule;

pub const PLANT_LIGHT_CONDITIONS: [&str; 5] = [
    "Low Light",
    "Medium Light",
    "Bright Light",
    "Direct Sunlight",
    "Indirect Sunlight",
];

pub const HEALTH_STATUSES: [&str; 2] = ["Good", "Needs Attention"];

#[derive(Serialize)]
pub struct PlantResponse {
    pub id: i32,
    pub owner_id: i32,
    pub room_id: i32,
    pub name: String,
    pub plant_type: Option<String>,
    pub light_condition: Option<String>,
    pub watering_frequency: Option<String>,
    pub last_watered: Option<chrono::NaiveDateTime>,
    pub next_watering: Option<chrono::NaiveDateTime>,
    pub days_until_watering: Option<i64>,
    pub pot_size: Option<String>,
    pub soil_type: Option<String>,
    pub health: String,
    pub acquired_date: Option<chrono::NaiveDateTime>,
    pub notes: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl From<plant::Model> for PlantResponse {
    fn from(model: plant::Model) -> Self {
        // computed per read, never persisted
        let days_until_watering = schedule::days_until_watering(
            model.next_watering,
            chrono::Utc::now().naive_utc(),
        );
        Self {
            id: model.id,
            owner_id: model.owner_id,
            room_id: model.room_id,
            name: model.name,
            plant_type: model.plant_type,
            light_condition: model.light_condition,
            watering_frequency: model.watering_frequency,
            last_watered: model.last_watered,
            next_watering: model.next_watering,
            days_until_watering,
            pot_size: model.pot_size,
            soil_type: model.soil_type,
            health: model.health,
            acquired_date: model.acquired_date,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

fn check_member(value: Option<&str>, allowed: &[&str], message: &str) -> Result<(), Response> {
    match value {
        Some(v) if !allowed.contains(&v) => Err(fail(StatusCode::BAD_REQUEST, message)),
        _ => Ok(()),
    }
}

async fn find_owned_room(
    db: &DatabaseConnection,
    room_id: i32,
    owner_id: i32,
) -> Result<Option<room::Model>, sea_orm::DbErr> {
    room::Entity::find_by_id(room_id)
        .filter(room::Column::OwnerId.eq(owner_id))
        .one(db)
        .await
}

fn list_response(plants: Vec<plant::Model>) -> Response {
    let plants: Vec<PlantResponse> = plants.into_iter().map(Into::into).collect();
    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "results": plants.len(),
            "data": { "plants": plants },
        })),
    )
        .into_response()
}

// GET /plants
pub async fn list_plants(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
) -> Response {
    match plant::Entity::find()
        .filter(plant::Column::OwnerId.eq(auth.id))
        .all(&db)
        .await
    {
        Ok(plants) => list_response(plants),
        Err(e) => db_error(e),
    }
}

#[derive(Deserialize)]
pub struct CreatePlantRequest {
    name: String,
    room_id: i32,
    plant_type: Option<String>,
    light_condition: Option<String>,
    watering_frequency: Option<String>,
    last_watered: Option<chrono::NaiveDateTime>,
    next_watering: Option<chrono::NaiveDateTime>,
    pot_size: Option<String>,
    soil_type: Option<String>,
    health: Option<String>,
    acquired_date: Option<chrono::NaiveDateTime>,
    notes: Option<String>,
}

// POST /plants
pub async fn create_plant(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreatePlantRequest>,
) -> Response {
    if payload.name.trim().is_empty() {
        return fail(StatusCode::BAD_REQUEST, "A plant must have a name");
    }
    if let Err(r) = check_member(
        payload.light_condition.as_deref(),
        &PLANT_LIGHT_CONDITIONS,
        "Invalid light condition",
    ) {
        return r;
    }
    if let Err(r) = check_member(
        payload.watering_frequency.as_deref(),
        &schedule::WATERING_FREQUENCIES,
        "Invalid watering frequency",
    ) {
        return r;
    }
    if let Err(r) = check_member(
        payload.health.as_deref(),
        &HEALTH_STATUSES,
        "Invalid health status",
    ) {
        return r;
    }

    match find_owned_room(&db, payload.room_id, auth.id).await {
        Ok(Some(_)) => {}
        Ok(None) => return fail(StatusCode::NOT_FOUND, "Room not found"),
        Err(e) => return db_error(e),
    }

    // An explicit next_watering wins; otherwise derive it from the initial
    // watering, same as the cascade does.
    let next_watering = payload.next_watering.or_else(|| {
        payload.last_watered.and_then(|watered_at| {
            schedule::advance_schedule(payload.watering_frequency.as_deref(), watered_at)
        })
    });

    let now = chrono::Utc::now().naive_utc();
    let new_plant = plant::ActiveModel {
        owner_id: Set(auth.id),
        room_id: Set(payload.room_id),
        name: Set(payload.name.trim().to_string()),
        plant_type: Set(payload.plant_type),
        light_condition: Set(payload.light_condition),
        watering_frequency: Set(payload.watering_frequency),
        last_watered: Set(payload.last_watered),
        next_watering: Set(next_watering),
        pot_size: Set(payload.pot_size),
        soil_type: Set(payload.soil_type),
        health: Set(payload.health.unwrap_or_else(|| "Good".to_string())),
        acquired_date: Set(payload.acquired_date),
        notes: Set(payload.notes),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_plant.insert(&db).await {
        Ok(p) => {
            tracing::Span::current()
                .record("table", "plants")
                .record("action", "create_plant")
                .record("user_id", auth.id)
                .record("plant_id", p.id);
            metrics::gauge!("folias_plants_total").increment(1.0);
            (
                StatusCode::CREATED,
                Json(json!({"status": "success", "data": {"plant": PlantResponse::from(p)}})),
            )
                .into_response()
        }
        Err(e) => db_error(e),
    }
}

// GET /plants/:id
pub async fn get_plant(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(plant_id): Path<i32>,
) -> Response {
    match plant::Entity::find_by_id(plant_id)
        .filter(plant::Column::OwnerId.eq(auth.id))
        .one(&db)
        .await
    {
        Ok(Some(p)) => (
            StatusCode::OK,
            Json(json!({"status": "success", "data": {"plant": PlantResponse::from(p)}})),
        )
            .into_response(),
        Ok(None) => fail(StatusCode::NOT_FOUND, "Plant not found"),
        Err(e) => db_error(e),
    }
}

#[derive(Deserialize)]
pub struct UpdatePlantRequest {
    name: Option<String>,
    room_id: Option<i32>,
    plant_type: Option<String>,
    light_condition: Option<String>,
    watering_frequency: Option<String>,
    last_watered: Option<chrono::NaiveDateTime>,
    next_watering: Option<chrono::NaiveDateTime>,
    pot_size: Option<String>,
    soil_type: Option<String>,
    health: Option<String>,
    acquired_date: Option<chrono::NaiveDateTime>,
    notes: Option<String>,
}

// PATCH /plants/:id
pub async fn update_plant(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(plant_id): Path<i32>,
    Json(payload): Json<UpdatePlantRequest>,
) -> Response {
    if let Err(r) = check_member(
        payload.light_condition.as_deref(),
        &PLANT_LIGHT_CONDITIONS,
        "Invalid light condition",
    ) {
        return r;
    }
    if let Err(r) = check_member(
        payload.watering_frequency.as_deref(),
        &schedule::WATERING_FREQUENCIES,
        "Invalid watering frequency",
    ) {
        return r;
    }
    if let Err(r) = check_member(
        payload.health.as_deref(),
        &HEALTH_STATUSES,
        "Invalid health status",
    ) {
        return r;
    }

    let plant = match plant::Entity::find_by_id(plant_id)
        .filter(plant::Column::OwnerId.eq(auth.id))
        .one(&db)
        .await
    {
        Ok(Some(p)) => p,
        Ok(None) => return fail(StatusCode::NOT_FOUND, "Plant not found"),
        Err(e) => return db_error(e),
    };

    if let Some(room_id) = payload.room_id {
        match find_owned_room(&db, room_id, auth.id).await {
            Ok(Some(_)) => {}
            Ok(None) => return fail(StatusCode::NOT_FOUND, "Room not found"),
            Err(e) => return db_error(e),
        }
    }

    let mut active_plant = plant.into_active_model();
    if let Some(name) = payload.name {
        active_plant.name = Set(name.trim().to_string());
    }
    if let Some(room_id) = payload.room_id {
        active_plant.room_id = Set(room_id);
    }
    if let Some(plant_type) = payload.plant_type {
        active_plant.plant_type = Set(Some(plant_type));
    }
    if let Some(light_condition) = payload.light_condition {
        active_plant.light_condition = Set(Some(light_condition));
    }
    if let Some(watering_frequency) = payload.watering_frequency {
        active_plant.watering_frequency = Set(Some(watering_frequency));
    }
    if let Some(last_watered) = payload.last_watered {
        active_plant.last_watered = Set(Some(last_watered));
    }
    if let Some(next_watering) = payload.next_watering {
        // raw client overwrite of derived state, allowed by policy
        active_plant.next_watering = Set(Some(next_watering));
    }
    if let Some(pot_size) = payload.pot_size {
        active_plant.pot_size = Set(Some(pot_size));
    }
    if let Some(soil_type) = payload.soil_type {
        active_plant.soil_type = Set(Some(soil_type));
    }
    if let Some(health) = payload.health {
        active_plant.health = Set(health);
    }
    if let Some(acquired_date) = payload.acquired_date {
        active_plant.acquired_date = Set(Some(acquired_date));
    }
    if let Some(notes) = payload.notes {
        active_plant.notes = Set(Some(notes));
    }
    active_plant.updated_at = Set(chrono::Utc::now().naive_utc());

    match active_plant.update(&db).await {
        Ok(p) => (
            StatusCode::OK,
            Json(json!({"status": "success", "data": {"plant": PlantResponse::from(p)}})),
        )
            .into_response(),
        Err(e) => db_error(e),
    }
}

// DELETE /plants/:id
pub async fn delete_plant(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(plant_id): Path<i32>,
) -> Response {
    let plant = match plant::Entity::find_by_id(plant_id)
        .filter(plant::Column::OwnerId.eq(auth.id))
        .one(&db)
        .await
    {
        Ok(Some(p)) => p,
        Ok(None) => return fail(StatusCode::NOT_FOUND, "Plant not found"),
        Err(e) => return db_error(e),
    };

    match plant.delete(&db).await {
        Ok(_) => {
            tracing::Span::current()
                .record("table", "plants")
                .record("action", "delete_plant")
                .record("user_id", auth.id)
                .record("plant_id", plant_id);
            metrics::gauge!("folias_plants_total").decrement(1.0);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => db_error(e),
    }
}

// GET /plants/to-water
pub async fn plants_to_water(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
) -> Response {
    // due today or overdue: anything scheduled before tomorrow's midnight
    let today = chrono::Utc::now().naive_utc().date().and_time(NaiveTime::MIN);
    let tomorrow = today + chrono::Duration::days(1);

    match plant::Entity::find()
        .filter(plant::Column::OwnerId.eq(auth.id))
        .filter(plant::Column::NextWatering.lt(tomorrow))
        .all(&db)
        .await
    {
        Ok(plants) => list_response(plants),
        Err(e) => db_error(e),
    }
}

// GET /plants/by-room/:room_id
pub async fn plants_by_room(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(room_id): Path<i32>,
) -> Response {
    match plant::Entity::find()
        .filter(plant::Column::OwnerId.eq(auth.id))
        .filter(plant::Column::RoomId.eq(room_id))
        .all(&db)
        .await
    {
        Ok(plants) => list_response(plants),
        Err(e) => db_error(e),
    }
}

// GET /plants/by-health/:status
pub async fn plants_by_health(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(status): Path<String>,
) -> Response {
    match plant::Entity::find()
        .filter(plant::Column::OwnerId.eq(auth.id))
        .filter(plant::Column::Health.eq(status))
        .all(&db)
        .await
    {
        Ok(plants) => list_response(plants),
        Err(e) => db_error(e),
    }
}
