use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    PaginatorTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::middleware::AuthUser;
use crate::api::{db_error, fail};
use crate::entities::{plant, room};

pub const ROOM_LIGHT_CONDITIONS: [&str; 4] = [
    "Low light",
    "Medium light",
    "Bright indirect",
    "Direct sunlight",
];

#[derive(Serialize)]
pub struct RoomResponse {
    pub id: i32,
    pub owner_id: i32,
    pub name: String,
    pub light_condition: Option<String>,
    pub description: Option<String>,
    pub plant_count: u64,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl RoomResponse {
    fn new(model: room::Model, plant_count: u64) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            name: model.name,
            light_condition: model.light_condition,
            description: model.description,
            plant_count,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

async fn count_plants(db: &DatabaseConnection, room_id: i32) -> Result<u64, sea_orm::DbErr> {
    plant::Entity::find()
        .filter(plant::Column::RoomId.eq(room_id))
        .count(db)
        .await
}

async fn name_taken(
    db: &DatabaseConnection,
    owner_id: i32,
    name: &str,
    exclude_id: Option<i32>,
) -> Result<bool, sea_orm::DbErr> {
    let mut query = room::Entity::find()
        .filter(room::Column::OwnerId.eq(owner_id))
        .filter(room::Column::Name.eq(name));
    if let Some(id) = exclude_id {
        query = query.filter(room::Column::Id.ne(id));
    }
    Ok(query.one(db).await?.is_some())
}

// GET /rooms
pub async fn list_rooms(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
) -> Response {
    let rooms = match room::Entity::find()
        .filter(room::Column::OwnerId.eq(auth.id))
        .all(&db)
        .await
    {
        Ok(rooms) => rooms,
        Err(e) => return db_error(e),
    };

    let mut response = Vec::with_capacity(rooms.len());
    for r in rooms {
        let plant_count = match count_plants(&db, r.id).await {
            Ok(n) => n,
            Err(e) => return db_error(e),
        };
        response.push(RoomResponse::new(r, plant_count));
    }

    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "results": response.len(),
            "data": { "rooms": response },
        })),
    )
        .into_response()
}

#[derive(Deserialize)]
pub struct CreateRoomRequest {
    name: String,
    light_condition: Option<String>,
    description: Option<String>,
}

// POST /rooms
pub async fn create_room(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateRoomRequest>,
) -> Response {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return fail(StatusCode::BAD_REQUEST, "A room must have a name");
    }
    if let Some(lc) = payload.light_condition.as_deref() {
        if !ROOM_LIGHT_CONDITIONS.contains(&lc) {
            return fail(StatusCode::BAD_REQUEST, "Invalid light condition");
        }
    }

    match name_taken(&db, auth.id, &name, None).await {
        Ok(true) => {
            return fail(
                StatusCode::BAD_REQUEST,
                "A room with this name already exists",
            )
        }
        Ok(false) => {}
        Err(e) => return db_error(e),
    }

    let now = chrono::Utc::now().naive_utc();
    let new_room = room::ActiveModel {
        owner_id: Set(auth.id),
        name: Set(name),
        light_condition: Set(payload.light_condition),
        description: Set(payload.description),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_room.insert(&db).await {
        Ok(r) => {
            tracing::Span::current()
                .record("table", "rooms")
                .record("action", "create_room")
                .record("user_id", auth.id);
            metrics::gauge!("folias_rooms_total").increment(1.0);
            (
                StatusCode::CREATED,
                Json(json!({"status": "success", "data": {"room": RoomResponse::new(r, 0)}})),
            )
                .into_response()
        }
        Err(e) => db_error(e),
    }
}

// GET /rooms/:id
pub async fn get_room(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(room_id): Path<i32>,
) -> Response {
    let room = match room::Entity::find_by_id(room_id)
        .filter(room::Column::OwnerId.eq(auth.id))
        .one(&db)
        .await
    {
        Ok(Some(r)) => r,
        Ok(None) => return fail(StatusCode::NOT_FOUND, "Room not found"),
        Err(e) => return db_error(e),
    };

    let plant_count = match count_plants(&db, room.id).await {
        Ok(n) => n,
        Err(e) => return db_error(e),
    };

    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "data": { "room": RoomResponse::new(room, plant_count) },
        })),
    )
        .into_response()
}

#[derive(Deserialize)]
pub struct UpdateRoomRequest {
    name: Option<String>,
    light_condition: Option<String>,
    description: Option<String>,
}

// PATCH /rooms/:id
pub async fn update_room(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(room_id): Path<i32>,
    Json(payload): Json<UpdateRoomRequest>,
) -> Response {
    if let Some(lc) = payload.light_condition.as_deref() {
        if !ROOM_LIGHT_CONDITIONS.contains(&lc) {
            return fail(StatusCode::BAD_REQUEST, "Invalid light condition");
        }
    }

    let room = match room::Entity::find_by_id(room_id)
        .filter(room::Column::OwnerId.eq(auth.id))
        .one(&db)
        .await
    {
        Ok(Some(r)) => r,
        Ok(None) => return fail(StatusCode::NOT_FOUND, "Room not found"),
        Err(e) => return db_error(e),
    };

    if let Some(name) = payload.name.as_deref() {
        let name = name.trim();
        if name.is_empty() {
            return fail(StatusCode::BAD_REQUEST, "A room must have a name");
        }
        match name_taken(&db, auth.id, name, Some(room.id)).await {
            Ok(true) => {
                return fail(
                    StatusCode::BAD_REQUEST,
                    "A room with this name already exists",
                )
            }
            Ok(false) => {}
            Err(e) => return db_error(e),
        }
    }

    let room_id = room.id;
    let mut active_room = room.into_active_model();
    if let Some(name) = payload.name {
        // plants reference the room by id, so a rename carries no fallout
        active_room.name = Set(name.trim().to_string());
    }
    if let Some(light_condition) = payload.light_condition {
        active_room.light_condition = Set(Some(light_condition));
    }
    if let Some(description) = payload.description {
        active_room.description = Set(Some(description));
    }
    active_room.updated_at = Set(chrono::Utc::now().naive_utc());

    let updated = match active_room.update(&db).await {
        Ok(r) => r,
        Err(e) => return db_error(e),
    };

    let plant_count = match count_plants(&db, room_id).await {
        Ok(n) => n,
        Err(e) => return db_error(e),
    };

    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "data": { "room": RoomResponse::new(updated, plant_count) },
        })),
    )
        .into_response()
}

// DELETE /rooms/:id
pub async fn delete_room(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(room_id): Path<i32>,
) -> Response {
    let room = match room::Entity::find_by_id(room_id)
        .filter(room::Column::OwnerId.eq(auth.id))
        .one(&db)
        .await
    {
        Ok(Some(r)) => r,
        Ok(None) => return fail(StatusCode::NOT_FOUND, "Room not found"),
        Err(e) => return db_error(e),
    };

    let plant_count = match count_plants(&db, room.id).await {
        Ok(n) => n,
        Err(e) => return db_error(e),
    };
    if plant_count > 0 {
        return fail(
            StatusCode::BAD_REQUEST,
            &format!(
                "Cannot delete room with plants. There are {} plants in this room.",
                plant_count
            ),
        );
    }

    match room.delete(&db).await {
        Ok(_) => {
            tracing::Span::current()
                .record("table", "rooms")
                .record("action", "delete_room")
                .record("user_id", auth.id);
            metrics::gauge!("folias_rooms_total").decrement(1.0);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => db_error(e),
    }
}
