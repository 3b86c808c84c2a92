use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

use crate::entities::{care_log, plant, room, user};

/// Seed the entity-count gauges from the database at startup; handlers
/// adjust them incrementally afterwards.
pub async fn init_metrics(db: &DatabaseConnection) {
    let user_count = user::Entity::find().count(db).await.unwrap_or(0);
    metrics::gauge!("folias_users_total").set(user_count as f64);

    let room_count = room::Entity::find().count(db).await.unwrap_or(0);
    metrics::gauge!("folias_rooms_total").set(room_count as f64);

    let plant_count = plant::Entity::find().count(db).await.unwrap_or(0);
    metrics::gauge!("folias_plants_total").set(plant_count as f64);

    let care_log_count = care_log::Entity::find().count(db).await.unwrap_or(0);
    metrics::gauge!("folias_care_logs_total").set(care_log_count as f64);

    tracing::info!(
        "Initialized metrics: Users={}, Rooms={}, Plants={}, CareLogs={}",
        user_count,
        room_count,
        plant_count,
        care_log_count
    );
}
