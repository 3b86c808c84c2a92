use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, Set};

use crate::entities::{care_log, plant};
use crate::schedule;

/// Apply the plant-state side effects of a freshly created care log.
///
/// Runs after the care log insert has committed, spawned off the request
/// path. Best effort: a missing plant is a no-op and a failed plant update
/// is logged and swallowed, so the care log always survives. Consistency
/// between the two rows is at-least-once, not exactly-once.
pub async fn apply_care_log_cascade(db: &DatabaseConnection, log: &care_log::Model) {
    if let Err(e) = run(db, log).await {
        tracing::error!(
            care_log_id = log.id,
            plant_id = log.plant_id,
            log_type = %log.log_type,
            "care log cascade failed: {}",
            e
        );
    }
}

async fn run(db: &DatabaseConnection, log: &care_log::Model) -> Result<(), DbErr> {
    if log.log_type != "watering" && log.log_type != "repotting" {
        return Ok(());
    }

    let Some(plant) = plant::Entity::find_by_id(log.plant_id).one(db).await? else {
        return Ok(());
    };

    let update = if log.log_type == "watering" {
        watering_update(&plant, log)
    } else {
        repotting_update(&plant, log)
    };

    update.update(db).await?;
    Ok(())
}

/// A watering log stamps `last_watered` with the log's date and recomputes
/// `next_watering` from the plant's configured frequency. This is the only
/// path that writes `next_watering` as derived state.
fn watering_update(plant: &plant::Model, log: &care_log::Model) -> plant::ActiveModel {
    let mut update = plant.clone().into_active_model();
    update.last_watered = Set(Some(log.date));
    update.next_watering = Set(schedule::advance_schedule(
        plant.watering_frequency.as_deref(),
        log.date,
    ));
    update.updated_at = Set(chrono::Utc::now().naive_utc());
    update
}

/// A repotting log overwrites whichever of pot size and soil type it
/// carries; absent fields are left untouched.
fn repotting_update(plant: &plant::Model, log: &care_log::Model) -> plant::ActiveModel {
    let mut update = plant.clone().into_active_model();
    if let Some(pot_size) = &log.pot_size {
        update.pot_size = Set(Some(pot_size.clone()));
    }
    if let Some(soil_type) = &log.soil_type {
        update.soil_type = Set(Some(soil_type.clone()));
    }
    update.updated_at = Set(chrono::Utc::now().naive_utc());
    update
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sea_orm::{ActiveValue, DatabaseBackend, MockDatabase};

    fn day(d: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, d)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn basil(frequency: Option<&str>) -> plant::Model {
        plant::Model {
            id: 1,
            owner_id: 1,
            room_id: 1,
            name: "Basil".to_string(),
            plant_type: Some("Herb".to_string()),
            light_condition: None,
            watering_frequency: frequency.map(str::to_string),
            last_watered: None,
            next_watering: None,
            pot_size: Some("Small".to_string()),
            soil_type: Some("Potting mix".to_string()),
            health: "Good".to_string(),
            acquired_date: None,
            notes: None,
            created_at: day(1),
            updated_at: day(1),
        }
    }

    fn log_of(log_type: &str, date: chrono::NaiveDateTime) -> care_log::Model {
        care_log::Model {
            id: 10,
            plant_id: 1,
            created_by: 1,
            log_type: log_type.to_string(),
            date,
            quantity: None,
            fertilizer_name: None,
            pot_size: None,
            soil_type: None,
            issue: None,
            description: None,
            treatment: None,
            photo_url: None,
            notes: None,
            created_at: date,
            updated_at: date,
        }
    }

    #[test]
    fn watering_advances_schedule_from_log_date() {
        let plant = basil(Some("Weekly"));
        let update = watering_update(&plant, &log_of("watering", day(5)));

        assert_eq!(update.last_watered.clone().unwrap(), Some(day(5)));
        assert_eq!(update.next_watering.clone().unwrap(), Some(day(12)));
    }

    #[test]
    fn watering_clears_schedule_for_as_needed() {
        let plant = basil(Some("As needed"));
        let update = watering_update(&plant, &log_of("watering", day(5)));

        assert_eq!(update.last_watered.clone().unwrap(), Some(day(5)));
        assert_eq!(update.next_watering.clone().unwrap(), None);
    }

    #[test]
    fn repotting_overwrites_only_present_fields() {
        let plant = basil(Some("Weekly"));
        let mut log = log_of("repotting", day(5));
        log.pot_size = Some("Large".to_string());

        let update = repotting_update(&plant, &log);

        assert!(matches!(update.pot_size, ActiveValue::Set(_)));
        assert_eq!(update.pot_size.clone().unwrap(), Some("Large".to_string()));
        // soil type absent on the log stays as it was
        assert!(matches!(update.soil_type, ActiveValue::Unchanged(_)));
        assert_eq!(
            update.soil_type.clone().unwrap(),
            Some("Potting mix".to_string())
        );
    }

    #[tokio::test]
    async fn missing_plant_is_a_silent_no_op() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<plant::Model>::new()])
            .into_connection();

        apply_care_log_cascade(&db, &log_of("watering", day(5))).await;

        // only the plant lookup hit the database
        assert_eq!(db.into_transaction_log().len(), 1);
    }

    #[tokio::test]
    async fn fertilizing_never_touches_the_plant() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        apply_care_log_cascade(&db, &log_of("fertilizing", day(5))).await;

        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn watering_persists_the_recomputed_schedule() {
        let before = basil(Some("Weekly"));
        let mut after = before.clone();
        after.last_watered = Some(day(5));
        after.next_watering = Some(day(12));

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![before], vec![after]])
            .into_connection();

        apply_care_log_cascade(&db, &log_of("watering", day(5))).await;

        // plant lookup plus the update
        assert_eq!(db.into_transaction_log().len(), 2);
    }
}
