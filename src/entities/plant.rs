use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A tracked houseplant. `next_watering` is derived state: it is written by
/// the watering cascade and at creation time, and only overwritten raw when
/// a client PATCHes it directly.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "plants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub owner_id: i32,
    pub room_id: i32,
    pub name: String,
    pub plant_type: Option<String>,
    pub light_condition: Option<String>,
    pub watering_frequency: Option<String>,
    pub last_watered: Option<DateTime>,
    pub next_watering: Option<DateTime>,
    pub pot_size: Option<String>,
    pub soil_type: Option<String>,
    pub health: String,
    pub acquired_date: Option<DateTime>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::room::Entity",
        from = "Column::RoomId",
        to = "super::room::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Room,
    #[sea_orm(has_many = "super::care_log::Entity")]
    CareLog,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Room.def()
    }
}

impl Related<super::care_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CareLog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
