use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One row of the deployment-global lookup tables (plant types, soil types,
/// pot sizes, light conditions), discriminated by `kind`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "config_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub kind: String,
    pub slug: String,
    pub label: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
