pub mod api;
pub mod cascade;
pub mod entities;
pub mod metrics;
pub mod migrator;
pub mod schedule;
pub mod telemetry;

pub use sea_orm;
