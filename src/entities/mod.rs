pub mod care_log;
pub mod config_entry;
pub mod plant;
pub mod room;
pub mod user;

pub use care_log::Entity as CareLog;
pub use config_entry::Entity as ConfigEntry;
pub use plant::Entity as Plant;
pub use room::Entity as Room;
pub use user::Entity as User;

pub mod prelude;
