pub use super::care_log::Entity as CareLog;
pub use super::config_entry::Entity as ConfigEntry;
pub use super::plant::Entity as Plant;
pub use super::room::Entity as Room;
pub use super::user::Entity as User;
