//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod attachment_repo;
pub mod email_config_repo;
pub mod equipment_model_repo;
pub mod form_entry_repo;
pub mod notification_repo;
pub mod role_repo;
pub mod session_repo;
pub mod user_repo;

pub use attachment_repo::AttachmentRepo;
pub use email_config_repo::EmailConfigRepo;
pub use equipment_model_repo::EquipmentModelRepo;
pub use form_entry_repo::FormEntryRepo;
pub use notification_repo::NotificationRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
