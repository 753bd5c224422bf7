//! Database entity models and DTOs.

pub mod attachment;
pub mod email_config;
pub mod equipment_model;
pub mod form_entry;
pub mod notification;
pub mod role;
pub mod session;
pub mod user;
