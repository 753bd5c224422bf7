//! HTTP handlers, one module per resource.

pub mod auth;
pub mod cep;
pub mod email_config;
pub mod export;
pub mod forms;
pub mod models;
pub mod notification;
pub mod users;
