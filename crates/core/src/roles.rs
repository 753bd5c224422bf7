//! Well-known role name constants.
//!
//! These must match the seed data in the `create_roles` migration.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_TECNICO: &str = "tecnico";
pub const ROLE_COMERCIAL: &str = "comercial";
