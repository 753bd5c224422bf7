//! Domain logic for the Balcão service-request portal.
//!
//! Pure, I/O-free building blocks shared by the persistence and API layers:
//! the form-type tagged union and its validation rules, CPF/CNPJ checksum
//! verification, CEP normalization, and email composition with
//! `mailto:`/`outlook:` dispatch links.

pub mod cep;
pub mod documents;
pub mod error;
pub mod forms;
pub mod mail;
pub mod roles;
pub mod types;
