//! Lead-management client.
//!
//! The `data` feature compiles the offline engine: domain types, form
//! validation, spreadsheet parsing, filtering, selection and the call
//! summary. The `client` feature adds the REST repository, session storage,
//! the services that orchestrate them and the `pushkind-leads` command line.

pub mod dashboard;
pub mod debounce;
pub mod domain;
pub mod dto;
pub mod forms;
pub mod pagination;

#[cfg(feature = "client")]
pub mod cli;
#[cfg(feature = "client")]
pub mod error_conversions;
#[cfg(feature = "client")]
pub mod models;
#[cfg(feature = "client")]
pub mod repository;
#[cfg(feature = "client")]
pub mod services;
