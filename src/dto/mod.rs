//! DTO modules that bridge the services with the command-line front-end.

pub mod dashboard;
pub mod import;
