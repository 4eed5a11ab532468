//! Domain aggregates exposed by the lead engine and the service layer.

pub mod entry;
pub mod locations;
pub mod session;
pub mod types;
