//! Client-side lead engine behind the dashboard table: the entry store,
//! filtering, call statistics, multi-row selection and clipboard output.
//!
//! Everything in here is synchronous and free of I/O.

pub mod clipboard;
pub mod filter;
pub mod selection;
pub mod store;
pub mod summary;

pub use filter::{DateRange, FilterCache, FilterState, filter_entries};
pub use selection::Selection;
pub use store::EntryStore;
pub use summary::{CallStats, SummaryCategory};
