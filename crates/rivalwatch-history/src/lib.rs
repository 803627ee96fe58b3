//! Recent activity log for rivalwatch
//!
//! Keeps the last N completed analyses, newest first, in a single JSON file.

pub mod error;
pub mod store;

pub use error::HistoryError;
pub use store::HistoryLog;
