//! rivalwatch-core - shared types for the competitor monitoring assistant
//!
//! Result shapes, extracted page summaries and history records used by the
//! LLM client, the content extractor and the history log.

pub mod types;

pub use types::*;
