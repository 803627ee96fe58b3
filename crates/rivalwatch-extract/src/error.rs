//! Extraction error types

use thiserror::Error;

/// Page fetch and render errors
///
/// Each variant is a transport-level failure; pages that load but lack a
/// title, heading or paragraph are not errors.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Fetch did not finish within the configured timeout
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Server answered with a non-success status
    #[error("HTTP error: {0}")]
    HttpStatus(u16),

    /// Network or connection failure
    #[error("Request failed: {0}")]
    Request(String),

    /// Browser could not be launched or failed while loading the page
    #[error("Browser error: {0}")]
    Browser(String),

    /// Dynamic render exceeded its hard ceiling
    #[error("Page render timed out after {0} seconds")]
    RenderTimeout(u64),

    /// Dynamic mode requested but browser support is not compiled in
    #[error("Browser support not compiled. Rebuild with: cargo build --features browser")]
    BrowserUnavailable,
}
