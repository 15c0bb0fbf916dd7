//! CKAN Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the CKAN client workspace.
//!
//! # Overview
//!
//! - **Error Handling**: the [`CkanError`] taxonomy and [`Result`] alias
//! - **Types**: values shared by every normalized entity ([`Timestamp`],
//!   [`AdditionalData`])
//! - **Logging**: optional `tracing` subscriber setup for applications
//!
//! # Example
//!
//! ```
//! use ckan_common::{CkanError, Result};
//!
//! fn check(success: bool) -> Result<()> {
//!     if success {
//!         Ok(())
//!     } else {
//!         Err(CkanError::api("Not found"))
//!     }
//! }
//!
//! assert!(check(false).unwrap_err().is_api());
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{CkanError, Result, MALFORMED_API_RESPONSE, UNKNOWN_API_ERROR};
pub use types::{AdditionalData, Timestamp};
