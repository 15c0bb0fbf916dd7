//! Request envelope
//!
//! URL construction, parameter translation and the HTTP client for the CKAN
//! action API.

pub mod client;
pub mod endpoints;
pub mod envelope;
pub mod params;

pub use client::{CkanClient, Method};
pub use envelope::{Envelope, EnvelopeError};
pub use params::*;
