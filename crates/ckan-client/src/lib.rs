//! CKAN Client Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Typed client for the CKAN action API.
//!
//! # Overview
//!
//! CKAN portals return loosely-typed JSON whose field names, casing and date
//! formats vary across actions and versions. This crate hides that:
//!
//! - **Client**: one [`CkanClient`] per portal, with a typed method per action
//!   and a generic [`CkanClient::action`] for the rest
//! - **Normalization**: every record is reshaped into the consistent model in
//!   [`parsers`], keeping unmodeled fields in `additional_data`
//! - **Validation**: results that do not match their documented shape are
//!   rejected with [`CkanError::MalformedResponse`]
//!
//! # Example
//!
//! ```no_run
//! use ckan_client::{CkanClient, ClientOptions, DatasetSearchOptions};
//!
//! # async fn run() -> ckan_client::Result<()> {
//! let client = CkanClient::new("https://demo.ckan.org", ClientOptions::default())?;
//!
//! let datasets = client
//!     .search_datasets("budget", &DatasetSearchOptions::default())
//!     .await?;
//!
//! for dataset in datasets {
//!     println!("{}: {} resources", dataset.name, dataset.resources.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod parsers;
pub mod validate;

// Re-export commonly used types
pub use api::{
    CkanClient, DatasetSearchOptions, FilterQuery, GroupInclude, GroupOptions, LimitOptions, Method,
    SingleGroupInclude, SingleGroupOptions, SortField, SortOptions, SortOrder, SortSpec, TagOptions,
    UserOptions, UserSortField,
};
pub use ckan_common::{AdditionalData, CkanError, Result, Timestamp};
pub use config::{ClientConfig, ClientOptions, RequestOptions};
pub use parsers::{
    AutocompleteDataset, AutocompleteGroup, AutocompleteUser, Dataset, Group, License, Organization,
    Resource, SearchResult, Tag, User, Vocabulary,
};
