//! HTTP client for the CKAN action API
//!
//! [`CkanClient::action`] performs any action and unwraps its envelope. The
//! typed methods build on it: translate options into parameters, normalize
//! the raw result, and reject results that do not have the documented shape.

use crate::api::endpoints::{self, *};
use crate::api::envelope::Envelope;
use crate::api::params::*;
use crate::config::{ClientConfig, ClientOptions};
use crate::parsers::search::RawSearchResult;
use crate::parsers::{
    AutocompleteDataset, AutocompleteGroup, AutocompleteUser, Dataset, Group, License,
    Organization, Resource, SearchResult, Tag, User, Vocabulary,
};
use crate::validate::{assert_object_array, assert_string_array, expect_array, expect_object, validate_records};
use ckan_common::{CkanError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, trace, warn};

// ============================================================================
// Required Output Fields
// ============================================================================

const AUTOCOMPLETE_DATASET_FIELDS: &[&str] = &["name", "title", "match"];
const AUTOCOMPLETE_GROUP_FIELDS: &[&str] = &["id", "name", "title"];
const SEARCH_DATASET_FIELDS: &[&str] = &["id", "title"];
const DETAILED_DATASET_FIELDS: &[&str] = &["id", "title", "url"];
const DETAILED_GROUP_FIELDS: &[&str] = &["id", "displayName"];

/// HTTP method used for an action
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Method {
    /// Parameters in the query string
    #[default]
    Get,
    /// Parameters as a JSON body
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
        }
    }
}

/// Client for one CKAN portal
#[derive(Debug, Clone)]
pub struct CkanClient {
    http: reqwest::Client,
    base_url: String,
    options: ClientOptions,
}

impl CkanClient {
    /// Create a new client; `base_url` may be the site root or any spelling
    /// of its API root
    pub fn new(base_url: impl AsRef<str>, options: ClientOptions) -> Result<Self> {
        let http = options.request.build_http_client()?;
        Ok(Self::with_http_client(base_url, options, http))
    }

    /// Create a client around a caller-supplied HTTP client.
    ///
    /// `options.request` is ignored; configure the HTTP client instead.
    pub fn with_http_client(base_url: impl AsRef<str>, options: ClientOptions, http: reqwest::Client) -> Self {
        let base_url = endpoints::canonicalize_base_url(base_url.as_ref(), options.skip_endpoint_correction);
        Self {
            http,
            base_url,
            options,
        }
    }

    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Self::new(config.base_url, config.options)
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    /// The canonical action endpoint prefix, always ending in `/`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Point the client at another portal
    pub fn set_base_url(&mut self, base_url: impl AsRef<str>) {
        self.base_url =
            endpoints::canonicalize_base_url(base_url.as_ref(), self.options.skip_endpoint_correction);
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    // ========================================================================
    // Generic Action
    // ========================================================================

    /// Perform any action and return its raw `result`.
    ///
    /// Prefer the typed methods; this is for actions they do not cover.
    /// `params` must serialize to an object (or `()` for none).
    pub async fn action<P>(&self, action: &str, params: &P, method: Method) -> Result<Value>
    where
        P: Serialize + ?Sized,
    {
        let params = serde_json::to_value(params).map_err(CkanError::Encode)?;

        let request = match method {
            Method::Get => {
                let url = endpoints::action_url_with_query(&self.base_url, action, &params)?;
                debug!(action, %method, url = %url, "Calling CKAN action");
                self.http.get(url)
            },
            Method::Post => {
                let body = match params {
                    Value::Null => Value::Object(Map::new()),
                    Value::Object(_) => params,
                    _ => return Err(endpoints::non_object_params()),
                };
                let url = endpoints::action_url(&self.base_url, action);
                debug!(action, %method, url = %url, "Calling CKAN action");
                self.http.post(url).json(&body)
            },
        };

        let response = request.send().await?;
        let status = response.status();
        trace!(action, status = status.as_u16(), "Received response");

        let body = response.text().await?;

        // CKAN reports most failures (404, 409, 403) inside a JSON envelope,
        // so the body is read before the status is considered.
        match serde_json::from_str::<Envelope>(&body) {
            Ok(envelope) => envelope.into_result().inspect_err(|e| {
                warn!(action, status = status.as_u16(), error = %e, "CKAN action failed");
            }),
            Err(_) if !status.is_success() => {
                warn!(action, status = status.as_u16(), "Non-success response without an API envelope");
                Err(CkanError::HttpStatus {
                    status: status.as_u16(),
                    body,
                })
            },
            Err(e) => {
                debug!(action, error = %e, "Unparseable response body");
                Err(CkanError::MalformedResponse)
            },
        }
    }

    async fn get<P: Serialize + ?Sized>(&self, action: &str, params: &P) -> Result<Value> {
        self.action(action, params, Method::Get).await
    }

    // ========================================================================
    // Site
    // ========================================================================

    /// Check whether the portal's API answers
    pub async fn available(&self) -> Result<bool> {
        self.get(SITE_READ, &()).await?.as_bool().ok_or(CkanError::MalformedResponse)
    }

    // ========================================================================
    // Autocomplete
    // ========================================================================

    pub async fn autocomplete_dataset(&self, query: &str, limit: Option<u32>) -> Result<Vec<AutocompleteDataset>> {
        let result = self.get(PACKAGE_AUTOCOMPLETE, &AutocompleteQuery { q: query, limit }).await?;
        let hits = parse_list(&result, AutocompleteDataset::from_raw)?;
        validate_records(hits, AUTOCOMPLETE_DATASET_FIELDS)
    }

    pub async fn autocomplete_format(&self, query: &str, limit: Option<u32>) -> Result<Vec<String>> {
        assert_string_array(self.get(FORMAT_AUTOCOMPLETE, &AutocompleteQuery { q: query, limit }).await?)
    }

    pub async fn autocomplete_group(&self, query: &str, limit: Option<u32>) -> Result<Vec<AutocompleteGroup>> {
        let result = self.get(GROUP_AUTOCOMPLETE, &AutocompleteQuery { q: query, limit }).await?;
        assert_object_array(&result, AUTOCOMPLETE_GROUP_FIELDS)?;
        decode(result)
    }

    pub async fn autocomplete_organization(
        &self,
        query: &str,
        limit: Option<u32>,
    ) -> Result<Vec<AutocompleteGroup>> {
        let result = self
            .get(ORGANIZATION_AUTOCOMPLETE, &AutocompleteQuery { q: query, limit })
            .await?;
        assert_object_array(&result, AUTOCOMPLETE_GROUP_FIELDS)?;
        decode(result)
    }

    pub async fn autocomplete_tag(&self, query: &str, limit: Option<u32>) -> Result<Vec<String>> {
        assert_string_array(self.get(TAG_AUTOCOMPLETE, &AutocompleteQuery { q: query, limit }).await?)
    }

    pub async fn autocomplete_user(&self, query: &str, limit: Option<u32>) -> Result<Vec<AutocompleteUser>> {
        let result = self.get(USER_AUTOCOMPLETE, &AutocompleteQuery { q: query, limit }).await?;
        parse_list(&result, AutocompleteUser::from_raw)
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Search datasets with a Solr query; returns this page of hits only
    pub async fn search_datasets(&self, query: &str, options: &DatasetSearchOptions) -> Result<Vec<Dataset>> {
        Ok(self.search_datasets_raw_result(query, options).await?.into_results())
    }

    /// Search datasets, keeping the total count and sort of the result
    pub async fn search_datasets_raw_result(
        &self,
        query: &str,
        options: &DatasetSearchOptions,
    ) -> Result<SearchResult<Dataset>> {
        let result = self.get(PACKAGE_SEARCH, &PackageSearchQuery::new(query, options)).await?;
        let mut search = decode::<RawSearchResult>(result)?.normalize(Dataset::from_raw);
        search.results = validate_records(search.results, SEARCH_DATASET_FIELDS)?;
        Ok(search)
    }

    /// Search resources, e.g. `"format:CSV"`
    pub async fn search_resources(&self, query: &str, options: &SortOptions) -> Result<Vec<Resource>> {
        let result = self.get(RESOURCE_SEARCH, &ResourceSearchQuery::new(query, options)).await?;
        Ok(decode::<RawSearchResult>(result)?
            .normalize(Resource::from_raw)
            .into_results())
    }

    // ========================================================================
    // Datasets
    // ========================================================================

    /// Get one dataset by id or name
    pub async fn dataset(&self, id: &str) -> Result<Dataset> {
        let result = self.get(PACKAGE_SHOW, &IdQuery::default_schema(id)).await?;
        Ok(Dataset::from_raw(expect_object(&result)?))
    }

    /// Names of all public datasets
    pub async fn datasets(&self, options: &LimitOptions) -> Result<Vec<String>> {
        assert_string_array(self.get(PACKAGE_LIST, options).await?)
    }

    /// Recently modified datasets with their resources
    pub async fn detailed_datasets(&self, options: &LimitOptions) -> Result<Vec<Dataset>> {
        let result = self.get(CURRENT_PACKAGE_LIST_WITH_RESOURCES, options).await?;
        validate_records(parse_list(&result, Dataset::from_raw)?, DETAILED_DATASET_FIELDS)
    }

    // ========================================================================
    // Groups & Organizations
    // ========================================================================

    pub async fn group(&self, id: &str, options: &SingleGroupOptions) -> Result<Group> {
        let result = self.get(GROUP_SHOW, &GroupShowQuery::new(id, options)).await?;
        Ok(Group::from_raw(expect_object(&result)?))
    }

    /// Group names
    pub async fn groups(&self, options: &SortOptions) -> Result<Vec<String>> {
        assert_string_array(self.get(GROUP_LIST, &SortQuery::from(options)).await?)
    }

    pub async fn detailed_groups(&self, options: &GroupOptions) -> Result<Vec<Group>> {
        let result = self.get(GROUP_LIST, &GroupListQuery::from(options)).await?;
        validate_records(parse_list(&result, Group::from_raw)?, DETAILED_GROUP_FIELDS)
    }

    pub async fn organization(&self, id: &str, options: &SingleGroupOptions) -> Result<Organization> {
        let result = self.get(ORGANIZATION_SHOW, &GroupShowQuery::new(id, options)).await?;
        Ok(Organization::from_raw(expect_object(&result)?))
    }

    /// Organization names
    pub async fn organizations(&self, options: &SortOptions) -> Result<Vec<String>> {
        assert_string_array(self.get(ORGANIZATION_LIST, &SortQuery::from(options)).await?)
    }

    pub async fn detailed_organizations(&self, options: &GroupOptions) -> Result<Vec<Organization>> {
        let result = self.get(ORGANIZATION_LIST, &GroupListQuery::from(options)).await?;
        validate_records(parse_list(&result, Organization::from_raw)?, DETAILED_GROUP_FIELDS)
    }

    // ========================================================================
    // Licenses, Resources, Tags, Users, Vocabularies
    // ========================================================================

    pub async fn licenses(&self) -> Result<Vec<License>> {
        let result = self.get(LICENSE_LIST, &()).await?;
        parse_list(&result, License::from_raw)
    }

    pub async fn resource(&self, id: &str) -> Result<Resource> {
        let result = self.get(RESOURCE_SHOW, &IdQuery::default_schema(id)).await?;
        Ok(Resource::from_raw(expect_object(&result)?))
    }

    /// Tag names
    pub async fn tags(&self, options: &TagOptions) -> Result<Vec<String>> {
        assert_string_array(self.get(TAG_LIST, options).await?)
    }

    pub async fn detailed_tags(&self, options: &TagOptions) -> Result<Vec<Tag>> {
        let query = TagListQuery {
            options,
            all_fields: true,
        };
        let result = self.get(TAG_LIST, &query).await?;
        parse_list(&result, Tag::from_raw)
    }

    pub async fn user(&self, id: &str) -> Result<User> {
        let result = self.get(USER_SHOW, &IdQuery::new(id)).await?;
        Ok(User::from_raw(expect_object(&result)?))
    }

    /// User names
    pub async fn users(&self, options: &UserOptions) -> Result<Vec<String>> {
        assert_string_array(self.get(USER_LIST, &UserListQuery::new(options, Some(false))).await?)
    }

    pub async fn detailed_users(&self, options: &UserOptions) -> Result<Vec<User>> {
        let result = self.get(USER_LIST, &UserListQuery::new(options, None)).await?;
        parse_list(&result, User::from_raw)
    }

    pub async fn vocabulary(&self, id: &str) -> Result<Vocabulary> {
        let result = self.get(VOCABULARY_SHOW, &IdQuery::new(id)).await?;
        Ok(Vocabulary::from_raw(expect_object(&result)?))
    }

    pub async fn vocabularies(&self) -> Result<Vec<Vocabulary>> {
        let result = self.get(VOCABULARY_LIST, &()).await?;
        parse_list(&result, Vocabulary::from_raw)
    }
}

// ============================================================================
// Result Helpers
// ============================================================================

fn parse_list<T>(result: &Value, parse: impl Fn(&Value) -> T) -> Result<Vec<T>> {
    Ok(expect_array(result)?.iter().map(parse).collect())
}

fn decode<T: DeserializeOwned>(result: Value) -> Result<T> {
    serde_json::from_value(result).map_err(|_| CkanError::MalformedResponse)
}
