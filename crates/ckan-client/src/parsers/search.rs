//! Search result envelope shared by `package_search` and `resource_search`

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of search hits plus the upstream's bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult<T> {
    /// Hits in the order given by the query's sort
    pub results: Vec<T>,
    /// Total number of matches, not the number returned on this page
    #[serde(default)]
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// Deprecated upstream since CKAN 2.10; passed through untouched
    #[serde(default)]
    pub facets: Value,
    #[serde(default)]
    pub search_facets: Value,
}

/// Wire shape of a search result before its hits are normalized
#[derive(Debug, Deserialize)]
pub(crate) struct RawSearchResult {
    pub results: Vec<Value>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub facets: Value,
    #[serde(default)]
    pub search_facets: Value,
}

impl RawSearchResult {
    /// Normalize every hit, keeping the surrounding bookkeeping
    pub(crate) fn normalize<T>(self, parse: impl Fn(&Value) -> T) -> SearchResult<T> {
        SearchResult {
            results: self.results.iter().map(parse).collect(),
            count: self.count.unwrap_or_default(),
            sort: self.sort,
            facets: self.facets,
            search_facets: self.search_facets,
        }
    }
}

impl<T> SearchResult<T> {
    pub fn into_results(self) -> Vec<T> {
        self.results
    }
}
