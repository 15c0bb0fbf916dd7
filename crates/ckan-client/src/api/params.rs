//! Caller-facing options and their translation into action parameters
//!
//! Options use this library's vocabulary (`limit`/`offset`, `datasets`,
//! `displayName`). Each action gets a small serializable query struct that
//! spells them the way CKAN expects; `None` fields are left out of the
//! request entirely.

use serde::Serialize;
use std::fmt;

// ============================================================================
// Sorting
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort by one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    /// Field name; `datasets` is accepted for `package_count`
    pub by: String,
    /// Ascending when unset
    pub order: Option<SortOrder>,
}

impl SortField {
    pub fn new(by: impl Into<String>) -> Self {
        Self {
            by: by.into(),
            order: None,
        }
    }

    pub fn asc(by: impl Into<String>) -> Self {
        Self::new(by).order(SortOrder::Asc)
    }

    pub fn desc(by: impl Into<String>) -> Self {
        Self::new(by).order(SortOrder::Desc)
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    fn encode(&self) -> String {
        let field = match self.by.as_str() {
            "datasets" => "package_count",
            other => other,
        };
        format!("{} {}", field, self.order.unwrap_or_default())
    }
}

/// A sort clause: raw CKAN syntax, one field, or several fields in priority
/// order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortSpec {
    /// Sent verbatim, e.g. `"name asc, package_count desc"`
    Raw(String),
    Field(SortField),
    Fields(Vec<SortField>),
}

impl SortSpec {
    /// The `sort`/`order_by` parameter value, if any
    pub fn encode(&self) -> Option<String> {
        match self {
            Self::Raw(raw) if raw.is_empty() => None,
            Self::Raw(raw) => Some(raw.clone()),
            Self::Field(field) => Some(field.encode()),
            Self::Fields(fields) if fields.is_empty() => None,
            Self::Fields(fields) => Some(
                fields
                    .iter()
                    .map(SortField::encode)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
        }
    }
}

impl From<&str> for SortSpec {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

impl From<String> for SortSpec {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

impl From<SortField> for SortSpec {
    fn from(field: SortField) -> Self {
        Self::Field(field)
    }
}

impl From<Vec<SortField>> for SortSpec {
    fn from(fields: Vec<SortField>) -> Self {
        Self::Fields(fields)
    }
}

fn encode_sort(sort: Option<&SortSpec>) -> Option<String> {
    sort.and_then(SortSpec::encode)
}

// ============================================================================
// Caller Options
// ============================================================================

/// Paging for plain list actions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LimitOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

/// Paging plus sorting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortOptions {
    pub sort: Option<SortSpec>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Detailed group and organization listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupOptions {
    pub sort: Option<SortSpec>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub include: GroupInclude,
}

/// Optional detail for each listed group; unset leaves the portal default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupInclude {
    pub dataset_count: Option<bool>,
    pub extras: Option<bool>,
    pub users: Option<bool>,
}

/// Detail included with a single group or organization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SingleGroupOptions {
    pub include: SingleGroupInclude,
}

/// Unset fields fall back to: datasets and users off, everything else on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SingleGroupInclude {
    pub datasets: Option<bool>,
    pub dataset_count: Option<bool>,
    pub followers: Option<bool>,
    pub extras: Option<bool>,
    pub subgroups: Option<bool>,
    pub tags: Option<bool>,
    pub users: Option<bool>,
}

/// Tag listing filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagOptions {
    /// Only tags containing this string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Tags of this vocabulary instead of free tags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary_id: Option<String>,
}

/// User listing filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserOptions {
    /// Matched against user names
    pub search: Option<String>,
    pub email: Option<String>,
    pub sort: Option<UserSortField>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSortField {
    About,
    Created,
    DisplayName,
    FullName,
    Id,
    Name,
    /// Number of datasets the user created
    Datasets,
    Sysadmin,
}

impl UserSortField {
    /// The `order_by` value CKAN understands
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::About => "about",
            Self::Created => "created",
            Self::DisplayName => "display_name",
            Self::FullName => "fullname",
            Self::Id => "id",
            Self::Name => "name",
            Self::Datasets => "number_created_packages",
            Self::Sysadmin => "sysadmin",
        }
    }
}

/// Dataset search options. Faceting is always disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetSearchOptions {
    pub filter_query: Option<FilterQuery>,
    pub sort: Option<SortSpec>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Solr filter query (`fq`); several clauses are joined with `+`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterQuery {
    One(String),
    Many(Vec<String>),
}

impl FilterQuery {
    pub fn encode(&self) -> String {
        match self {
            Self::One(clause) => clause.clone(),
            Self::Many(clauses) => clauses.join("+"),
        }
    }
}

impl From<&str> for FilterQuery {
    fn from(clause: &str) -> Self {
        Self::One(clause.to_string())
    }
}

impl From<Vec<String>> for FilterQuery {
    fn from(clauses: Vec<String>) -> Self {
        Self::Many(clauses)
    }
}

// ============================================================================
// Wire Parameters
// ============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct AutocompleteQuery<'a> {
    pub q: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct IdQuery<'a> {
    pub id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_default_schema: Option<bool>,
}

impl<'a> IdQuery<'a> {
    pub(crate) fn new(id: &'a str) -> Self {
        Self {
            id,
            use_default_schema: None,
        }
    }

    /// Ask for the core schema so portal-specific plugins do not reshape it
    pub(crate) fn default_schema(id: &'a str) -> Self {
        Self {
            id,
            use_default_schema: Some(true),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PackageSearchQuery<'a> {
    pub q: &'a str,
    pub facet: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fq: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl<'a> PackageSearchQuery<'a> {
    pub(crate) fn new(q: &'a str, options: &DatasetSearchOptions) -> Self {
        Self {
            q,
            facet: false,
            fq: options.filter_query.as_ref().map(FilterQuery::encode),
            rows: options.limit,
            start: options.offset,
            sort: encode_sort(options.sort.as_ref()),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ResourceSearchQuery<'a> {
    pub query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl<'a> ResourceSearchQuery<'a> {
    pub(crate) fn new(query: &'a str, options: &SortOptions) -> Self {
        Self {
            query,
            order_by: encode_sort(options.sort.as_ref()),
            limit: options.limit,
            offset: options.offset,
        }
    }
}

/// `group_list`/`organization_list` returning names
#[derive(Debug, Serialize)]
pub(crate) struct SortQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl From<&SortOptions> for SortQuery {
    fn from(options: &SortOptions) -> Self {
        Self {
            sort: encode_sort(options.sort.as_ref()),
            limit: options.limit,
            offset: options.offset,
        }
    }
}

/// `group_list`/`organization_list` returning full records
#[derive(Debug, Serialize)]
pub(crate) struct GroupListQuery {
    pub all_fields: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_dataset_count: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_extras: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_users: Option<bool>,
}

impl From<&GroupOptions> for GroupListQuery {
    fn from(options: &GroupOptions) -> Self {
        Self {
            all_fields: true,
            sort: encode_sort(options.sort.as_ref()),
            limit: options.limit,
            offset: options.offset,
            include_dataset_count: options.include.dataset_count,
            include_extras: options.include.extras,
            include_users: options.include.users,
        }
    }
}

/// `group_show`/`organization_show`
#[derive(Debug, Serialize)]
pub(crate) struct GroupShowQuery<'a> {
    pub id: &'a str,
    pub include_datasets: bool,
    pub include_dataset_count: bool,
    pub include_extras: bool,
    pub include_users: bool,
    pub include_groups: bool,
    pub include_tags: bool,
    pub include_followers: bool,
}

impl<'a> GroupShowQuery<'a> {
    pub(crate) fn new(id: &'a str, options: &SingleGroupOptions) -> Self {
        let include = &options.include;
        Self {
            id,
            include_datasets: include.datasets.unwrap_or(false),
            include_dataset_count: include.dataset_count.unwrap_or(true),
            include_extras: include.extras.unwrap_or(true),
            include_users: include.users.unwrap_or(false),
            include_groups: include.subgroups.unwrap_or(true),
            include_tags: include.tags.unwrap_or(true),
            include_followers: include.followers.unwrap_or(true),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TagListQuery<'a> {
    #[serde(flatten)]
    pub options: &'a TagOptions,
    pub all_fields: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserListQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_fields: Option<bool>,
}

impl<'a> UserListQuery<'a> {
    pub(crate) fn new(options: &'a UserOptions, all_fields: Option<bool>) -> Self {
        Self {
            q: options.search.as_deref(),
            email: options.email.as_deref(),
            order_by: options.sort.as_ref().map(UserSortField::as_param),
            all_fields,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_field_defaults_to_ascending() {
        assert_eq!(
            SortSpec::from(SortField::new("name")).encode().as_deref(),
            Some("name asc")
        );
    }

    #[test]
    fn test_sort_aliases_datasets() {
        let spec = SortSpec::from(vec![SortField::desc("datasets"), SortField::new("title")]);
        assert_eq!(spec.encode().as_deref(), Some("package_count desc, title asc"));
    }

    #[test]
    fn test_raw_sort_passes_through() {
        assert_eq!(SortSpec::from("name desc").encode().as_deref(), Some("name desc"));
        assert_eq!(SortSpec::from("").encode(), None);
        assert_eq!(SortSpec::Fields(vec![]).encode(), None);
    }

    #[test]
    fn test_user_sort_translation() {
        let options = UserOptions {
            search: Some("jo".to_string()),
            email: None,
            sort: Some(UserSortField::FullName),
        };

        let value = serde_json::to_value(UserListQuery::new(&options, Some(false))).unwrap();
        assert_eq!(value, json!({"q": "jo", "order_by": "fullname", "all_fields": false}));

        assert_eq!(UserSortField::DisplayName.as_param(), "display_name");
        assert_eq!(UserSortField::Datasets.as_param(), "number_created_packages");
        assert_eq!(UserSortField::Sysadmin.as_param(), "sysadmin");
    }

    #[test]
    fn test_package_search_query() {
        let options = DatasetSearchOptions {
            filter_query: Some(FilterQuery::from(vec![
                "tags:economy".to_string(),
                "res_format:CSV".to_string(),
            ])),
            sort: Some(SortSpec::from("metadata_modified desc")),
            limit: Some(10),
            offset: Some(20),
        };

        let value = serde_json::to_value(PackageSearchQuery::new("budget", &options)).unwrap();
        assert_eq!(
            value,
            json!({
                "q": "budget",
                "facet": false,
                "fq": "tags:economy+res_format:CSV",
                "rows": 10,
                "start": 20,
                "sort": "metadata_modified desc"
            })
        );
    }

    #[test]
    fn test_group_show_defaults() {
        let value =
            serde_json::to_value(GroupShowQuery::new("g", &SingleGroupOptions::default())).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "g",
                "include_datasets": false,
                "include_dataset_count": true,
                "include_extras": true,
                "include_users": false,
                "include_groups": true,
                "include_tags": true,
                "include_followers": true
            })
        );
    }

    #[test]
    fn test_group_list_always_requests_all_fields() {
        let options = GroupOptions {
            sort: Some(SortField::new("datasets").into()),
            include: GroupInclude {
                users: Some(true),
                ..Default::default()
            },
            ..Default::default()
        };

        let value = serde_json::to_value(GroupListQuery::from(&options)).unwrap();
        assert_eq!(
            value,
            json!({"all_fields": true, "sort": "package_count asc", "include_users": true})
        );
    }

    #[test]
    fn test_tag_list_query_flattens_options() {
        let options = TagOptions {
            query: Some("eco".to_string()),
            vocabulary_id: Some("v-1".to_string()),
        };
        let value = serde_json::to_value(TagListQuery {
            options: &options,
            all_fields: true,
        })
        .unwrap();
        assert_eq!(value, json!({"query": "eco", "vocabulary_id": "v-1", "all_fields": true}));
    }
}
