use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Query parameters accepted by every list endpoint.
///
/// # Filtering
/// The `filter` parameter is a JSON-encoded object:
/// - free text search: `{"q": "oil"}`
/// - exact match on a filterable column: `{"customer_id": "550e8400-..."}`
/// - multiple values: `{"id": ["<uuid>", "<uuid>"]}`
/// - numeric comparisons via suffixes: `{"year_gte": 2015}`
///
/// # Pagination
/// Either the React-Admin `range=[0,9]` format or `page`/`per_page`.
///
/// # Sorting
/// Either the React-Admin `sort=["make","ASC"]` format or
/// `sort_by=make&order=ASC`.
#[derive(Deserialize, IntoParams, ToSchema, Default)]
#[into_params(parameter_in = Query)]
pub struct FilterOptions {
    /// JSON-encoded filter object.
    #[param(example = json!({"q": "oil change", "customer_id": "550e8400-e29b-41d4-a716-446655440000"}))]
    pub filter: Option<String>,
    /// Range for pagination in the format `[start, end]` (inclusive).
    #[param(example = "[0,9]")]
    pub range: Option<String>,
    /// Page number for standard REST pagination (1-based).
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Number of items per page for standard REST pagination.
    #[param(example = 10)]
    pub per_page: Option<u64>,
    /// Sort order in the format `["column", "order"]`, or a bare column name.
    #[param(example = r#"["service_date", "DESC"]"#)]
    pub sort: Option<String>,
    /// Sort column for standard REST format.
    #[param(example = "make")]
    pub sort_by: Option<String>,
    /// Sort direction for standard REST format (ASC or DESC).
    #[param(example = "ASC")]
    pub order: Option<String>,
}
