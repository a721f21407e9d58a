//! Query-parameter handling for list endpoints: JSON filters, free-text
//! search, sorting in both React-Admin and plain REST formats, and
//! offset/limit pagination with a `Content-Range` response header.

pub mod conditions;
pub mod pagination;
pub mod query;
pub mod sort;

pub use conditions::apply_filters;
pub use pagination::{calculate_content_range, parse_pagination, parse_range};
pub use query::FilterOptions;
pub use sort::parse_sorting;
