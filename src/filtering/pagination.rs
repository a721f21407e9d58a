//! Offset/limit resolution and the `Content-Range` response header.

use axum::http::HeaderMap;

use super::query::FilterOptions;

const DEFAULT_PAGE_SIZE: u64 = 10;

/// Parse the React-Admin `range=[start, end]` parameter into an inclusive
/// `(start, end)` pair, defaulting to the first ten items.
#[must_use]
pub fn parse_range(range_str: Option<String>) -> (u64, u64) {
    range_str.map_or((0, DEFAULT_PAGE_SIZE - 1), |r| {
        serde_json::from_str::<[u64; 2]>(&r)
            .map(|range| (range[0], range[1]))
            .unwrap_or((0, DEFAULT_PAGE_SIZE - 1))
    })
}

/// Resolve `(offset, limit)` from whichever pagination format the request
/// uses; `page`/`per_page` wins over `range` when both are present.
#[must_use]
pub fn parse_pagination(params: &FilterOptions) -> (u64, u64) {
    if let (Some(page), Some(per_page)) = (params.page, params.per_page) {
        // Standard REST pagination (1-based page numbers)
        let offset = page.saturating_sub(1) * per_page;
        (offset, per_page)
    } else if let Some(range) = &params.range {
        let (start, end) = parse_range(Some(range.clone()));
        let limit = end.saturating_sub(start) + 1;
        (start, limit)
    } else {
        (0, DEFAULT_PAGE_SIZE)
    }
}

/// Build the `Content-Range` header carried by every list response, in the
/// form `<resource> <first>-<last>/<total>`.
#[must_use]
pub fn calculate_content_range(
    offset: u64,
    limit: u64,
    total_count: u64,
    resource_name: &str,
) -> HeaderMap {
    let last = (offset + limit).saturating_sub(1).min(total_count);
    let content_range = format!("{resource_name} {offset}-{last}/{total_count}");

    let mut headers = HeaderMap::new();
    if let Ok(value) = content_range.parse() {
        headers.insert("Content-Range", value);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_parsing() {
        assert_eq!(parse_range(Some("[0,9]".to_string())), (0, 9));
        assert_eq!(parse_range(Some("[20,29]".to_string())), (20, 29));
        assert_eq!(parse_range(Some("nonsense".to_string())), (0, 9));
        assert_eq!(parse_range(None), (0, 9));
    }

    #[test]
    fn rest_pagination_wins_over_range() {
        let params = FilterOptions {
            page: Some(3),
            per_page: Some(5),
            range: Some("[0,9]".to_string()),
            ..FilterOptions::default()
        };
        assert_eq!(parse_pagination(&params), (10, 5));
    }

    #[test]
    fn defaults_to_first_ten() {
        assert_eq!(parse_pagination(&FilterOptions::default()), (0, 10));
    }

    #[test]
    fn content_range_header_format() {
        let headers = calculate_content_range(0, 10, 42, "customers");
        assert_eq!(headers.get("Content-Range").unwrap(), "customers 0-9/42");
    }
}
