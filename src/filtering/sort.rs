//! Sort parameter parsing, accepting both the React-Admin JSON array format
//! (`sort=["make","ASC"]`) and the plain REST format (`sort_by=make&order=ASC`).

use sea_orm::{ColumnTrait, sea_query::Order};

use super::query::FilterOptions;

const DEFAULT_SORT_ORDER: &str = "ASC";

/// Parse sort column and order from the JSON array format.
fn parse_json_sort(json: &str) -> Option<(String, String)> {
    let sort_vec: Vec<String> = serde_json::from_str(json).ok()?;
    let column = sort_vec.first()?.clone();
    let order = sort_vec
        .get(1)
        .cloned()
        .unwrap_or_else(|| DEFAULT_SORT_ORDER.to_string());
    Some((column, order))
}

fn parse_order(sort_order: &str) -> Order {
    if sort_order.eq_ignore_ascii_case("DESC") {
        Order::Desc
    } else {
        Order::Asc
    }
}

fn find_column<C>(column_name: &str, columns: &[(&str, C)], default: C) -> C
where
    C: ColumnTrait + Copy,
{
    columns
        .iter()
        .find(|&&(col_name, _)| col_name == column_name)
        .map_or(default, |&(_, col)| col)
}

/// Resolve the ORDER BY column and direction for a list request. Requests
/// without sort parameters get the resource's default ordering; unknown
/// column names fall back to the default column.
pub fn parse_sorting<C>(
    params: &FilterOptions,
    sortable_columns: &[(&str, C)],
    default: (C, Order),
) -> (C, Order)
where
    C: ColumnTrait + Copy,
{
    let (default_column, default_order) = default;

    let requested = if let Some(sort_by) = &params.sort_by {
        Some((
            sort_by.clone(),
            params
                .order
                .clone()
                .unwrap_or_else(|| DEFAULT_SORT_ORDER.to_string()),
        ))
    } else if let Some(sort) = &params.sort {
        if sort.starts_with('[') {
            parse_json_sort(sort)
        } else {
            // Bare column name with optional order parameter
            Some((
                sort.clone(),
                params
                    .order
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SORT_ORDER.to_string()),
            ))
        }
    } else {
        None
    };

    match requested {
        Some((column_name, order)) => (
            find_column(&column_name, sortable_columns, default_column),
            parse_order(&order),
        ),
        None => (default_column, default_order),
    }
}
