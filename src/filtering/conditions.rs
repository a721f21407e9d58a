//! Translation of the JSON `filter` parameter into Sea-ORM conditions.
//!
//! Unknown fields, malformed values, and unparsable filter JSON are ignored
//! rather than rejected; a filter that cannot be understood degrades to "no
//! filtering" instead of failing the request.

use sea_orm::{
    Condition,
    sea_query::{Alias, Expr, Func, SimpleExpr},
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::traits::CrudResource;

const MAX_FIELD_VALUE_LENGTH: usize = 10_000;

fn is_valid_field_name(field_name: &str) -> bool {
    !field_name.is_empty()
        && field_name.len() <= 100
        && !field_name.starts_with('_')
        && !field_name.contains("..")
}

/// Comparison operator suffixes in the React-Admin style:
/// `{"year_gte": 2015}` filters `year >= 2015`.
fn parse_comparison_operator(field_name: &str) -> Option<(&str, &str)> {
    const OPERATORS: [(&str, &str); 5] = [
        ("_gte", ">="),
        ("_lte", "<="),
        ("_gt", ">"),
        ("_lt", "<"),
        ("_neq", "!="),
    ];
    OPERATORS
        .iter()
        .find_map(|(suffix, op)| field_name.strip_suffix(suffix).map(|base| (base, *op)))
}

fn apply_comparison<V>(field_name: &str, operator: &str, value: V) -> SimpleExpr
where
    V: Into<sea_orm::Value>,
{
    let value: sea_orm::Value = value.into();
    let column = Expr::col(Alias::new(field_name));
    match operator {
        ">=" => column.gte(value),
        "<=" => column.lte(value),
        ">" => column.gt(value),
        "<" => column.lt(value),
        "!=" => column.ne(value),
        _ => column.eq(value),
    }
}

fn case_insensitive_like<C>(column: C, needle: &str) -> SimpleExpr
where
    C: sea_orm::ColumnTrait,
{
    SimpleExpr::FunctionCall(Func::upper(Expr::col(column)))
        .like(format!("%{}%", needle.to_uppercase()))
}

fn parse_filter_json(filter_str: Option<String>) -> HashMap<String, serde_json::Value> {
    filter_str.map_or_else(HashMap::new, |filter| match serde_json::from_str(&filter) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "invalid JSON in filter parameter, ignoring");
            HashMap::new()
        }
    })
}

/// Free-text `q` search: case-insensitive LIKE across the resource's
/// searchable columns, OR-combined.
fn build_search_condition<T: CrudResource>(
    filters: &HashMap<String, serde_json::Value>,
) -> Option<Condition> {
    let query = filters.get("q")?.as_str()?.trim();
    let columns = T::searchable_columns();
    if query.is_empty() || columns.is_empty() {
        return None;
    }
    let mut or_conditions = Condition::any();
    for column in columns {
        or_conditions = or_conditions.add(case_insensitive_like(column, query));
    }
    Some(or_conditions)
}

fn process_string_filter<T: CrudResource>(
    key: &str,
    string_value: &str,
    column: T::ColumnType,
) -> Option<SimpleExpr> {
    if string_value.len() > MAX_FIELD_VALUE_LENGTH {
        return None;
    }

    let trimmed_value = string_value.trim();
    if trimmed_value.is_empty() {
        return None;
    }

    if T::like_filterable_columns().contains(&key) {
        return Some(case_insensitive_like(column, trimmed_value));
    }

    if let Ok(uuid_value) = Uuid::parse_str(trimmed_value) {
        return Some(Expr::col(column).eq(uuid_value));
    }

    // Case-insensitive string equality
    Some(
        SimpleExpr::FunctionCall(Func::upper(Expr::col(column)))
            .eq(trimmed_value.to_uppercase()),
    )
}

fn process_number_filter<C>(
    key: &str,
    number: &serde_json::Number,
    column: C,
    filterable_columns: &[(&str, C)],
) -> Option<SimpleExpr>
where
    C: sea_orm::ColumnTrait + Copy,
{
    if let Some((base_field, operator)) = parse_comparison_operator(key) {
        // The comparison applies to the base field, which must itself be filterable.
        if filterable_columns
            .iter()
            .any(|(col_name, _)| *col_name == base_field)
        {
            if let Some(int_value) = number.as_i64() {
                return Some(apply_comparison(base_field, operator, int_value));
            } else if let Some(float_value) = number.as_f64() {
                return Some(apply_comparison(base_field, operator, float_value));
            }
        }
        return None;
    }

    if let Some(int_value) = number.as_i64() {
        Some(Expr::col(column).eq(int_value))
    } else {
        number.as_f64().map(|float| Expr::col(column).eq(float))
    }
}

fn process_array_filter<C>(array_values: &[serde_json::Value], column: C) -> Option<SimpleExpr>
where
    C: sea_orm::ColumnTrait + Copy,
{
    let values: Vec<String> = array_values
        .iter()
        .filter_map(|v| match v {
            serde_json::Value::String(s) => Some(s.trim().to_string()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(Expr::col(column).is_in(values))
    }
}

/// Build the WHERE condition for a list request from the JSON `filter`
/// parameter. All clauses are AND-combined; the `q` key expands to an
/// OR-combined search across the resource's searchable columns.
pub fn apply_filters<T: CrudResource>(filter_str: Option<String>) -> Condition {
    let filters = parse_filter_json(filter_str);
    let mut condition = Condition::all();

    if let Some(search) = build_search_condition::<T>(&filters) {
        condition = condition.add(search);
    }

    let filterable_columns = T::filterable_columns();
    for (key, value) in &filters {
        if key == "q" || !is_valid_field_name(key) {
            continue;
        }

        // Comparison suffixes carry their own column lookup on the base field.
        let base_field = parse_comparison_operator(key).map_or(key.as_str(), |(base, _)| base);
        let column = filterable_columns
            .iter()
            .find(|(col_name, _)| *col_name == base_field)
            .map(|(_, col)| *col);

        let Some(column) = column else { continue };

        let filter_condition = match value {
            serde_json::Value::String(string_value) => {
                process_string_filter::<T>(key, string_value, column)
            }
            serde_json::Value::Number(number) => {
                process_number_filter(key, number, column, &filterable_columns)
            }
            serde_json::Value::Bool(bool_value) => Some(Expr::col(column).eq(*bool_value)),
            serde_json::Value::Array(array_values) => process_array_filter(array_values, column),
            serde_json::Value::Null => Some(Expr::col(column).is_null()),
            serde_json::Value::Object(_) => None,
        };

        if let Some(filter_expr) = filter_condition {
            condition = condition.add(filter_expr);
        }
    }

    condition
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_suffixes_parse() {
        assert_eq!(parse_comparison_operator("year_gte"), Some(("year", ">=")));
        assert_eq!(parse_comparison_operator("cost_lt"), Some(("cost", "<")));
        assert_eq!(parse_comparison_operator("year_neq"), Some(("year", "!=")));
        assert_eq!(parse_comparison_operator("year"), None);
    }

    #[test]
    fn field_name_validation() {
        assert!(is_valid_field_name("make"));
        assert!(is_valid_field_name("customer_id"));
        assert!(!is_valid_field_name(""));
        assert!(!is_valid_field_name("_private"));
        assert!(!is_valid_field_name("a..b"));
    }

    #[test]
    fn malformed_filter_json_degrades_to_empty() {
        assert!(parse_filter_json(Some("{not json".to_string())).is_empty());
        assert!(parse_filter_json(None).is_empty());
    }
}
