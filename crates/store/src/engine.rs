//! In-memory evaluation of a [`Criteria`] over serializable items.
//!
//! Items are compared through their serialized JSON form, so the engine
//! works for any `Serialize` type and filter fields use the same names the
//! wire format uses (`createdAt`, `location.name`, ...).

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;

use crate::criteria::{Criteria, Filter, FilterOperator, SortDirection};
use crate::pagination::PaginatedResult;

static NULL: Value = Value::Null;

/// Applies filters, sorts and pagination to `items`.
pub fn apply<T: Serialize>(
    items: Vec<T>,
    criteria: &Criteria,
) -> Result<PaginatedResult<T>, serde_json::Error> {
    let documents = items
        .into_iter()
        .map(|item| serde_json::to_value(&item).map(|value| (value, item)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(apply_to_documents(documents, criteria))
}

/// Applies a criteria to items that already carry their JSON representation.
///
/// `total` counts every match before pagination.
pub fn apply_to_documents<T>(documents: Vec<(Value, T)>, criteria: &Criteria) -> PaginatedResult<T> {
    let matched = select(documents, criteria);

    let pagination = criteria.effective_pagination();
    let total = matched.len();
    let items = matched
        .into_iter()
        .skip(pagination.offset())
        .take(pagination.per_page)
        .collect();

    PaginatedResult::new(items, total, pagination.page, pagination.per_page)
}

/// Filters and sorts without paginating.
///
/// Sorting is stable, so ties keep their input order.
pub fn select<T>(documents: Vec<(Value, T)>, criteria: &Criteria) -> Vec<T> {
    let mut matched: Vec<(Value, T)> = documents
        .into_iter()
        .filter(|(value, _)| criteria.filters.iter().all(|filter| matches(value, filter)))
        .collect();

    if !criteria.sorts.is_empty() {
        matched.sort_by(|(a, _), (b, _)| {
            for sort in &criteria.sorts {
                let ordering = compare(lookup(a, &sort.field), lookup(b, &sort.field));
                let ordering = match sort.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }

    matched.into_iter().map(|(_, item)| item).collect()
}

/// Evaluates one filter against a document.
pub fn matches(document: &Value, filter: &Filter) -> bool {
    let field = lookup(document, &filter.field);
    match filter.operator {
        FilterOperator::Equals => equals(field, &filter.value),
        FilterOperator::NotEquals => !equals(field, &filter.value),
        FilterOperator::Like => match (field, &filter.value) {
            (Value::String(text), Value::String(pattern)) => like(text, pattern),
            _ => false,
        },
        FilterOperator::In => match &filter.value {
            Value::Array(candidates) => candidates.iter().any(|candidate| equals(field, candidate)),
            _ => false,
        },
        FilterOperator::GreaterThan => {
            comparable(field, &filter.value) && compare(field, &filter.value) == Ordering::Greater
        }
        FilterOperator::LessThan => {
            comparable(field, &filter.value) && compare(field, &filter.value) == Ordering::Less
        }
    }
}

/// Resolves a dotted path; missing segments resolve to `null`.
pub fn lookup<'a>(document: &'a Value, path: &str) -> &'a Value {
    path.split('.')
        .try_fold(document, |current, segment| current.get(segment))
        .unwrap_or(&NULL)
}

fn equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn comparable(a: &Value, b: &Value) -> bool {
    matches!(
        (a, b),
        (Value::Number(_), Value::Number(_)) | (Value::String(_), Value::String(_))
    )
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over JSON values: null < bool < number < string < array < object.
fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Case-insensitive SQL `LIKE`. A pattern with no wildcard at all matches
/// anywhere; one with `%` or `_` is anchored at both ends.
fn like(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.to_lowercase().chars().collect();
    let pattern = if pattern.contains(['%', '_']) {
        pattern.to_lowercase()
    } else {
        format!("%{}%", pattern.to_lowercase())
    };
    let pattern: Vec<char> = pattern.chars().collect();

    // reachable[j]: text[..i] matches pattern[..j]
    let mut reachable = vec![false; pattern.len() + 1];
    reachable[0] = true;
    for j in 1..=pattern.len() {
        reachable[j] = reachable[j - 1] && pattern[j - 1] == '%';
    }

    for &c in &text {
        let mut next = vec![false; pattern.len() + 1];
        for j in 1..=pattern.len() {
            next[j] = match pattern[j - 1] {
                '%' => next[j - 1] || reachable[j],
                '_' => reachable[j - 1],
                p => reachable[j - 1] && p == c,
            };
        }
        reachable = next;
    }

    reachable[pattern.len()]
}
