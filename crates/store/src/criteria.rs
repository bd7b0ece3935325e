//! Criteria: filters, sorts and pagination consumed by read queries.
//!
//! The serde shape is the wire shape handed over by the transport layer:
//!
//! ```json
//! {
//!   "filters": [{ "field": "name", "operator": "LIKE", "value": "basil" }],
//!   "sorts": [{ "field": "createdAt", "direction": "DESC" }],
//!   "pagination": { "page": 1, "perPage": 20 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Page used when a criteria carries no pagination.
pub const DEFAULT_PAGE: usize = 1;

/// Page size used when a criteria carries no pagination (or a zero page size).
pub const DEFAULT_PER_PAGE: usize = 10;

/// Comparison applied by a [`Filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    Like,
    In,
    GreaterThan,
    LessThan,
}

/// A single `field <operator> value` condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Field name, dotted for nested objects (e.g. `location.name`).
    pub field: String,
    pub operator: FilterOperator,
    pub value: Value,
}

impl Filter {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

/// Sort direction.
///
/// Parsed case-insensitively from `ASC`/`DESC`. Any other value falls back
/// to [`SortDirection::Desc`] and is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl From<String> for SortDirection {
    fn from(raw: String) -> Self {
        SortDirection::parse(&raw)
    }
}

impl From<SortDirection> for String {
    fn from(direction: SortDirection) -> Self {
        direction.as_str().to_string()
    }
}

impl SortDirection {
    /// Parses a direction, defaulting to `Desc` for unrecognized input.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("asc") {
            SortDirection::Asc
        } else if raw.eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            tracing::warn!(direction = %raw, "unrecognized sort direction, falling back to DESC");
            SortDirection::Desc
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A sort key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// Requested page (1-based) and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

fn default_page() -> usize {
    DEFAULT_PAGE
}

fn default_per_page() -> usize {
    DEFAULT_PER_PAGE
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Pagination {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self { page, per_page }
    }

    /// Clamps page 0 to 1 and a zero page size to the default.
    pub fn normalized(&self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: if self.per_page == 0 {
                DEFAULT_PER_PAGE
            } else {
                self.per_page
            },
        }
    }

    /// Number of items to skip before this page.
    pub fn offset(&self) -> usize {
        let normalized = self.normalized();
        (normalized.page - 1).saturating_mul(normalized.per_page)
    }
}

/// A complete read query.
///
/// Filters are combined with AND, sorts apply in order, pagination applies last.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    #[serde(default)]
    pub filters: Vec<Filter>,

    #[serde(default)]
    pub sorts: Vec<Sort>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl Criteria {
    /// Creates an empty criteria (matches everything, first default page).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter.
    pub fn filter(
        mut self,
        field: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<Value>,
    ) -> Self {
        self.filters.push(Filter::new(field, operator, value));
        self
    }

    /// Shorthand for an `EQUALS` filter.
    pub fn where_eq(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(field, FilterOperator::Equals, value)
    }

    /// Adds a sort key.
    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sorts.push(Sort::new(field, direction));
        self
    }

    /// Sets the requested page.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination::new(page, per_page));
        self
    }

    /// Returns the effective pagination.
    pub fn effective_pagination(&self) -> Pagination {
        self.pagination.unwrap_or_default().normalized()
    }
}
