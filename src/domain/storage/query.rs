//! Backend-neutral query model for selecting stored entities
//!
//! Filters and ordering name serialized entity fields. Values are carried as
//! strings; ISO dates compare correctly as strings, numeric fields compare
//! numerically when both sides parse as numbers.

use std::cmp::Ordering;

use serde_json::Value;

/// Comparison applied by a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
    Lt,
}

impl FilterOp {
    /// SQL comparison operator
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gte => ">=",
            Self::Lt => "<",
        }
    }

    /// Operator keyword used by REST table APIs (`col=eq.value`)
    pub fn as_rest(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Gte => "gte",
            Self::Lt => "lt",
        }
    }

    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering == Ordering::Equal,
            Self::Gte => ordering != Ordering::Less,
            Self::Lt => ordering == Ordering::Less,
        }
    }
}

/// A single field comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    pub fn as_rest(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub column: String,
    pub direction: SortDirection,
}

/// Filters, ordering and pagination for `Storage::select`
///
/// Without an explicit order, backends return rows in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreQuery {
    filters: Vec<Filter>,
    order: Option<SortOrder>,
    offset: Option<usize>,
    limit: Option<usize>,
}

impl StoreQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filter(column, FilterOp::Eq, value)
    }

    pub fn gte(self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filter(column, FilterOp::Gte, value)
    }

    pub fn lt(self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filter(column, FilterOp::Lt, value)
    }

    pub fn filter(mut self, column: impl Into<String>, op: FilterOp, value: impl ToString) -> Self {
        self.filters.push(Filter {
            column: column.into(),
            op,
            value: value.to_string(),
        });
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.order = Some(SortOrder {
            column: column.into(),
            direction,
        });
        self
    }

    /// Skip `offset` rows and return at most `limit`
    pub fn range(mut self, offset: usize, limit: usize) -> Self {
        self.offset = Some(offset);
        self.limit = Some(limit);
        self
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn order(&self) -> Option<&SortOrder> {
        self.order.as_ref()
    }

    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Whether a serialized entity satisfies every filter
    pub fn matches(&self, record: &Value) -> bool {
        self.filters.iter().all(|filter| {
            record
                .get(&filter.column)
                .and_then(|field| compare_to_literal(field, &filter.value))
                .is_some_and(|ordering| filter.op.accepts(ordering))
        })
    }

    /// Orders two serialized entities by the query's sort column
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        let Some(order) = &self.order else {
            return Ordering::Equal;
        };

        let a = a.get(&order.column).filter(|v| !v.is_null());
        let b = b.get(&order.column).filter(|v| !v.is_null());

        // Missing values sort last in either direction
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => match order.direction {
                SortDirection::Asc => compare_fields(a, b),
                SortDirection::Desc => compare_fields(a, b).reverse(),
            },
        }
    }
}

fn compare_to_literal(field: &Value, literal: &str) -> Option<Ordering> {
    match field {
        Value::String(s) => Some(s.as_str().cmp(literal)),
        Value::Number(n) => match (n.as_f64(), literal.parse::<f64>()) {
            (Some(left), Ok(right)) => left.partial_cmp(&right),
            _ => Some(n.to_string().as_str().cmp(literal)),
        },
        Value::Bool(b) => Some(b.to_string().as_str().cmp(literal)),
        _ => None,
    }
}

fn compare_fields(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (x, y) => x.to_string().cmp(&y.to_string()),
    }
}
