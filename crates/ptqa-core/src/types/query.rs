//! Collection query builder shared by all adapters.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::filter::{FilterField, FilterOp, FilterValue};
use super::sorting::SortField;

/// Filters, ordering and row limit for a collection fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionQuery {
    /// Conjunctive filter conditions.
    #[serde(default)]
    pub filters: Vec<FilterField>,
    /// Optional ordering.
    #[serde(default)]
    pub order: Option<SortField>,
    /// Optional maximum number of rows.
    #[serde(default)]
    pub limit: Option<usize>,
    /// Stable name for the query's cached snapshot. Queries whose filters
    /// move with the clock set one so each run replaces the last snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<String>,
}

impl CollectionQuery {
    /// An unfiltered query returning every row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an arbitrary filter.
    pub fn filter(mut self, field: impl Into<String>, op: FilterOp, value: FilterValue) -> Self {
        self.filters.push(FilterField::new(field, op, value));
        self
    }

    /// `field = value`
    pub fn eq(self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filter(field, FilterOp::Eq, value.into())
    }

    /// `field <> value`
    pub fn neq(self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filter(field, FilterOp::Neq, value.into())
    }

    /// `field > value`
    pub fn gt(self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filter(field, FilterOp::Gt, value.into())
    }

    /// `field >= value`
    pub fn gte(self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filter(field, FilterOp::Gte, value.into())
    }

    /// `field < value`
    pub fn lt(self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filter(field, FilterOp::Lt, value.into())
    }

    /// `field <= value`
    pub fn lte(self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filter(field, FilterOp::Lte, value.into())
    }

    /// `field in (values...)`
    pub fn is_in<I, S>(self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.filter(field, FilterOp::In, FilterValue::StringList(values))
    }

    /// `field is null`
    pub fn is_null(self, field: impl Into<String>) -> Self {
        self.filter(field, FilterOp::IsNull, FilterValue::Null)
    }

    /// Set the ordering.
    pub fn order_by(mut self, sort: SortField) -> Self {
        self.order = Some(sort);
        self
    }

    /// Cap the number of returned rows.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a row satisfies every filter.
    pub fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|f| f.matches(row))
    }

    /// Apply ordering and limit to rows that already passed [`matches`](Self::matches).
    pub fn finish(&self, mut rows: Vec<Value>) -> Vec<Value> {
        if let Some(order) = &self.order {
            rows.sort_by(|a, b| order.compare(a, b));
        }
        if let Some(limit) = self.limit {
            rows.truncate(limit);
        }
        rows
    }

    /// PostgREST query parameters, including `select=*`.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), "*".to_string())];
        pairs.extend(self.filters.iter().map(FilterField::to_query_pair));
        if let Some(order) = &self.order {
            pairs.push(("order".to_string(), order.to_postgrest()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }

    /// Key snapshots of this query under `name` instead of its filters.
    pub fn snapshot_as(mut self, name: impl Into<String>) -> Self {
        self.snapshot = Some(name.into());
        self
    }

    /// A deterministic key identifying this query against a collection.
    ///
    /// Named queries are keyed `{collection}:{name}`; others by their
    /// rendered parameters.
    pub fn cache_key(&self, collection: &str) -> String {
        if let Some(name) = &self.snapshot {
            return format!("{collection}:{name}");
        }
        let params: Vec<String> = self
            .to_query_pairs()
            .into_iter()
            .skip(1)
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        if params.is_empty() {
            collection.to_string()
        } else {
            format!("{collection}?{}", params.join("&"))
        }
    }
}
