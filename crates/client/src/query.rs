//! Vector query builder and result sets
//!
//! [`VectorQuery`] records what the caller asked for; stores decide how to
//! honour it. Knobs a store does not use (probe counts on an exact index,
//! say) are carried anyway so they can be inspected.

use serde::{Deserialize, Serialize};

/// Result column holding the distance of each hit
pub const DISTANCE_COLUMN: &str = "_distance";

/// Row limit applied when a query does not set one
pub const DEFAULT_QUERY_LIMIT: usize = 10;

/// A nearest-neighbour query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorQuery {
    vector: Vec<f32>,
    column: Option<String>,
    metric: Option<String>,
    limit: Option<usize>,
    select: Option<Vec<String>>,
    nprobes: Option<u32>,
    refine_factor: Option<u32>,
    filter: Option<String>,
}

impl VectorQuery {
    /// Query for neighbours of `vector`
    pub fn new(vector: impl Into<Vec<f32>>) -> Self {
        VectorQuery {
            vector: vector.into(),
            column: None,
            metric: None,
            limit: None,
            select: None,
            nprobes: None,
            refine_factor: None,
            filter: None,
        }
    }

    /// Search this vector column instead of the table's first one
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Metric token to rank by
    pub fn metric(mut self, metric: impl Into<String>) -> Self {
        self.metric = Some(metric.into());
        self
    }

    /// Maximum number of rows returned
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Columns to project
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Partitions probed by an IVF index
    pub fn nprobes(mut self, nprobes: u32) -> Self {
        self.nprobes = Some(nprobes);
        self
    }

    /// Re-rank multiplier for a quantized index
    pub fn refine_factor(mut self, refine_factor: u32) -> Self {
        self.refine_factor = Some(refine_factor);
        self
    }

    /// Restrict results to rows satisfying `expr`
    pub fn only_if(mut self, expr: impl Into<String>) -> Self {
        self.filter = Some(expr.into());
        self
    }

    /// Query vector
    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    /// Requested vector column
    pub fn column_name(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// Requested metric token
    pub fn metric_token(&self) -> Option<&str> {
        self.metric.as_deref()
    }

    /// Effective row limit
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_QUERY_LIMIT)
    }

    /// Projected columns, if restricted
    pub fn selected(&self) -> Option<&[String]> {
        self.select.as_deref()
    }

    /// Requested probe count
    pub fn probe_count(&self) -> Option<u32> {
        self.nprobes
    }

    /// Requested refine factor
    pub fn refine(&self) -> Option<u32> {
        self.refine_factor
    }

    /// Filter expression
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }
}

/// One projected result column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Column {
    /// Integer values
    Int32(Vec<i32>),
    /// Float values (distances)
    Float32(Vec<f32>),
    /// Vector values
    FixedSizeList(Vec<Vec<f32>>),
}

impl Column {
    /// Number of values
    pub fn len(&self) -> usize {
        match self {
            Column::Int32(v) => v.len(),
            Column::Float32(v) => v.len(),
            Column::FixedSizeList(v) => v.len(),
        }
    }

    /// True if the column holds no values
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Integer view, if this is an integer column
    pub fn as_int32(&self) -> Option<&[i32]> {
        match self {
            Column::Int32(v) => Some(v),
            _ => None,
        }
    }

    /// Float view, if this is a float column
    pub fn as_float32(&self) -> Option<&[f32]> {
        match self {
            Column::Float32(v) => Some(v),
            _ => None,
        }
    }
}

/// Columnar query output, rows in rank order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    columns: Vec<(String, Column)>,
}

impl ResultSet {
    /// Empty result set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Self {
        self.columns.push((name.into(), column));
        self
    }

    /// Column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    /// Column names in output order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|(_, c)| c.len()).unwrap_or(0)
    }
}
