//! Tables of the reference store
//!
//! Search is exact: every row is scored. Index parameters are validated and
//! recorded but do not change results, so benchmark logic can be tested
//! against known answers.

use parking_lot::{Mutex, RwLock};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

use vdbbench_core::{IndexParams, MetricType};

use super::distance::compute_distance;
use super::fault::Operation;
use super::store::MemoryStore;
use crate::error::{ClientError, ClientResult};
use crate::predicate::Predicate;
use crate::query::{Column, ResultSet, VectorQuery, DISTANCE_COLUMN};
use crate::schema::{DataType, Record, Schema};
use crate::traits::Table;

/// Index recorded by `create_index`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexInfo {
    /// Indexed vector column
    pub column: String,
    /// Metric the index was built for
    pub metric: MetricType,
    /// IVF partition count
    pub num_partitions: u32,
    /// PQ sub-vector count
    pub num_sub_vectors: u32,
    /// Rows present when the index was built
    pub indexed_rows: usize,
}

/// A table's shared state
///
/// Handles opened through different connections see the same table.
#[derive(Debug)]
pub struct MemoryTable {
    name: String,
    schema: Schema,
    rows: RwLock<Vec<Record>>,
    index: RwLock<Option<IndexInfo>>,
    query_log: Mutex<Vec<VectorQuery>>,
}

impl MemoryTable {
    pub(crate) fn new(name: &str, schema: Schema) -> Self {
        MemoryTable {
            name: name.to_string(),
            schema,
            rows: RwLock::new(Vec::new()),
            index: RwLock::new(None),
            query_log: Mutex::new(Vec::new()),
        }
    }

    /// Table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Schema fixed at creation
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.read().len()
    }

    /// Values of an integer column in insertion order
    pub fn int32_values(&self, column: &str) -> Vec<i32> {
        self.rows
            .read()
            .iter()
            .filter_map(|r| r.int32(column))
            .collect()
    }

    /// Most recently built index
    pub fn index(&self) -> Option<IndexInfo> {
        self.index.read().clone()
    }

    /// Every query executed successfully, oldest first
    pub fn queries(&self) -> Vec<VectorQuery> {
        self.query_log.lock().clone()
    }

    fn add(&self, records: Vec<Record>) -> ClientResult<()> {
        for record in &records {
            self.schema.check(record)?;
        }
        let count = records.len();
        self.rows.write().extend(records);
        debug!(target: "vdbbench::memory", table = %self.name, count, "Appended batch");
        Ok(())
    }

    fn create_index(&self, column: &str, params: &IndexParams) -> ClientResult<()> {
        match self.schema.field(column).map(|f| &f.data_type) {
            Some(DataType::FixedSizeList { .. }) => {}
            Some(DataType::Int32) => {
                return Err(ClientError::InvalidIndexParams(format!(
                    "column '{}' is not a vector column",
                    column
                )))
            }
            None => {
                return Err(ClientError::ColumnNotFound {
                    name: column.to_string(),
                })
            }
        }
        let metric = MetricType::parse(params.metric).ok_or_else(|| {
            ClientError::InvalidIndexParams(format!("unknown metric '{}'", params.metric))
        })?;
        if params.num_partitions == 0 {
            return Err(ClientError::InvalidIndexParams(
                "num_partitions must be > 0".to_string(),
            ));
        }
        if params.num_sub_vectors == 0 {
            return Err(ClientError::InvalidIndexParams(
                "num_sub_vectors must be > 0".to_string(),
            ));
        }

        let info = IndexInfo {
            column: column.to_string(),
            metric,
            num_partitions: params.num_partitions,
            num_sub_vectors: params.num_sub_vectors,
            indexed_rows: self.row_count(),
        };
        debug!(target: "vdbbench::memory", table = %self.name, ?info, "Built index");
        *self.index.write() = Some(info);
        Ok(())
    }

    fn search(&self, query: &VectorQuery) -> ClientResult<ResultSet> {
        let (column, width) = self.resolve_vector_column(query.column_name())?;
        if query.vector().len() != width {
            return Err(ClientError::DimensionMismatch {
                expected: width,
                got: query.vector().len(),
            });
        }

        let metric = match query.metric_token() {
            Some(token) => MetricType::parse(token).ok_or_else(|| {
                ClientError::InvalidQuery(format!("unknown metric '{}'", token))
            })?,
            None => self
                .index
                .read()
                .as_ref()
                .map(|i| i.metric)
                .unwrap_or(MetricType::L2),
        };

        let predicate = match query.filter() {
            Some(expr) => {
                let predicate = Predicate::parse(expr)?;
                predicate.validate(expr, &self.schema)?;
                Some(predicate)
            }
            None => None,
        };

        let projection: Vec<&str> = match query.selected() {
            Some(columns) => {
                for name in columns {
                    if self.schema.field(name).is_none() {
                        return Err(ClientError::ColumnNotFound { name: name.clone() });
                    }
                }
                columns.iter().map(String::as_str).collect()
            }
            None => self.schema.fields().iter().map(|f| f.name.as_str()).collect(),
        };

        let rows = self.rows.read();

        // Pre-filter, then score every surviving row
        let mut scored: Vec<(usize, f32)> = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| predicate.as_ref().map_or(true, |p| p.matches(row)))
            .filter_map(|(idx, row)| {
                row.vector(&column)
                    .map(|v| (idx, compute_distance(query.vector(), v, metric)))
            })
            .collect();

        // Sort by (distance asc, insertion order asc) for determinism
        scored.sort_by(|(idx_a, dist_a), (idx_b, dist_b)| {
            dist_a
                .partial_cmp(dist_b)
                .unwrap_or(Ordering::Equal)
                .then_with(|| idx_a.cmp(idx_b))
        });
        scored.truncate(query.effective_limit());

        let mut results = ResultSet::new();
        for name in projection {
            let column = match self.schema.field(name).map(|f| &f.data_type) {
                Some(DataType::Int32) => Column::Int32(
                    scored
                        .iter()
                        .filter_map(|(idx, _)| rows[*idx].int32(name))
                        .collect(),
                ),
                _ => Column::FixedSizeList(
                    scored
                        .iter()
                        .filter_map(|(idx, _)| rows[*idx].vector(name).map(<[f32]>::to_vec))
                        .collect(),
                ),
            };
            results = results.with_column(name, column);
        }
        results = results.with_column(
            DISTANCE_COLUMN,
            Column::Float32(scored.iter().map(|(_, d)| *d).collect()),
        );
        drop(rows);

        self.query_log.lock().push(query.clone());
        Ok(results)
    }

    fn resolve_vector_column(&self, requested: Option<&str>) -> ClientResult<(String, usize)> {
        match requested {
            Some(name) => match self.schema.field(name).map(|f| &f.data_type) {
                Some(DataType::FixedSizeList { width }) => Ok((name.to_string(), *width)),
                Some(DataType::Int32) => Err(ClientError::InvalidQuery(format!(
                    "column '{}' is not a vector column",
                    name
                ))),
                None => Err(ClientError::ColumnNotFound {
                    name: name.to_string(),
                }),
            },
            None => self
                .schema
                .vector_field()
                .map(|(f, width)| (f.name.clone(), width))
                .ok_or_else(|| {
                    ClientError::InvalidQuery(format!("table '{}' has no vector column", self.name))
                }),
        }
    }
}

/// An open handle on a [`MemoryTable`]
pub(crate) struct MemoryTableHandle {
    table: Arc<MemoryTable>,
    store: Arc<MemoryStore>,
}

impl MemoryTableHandle {
    pub(crate) fn new(table: Arc<MemoryTable>, store: Arc<MemoryStore>) -> Self {
        store.handle_opened();
        MemoryTableHandle { table, store }
    }
}

impl Drop for MemoryTableHandle {
    fn drop(&mut self) {
        self.store.handle_closed();
    }
}

impl Table for MemoryTableHandle {
    fn name(&self) -> &str {
        self.table.name()
    }

    fn add(&self, records: Vec<Record>) -> ClientResult<()> {
        self.store.faults().check(Operation::Add)?;
        self.table.add(records)
    }

    fn create_index(&self, column: &str, params: &IndexParams) -> ClientResult<()> {
        self.store.faults().check(Operation::CreateIndex)?;
        self.table.create_index(column, params)
    }

    fn search(&self, query: &VectorQuery) -> ClientResult<ResultSet> {
        self.store.faults().check(Operation::Search)?;
        self.table.search(query)
    }

    fn count_rows(&self) -> ClientResult<usize> {
        Ok(self.table.row_count())
    }
}
