//! Table schemas and records
//!
//! Only the column types a benchmark collection needs are modelled: 32-bit
//! integer scalars and fixed-width float32 vectors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ClientError, ClientResult};

/// Column data type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    /// 32-bit signed integer
    Int32,
    /// Fixed-width list of float32 values
    FixedSizeList {
        /// Number of items per value
        width: usize,
    },
}

/// One column of a schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Column name
    pub name: String,
    /// Column type
    pub data_type: DataType,
}

impl Field {
    /// Integer column
    pub fn int32(name: impl Into<String>) -> Self {
        Field {
            name: name.into(),
            data_type: DataType::Int32,
        }
    }

    /// Vector column of `width` float32 items
    pub fn vector(name: impl Into<String>, width: usize) -> Self {
        Field {
            name: name.into(),
            data_type: DataType::FixedSizeList { width },
        }
    }
}

/// Ordered set of columns, fixed when a table is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Build a schema, rejecting duplicate names and zero-width vectors
    pub fn new(fields: Vec<Field>) -> ClientResult<Self> {
        if fields.is_empty() {
            return Err(ClientError::Schema("schema has no columns".to_string()));
        }
        for (i, field) in fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(ClientError::Schema("column name cannot be empty".to_string()));
            }
            if fields[..i].iter().any(|f| f.name == field.name) {
                return Err(ClientError::Schema(format!(
                    "duplicate column '{}'",
                    field.name
                )));
            }
            if field.data_type == (DataType::FixedSizeList { width: 0 }) {
                return Err(ClientError::Schema(format!(
                    "vector column '{}' has zero width",
                    field.name
                )));
            }
        }
        Ok(Schema { fields })
    }

    /// All columns in declaration order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a column by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// First vector column and its width
    pub fn vector_field(&self) -> Option<(&Field, usize)> {
        self.fields.iter().find_map(|f| match f.data_type {
            DataType::FixedSizeList { width } => Some((f, width)),
            DataType::Int32 => None,
        })
    }

    /// Check that `record` supplies exactly this schema's columns
    pub fn check(&self, record: &Record) -> ClientResult<()> {
        if record.len() != self.fields.len() {
            return Err(ClientError::Schema(format!(
                "record has {} columns, schema has {}",
                record.len(),
                self.fields.len()
            )));
        }
        for field in &self.fields {
            let value = record.get(&field.name).ok_or_else(|| {
                ClientError::Schema(format!("record is missing column '{}'", field.name))
            })?;
            match (&field.data_type, value) {
                (DataType::Int32, Value::Int32(_)) => {}
                (DataType::FixedSizeList { width }, Value::Vector(v)) => {
                    if v.len() != *width {
                        return Err(ClientError::DimensionMismatch {
                            expected: *width,
                            got: v.len(),
                        });
                    }
                }
                _ => {
                    return Err(ClientError::Schema(format!(
                        "column '{}' expects {:?}",
                        field.name, field.data_type
                    )))
                }
            }
        }
        Ok(())
    }
}

/// A single cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Integer scalar
    Int32(i32),
    /// Float32 vector
    Vector(Vec<f32>),
}

/// One row, keyed by column name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    values: BTreeMap<String, Value>,
}

impl Record {
    /// Empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value
    pub fn with(mut self, column: impl Into<String>, value: Value) -> Self {
        self.values.insert(column.into(), value);
        self
    }

    /// Value of a column
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Integer value of a column, if it holds one
    pub fn int32(&self, column: &str) -> Option<i32> {
        match self.values.get(column) {
            Some(Value::Int32(v)) => Some(*v),
            _ => None,
        }
    }

    /// Vector value of a column, if it holds one
    pub fn vector(&self, column: &str) -> Option<&[f32]> {
        match self.values.get(column) {
            Some(Value::Vector(v)) => Some(v),
            _ => None,
        }
    }

    /// Number of populated columns
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no column is populated
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bench_schema() -> Schema {
        Schema::new(vec![Field::int32("id"), Field::vector("vector", 3)]).unwrap()
    }

    #[test]
    fn test_vector_field_lookup() {
        let schema = bench_schema();
        let (field, width) = schema.vector_field().unwrap();
        assert_eq!(field.name, "vector");
        assert_eq!(width, 3);
        assert_eq!(schema.field("id").unwrap().data_type, DataType::Int32);
        assert!(schema.field("missing").is_none());
    }

    #[test]
    fn test_schema_rejects_duplicates_and_zero_width() {
        assert!(Schema::new(vec![Field::int32("id"), Field::int32("id")]).is_err());
        assert!(Schema::new(vec![Field::vector("v", 0)]).is_err());
        assert!(Schema::new(vec![]).is_err());
    }

    #[test]
    fn test_check_accepts_matching_record() {
        let record = Record::new()
            .with("id", Value::Int32(7))
            .with("vector", Value::Vector(vec![0.1, 0.2, 0.3]));
        assert!(bench_schema().check(&record).is_ok());
        assert_eq!(record.int32("id"), Some(7));
        assert_eq!(record.vector("vector"), Some(&[0.1, 0.2, 0.3][..]));
    }

    #[test]
    fn test_check_reports_dimension_mismatch() {
        let record = Record::new()
            .with("id", Value::Int32(7))
            .with("vector", Value::Vector(vec![0.1, 0.2]));
        assert!(matches!(
            bench_schema().check(&record),
            Err(ClientError::DimensionMismatch {
                expected: 3,
                got: 2
            })
        ));
    }

    #[test]
    fn test_check_rejects_wrong_shape() {
        let missing = Record::new().with("id", Value::Int32(1));
        assert!(matches!(
            bench_schema().check(&missing),
            Err(ClientError::Schema(_))
        ));

        let swapped = Record::new()
            .with("id", Value::Vector(vec![1.0, 2.0, 3.0]))
            .with("vector", Value::Int32(1));
        assert!(matches!(
            bench_schema().check(&swapped),
            Err(ClientError::Schema(_))
        ));
    }
}
