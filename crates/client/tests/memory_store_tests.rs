//! Reference Store Behaviour Tests
//!
//! Exercise the in-memory store only through the collaborator traits, the
//! way an adapter sees it.

use std::sync::Arc;

use vdbbench_client::{
    ClientError, Column, ConnectParams, Connector, Field, MemoryConnector, Operation, Record,
    Schema, Value, VectorQuery, DISTANCE_COLUMN,
};
use vdbbench_core::IndexParams;

// ============================================================================
// Test Helpers
// ============================================================================

fn schema() -> Schema {
    Schema::new(vec![Field::int32("id"), Field::vector("vector", 3)]).unwrap()
}

fn row(id: i32, vector: [f32; 3]) -> Record {
    Record::new()
        .with("id", Value::Int32(id))
        .with("vector", Value::Vector(vector.to_vec()))
}

fn seeded() -> MemoryConnector {
    let connector = MemoryConnector::new();
    let conn = connector.connect(&ConnectParams::new("mem://t")).unwrap();
    conn.create_table("items", &schema()).unwrap();
    let table = conn.open_table("items").unwrap();
    table
        .add(vec![
            row(1, [1.0, 0.0, 0.0]),
            row(2, [0.0, 1.0, 0.0]),
            row(3, [0.9, 0.1, 0.0]),
            row(4, [-1.0, 0.0, 0.0]),
        ])
        .unwrap();
    connector
}

fn ids(connector: &MemoryConnector, query: VectorQuery) -> Vec<i32> {
    let conn = connector.connect(&ConnectParams::new("mem://t")).unwrap();
    let table = conn.open_table("items").unwrap();
    let results = table.search(&query).unwrap();
    results.column("id").unwrap().as_int32().unwrap().to_vec()
}

// ============================================================================
// Search
// ============================================================================

#[test]
fn test_results_include_distance_column() {
    let connector = seeded();
    let conn = connector.connect(&ConnectParams::new("mem://t")).unwrap();
    let table = conn.open_table("items").unwrap();

    let results = table
        .search(&VectorQuery::new(vec![1.0, 0.0, 0.0]).metric("L2").limit(2))
        .unwrap();

    assert_eq!(results.num_rows(), 2);
    match results.column(DISTANCE_COLUMN) {
        Some(Column::Float32(d)) => {
            assert_eq!(d[0], 0.0);
            assert!(d[0] <= d[1]);
        }
        other => panic!("unexpected distance column: {other:?}"),
    }
    assert!(results.column("vector").is_some());
}

#[test]
fn test_compound_filters() {
    let connector = seeded();
    let query = VectorQuery::new(vec![1.0, 0.0, 0.0])
        .metric("L2")
        .select(["id"])
        .only_if("id >= 2 AND NOT (id = 3)");
    assert_eq!(ids(&connector, query), vec![2, 4]);

    let query = VectorQuery::new(vec![1.0, 0.0, 0.0])
        .metric("L2")
        .select(["id"])
        .only_if("id = 4 or id = 1");
    assert_eq!(ids(&connector, query), vec![1, 4]);
}

#[test]
fn test_filter_on_vector_column_rejected() {
    let connector = seeded();
    let conn = connector.connect(&ConnectParams::new("mem://t")).unwrap();
    let table = conn.open_table("items").unwrap();
    let err = table
        .search(&VectorQuery::new(vec![1.0, 0.0, 0.0]).only_if("vector > 1"))
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidFilter { .. }));
}

#[test]
fn test_unknown_projection_rejected() {
    let connector = seeded();
    let conn = connector.connect(&ConnectParams::new("mem://t")).unwrap();
    let table = conn.open_table("items").unwrap();
    let err = table
        .search(&VectorQuery::new(vec![1.0, 0.0, 0.0]).select(["title"]))
        .unwrap_err();
    assert!(err.is_not_found());
}

// ============================================================================
// Index and Faults
// ============================================================================

#[test]
fn test_index_metric_drives_unqualified_queries() {
    let connector = seeded();
    let conn = connector.connect(&ConnectParams::new("mem://t")).unwrap();
    let table = conn.open_table("items").unwrap();
    table
        .create_index(
            "vector",
            &IndexParams {
                metric: "dot",
                num_partitions: 2,
                num_sub_vectors: 1,
            },
        )
        .unwrap();
    drop(table);
    drop(conn);

    // Largest dot product with (2, 0, 0) first
    assert_eq!(ids(&connector, VectorQuery::new(vec![2.0, 0.0, 0.0])), vec![1, 3, 2, 4]);
}

#[test]
fn test_faults_are_one_shot_per_operation() {
    let connector = seeded();
    let store = Arc::clone(connector.store());
    store.fail_next(Operation::Search, "first");
    store.fail_next(Operation::Add, "second");

    let conn = connector.connect(&ConnectParams::new("mem://t")).unwrap();
    let table = conn.open_table("items").unwrap();

    assert_eq!(table.count_rows().unwrap(), 4);
    assert!(table.search(&VectorQuery::new(vec![1.0, 0.0, 0.0])).is_err());
    assert!(table.search(&VectorQuery::new(vec![1.0, 0.0, 0.0])).is_ok());
    assert!(table.add(vec![row(5, [0.0, 0.0, 1.0])]).is_err());
    assert_eq!(table.count_rows().unwrap(), 4);
    assert_eq!(store.faults().pending(), 0);
}
