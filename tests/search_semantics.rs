//! Search Semantics Tests
//!
//! How case configuration turns into store queries:
//!
//! 1. Metric translation and parameter bundles
//! 2. Configuration discovery
//! 3. Ranking per metric
//! 4. Filtered versus unfiltered queries

use std::sync::Arc;

use vdbbench::{
    translate_metric, Adapter, DbKind, IndexSearchConfig, MemoryConnector, MetricType,
    SearchFilter, VectorDb, DEFAULT_K,
};

// ============================================================================
// Test Helpers
// ============================================================================

const URI: &str = "mem://semantics";

fn adapter_with(connector: &MemoryConnector, case: IndexSearchConfig) -> Adapter {
    Adapter::builder(DbKind::LanceDb)
        .connector(Arc::new(connector.clone()))
        .dimension(2)
        .connection_config(vdbbench::ConnectionConfig::local(URI).unwrap())
        .case_config(case)
        .drop_old(true)
        .build()
        .unwrap()
}

/// Rows chosen so that each metric ranks them differently
fn load_axis_rows(adapter: &mut Adapter) {
    let embeddings = vec![vec![1.0, 0.0], vec![4.0, 4.0], vec![0.5, 0.1]];
    adapter
        .with_connection(|db| {
            let (count, err) = db.insert_embeddings(&embeddings, &[1, 2, 3]);
            assert_eq!(count, 3);
            assert!(err.is_none());
            Ok(())
        })
        .unwrap();
}

fn ranking(metric: MetricType) -> Vec<i32> {
    let connector = MemoryConnector::new();
    let mut adapter = adapter_with(&connector, IndexSearchConfig::default().with_metric(metric));
    load_axis_rows(&mut adapter);
    adapter
        .with_connection(|db| db.search_embedding(&[1.0, 0.0], DEFAULT_K, None))
        .unwrap()
}

// ============================================================================
// Module 1: Translation
// ============================================================================

#[test]
fn test_metric_tokens() {
    assert_eq!(translate_metric(Some(MetricType::L2)), "L2");
    assert_eq!(translate_metric(Some(MetricType::InnerProduct)), "dot");
    assert_eq!(translate_metric(Some(MetricType::Cosine)), "cosine");
    assert_eq!(translate_metric(None), "cosine");
}

#[test]
fn test_unset_metric_defaults_to_cosine_everywhere() {
    let config = IndexSearchConfig::default();
    assert_eq!(config.index_params().metric, "cosine");
    assert_eq!(config.search_params().metric, "cosine");
}

#[test]
fn test_parameter_bundles_are_stable() {
    let config = IndexSearchConfig {
        nprobes: 12,
        ..IndexSearchConfig::default().with_metric(MetricType::L2)
    };
    assert_eq!(config.index_params(), config.index_params());
    assert_eq!(config.search_params(), config.search_params());
    assert_eq!(config.index_params().to_json(), config.index_params().to_json());

    let index = config.index_params();
    assert_eq!((index.num_partitions, index.num_sub_vectors), (256, 96));
    let search = config.search_params();
    assert_eq!((search.nprobes, search.refine_factor), (12, Some(0)));
}

// ============================================================================
// Module 2: Discovery
// ============================================================================

#[test]
fn test_config_discovery_per_kind() {
    let local: Vec<_> = Adapter::config_fields(DbKind::LanceDb)
        .iter()
        .map(|f| f.name)
        .collect();
    assert_eq!(local, vec!["uri"]);

    let managed = Adapter::config_fields(DbKind::LanceDbCloud);
    for name in ["uri", "api_key", "region"] {
        let field = managed.iter().find(|f| f.name == name).unwrap();
        assert!(field.required, "{name} should be required");
    }
    assert!(managed.iter().find(|f| f.name == "api_key").unwrap().secret);
}

#[test]
fn test_case_discovery_per_kind() {
    let has_refine = |kind: DbKind| {
        Adapter::case_config_fields(kind)
            .iter()
            .any(|f| f.name == "refine_factor")
    };
    assert!(has_refine(DbKind::LanceDb));
    assert!(!has_refine(DbKind::LanceDbCloud));
}

#[test]
fn test_discovered_configs_parse() {
    let connection = DbKind::LanceDbCloud
        .parse_connection_config(
            r#"
uri = "db://bench"
api_key = "sk-123"
region = "us-east-1"
"#,
        )
        .unwrap();
    assert_eq!(connection.region(), Some("us-east-1"));

    let case = DbKind::LanceDb
        .parse_case_config("metric_type = \"bogus\"\nnprobes = 3")
        .unwrap();
    assert_eq!(case.metric_type, None);
    assert_eq!(case.metric_token(), "cosine");
}

// ============================================================================
// Module 3: Ranking
// ============================================================================

#[test]
fn test_l2_ranking() {
    // distances from (1, 0): id1 = 0, id3 = 0.26, id2 = 25
    assert_eq!(ranking(MetricType::L2), vec![1, 3, 2]);
}

#[test]
fn test_cosine_ranking() {
    // id1 is parallel, id3 nearly so, id2 at 45 degrees
    assert_eq!(ranking(MetricType::Cosine), vec![1, 3, 2]);
}

#[test]
fn test_inner_product_ranking() {
    // dot with (1, 0): id2 = 4, id1 = 1, id3 = 0.5
    assert_eq!(ranking(MetricType::InnerProduct), vec![2, 1, 3]);
}

#[test]
fn test_k_caps_results() {
    let connector = MemoryConnector::new();
    let mut adapter = adapter_with(&connector, IndexSearchConfig::default());
    load_axis_rows(&mut adapter);

    for k in 0..=4 {
        let ids = adapter
            .with_connection(|db| db.search_embedding(&[1.0, 0.0], k, None))
            .unwrap();
        assert_eq!(ids.len(), k.min(3));
    }
}

// ============================================================================
// Module 4: Filtered Queries
// ============================================================================

#[test]
fn test_filter_excludes_non_matching_ids() {
    let connector = MemoryConnector::new();
    let mut adapter = adapter_with(
        &connector,
        IndexSearchConfig::default().with_metric(MetricType::L2),
    );
    load_axis_rows(&mut adapter);

    let ids = adapter
        .with_connection(|db| {
            db.search_embedding(&[1.0, 0.0], DEFAULT_K, Some(&SearchFilter::metadata("!= 1")))
        })
        .unwrap();
    assert_eq!(ids, vec![3, 2]);
}

#[test]
fn test_filter_matching_nothing_returns_empty() {
    let connector = MemoryConnector::new();
    let mut adapter = adapter_with(&connector, IndexSearchConfig::default());
    load_axis_rows(&mut adapter);

    let ids = adapter
        .with_connection(|db| {
            db.search_embedding(&[1.0, 0.0], DEFAULT_K, Some(&SearchFilter::metadata("> 100")))
        })
        .unwrap();
    assert!(ids.is_empty());
}

/// Filtered queries use the index metric and skip probe/refine tuning
#[test]
fn test_filtered_and_unfiltered_queries_differ_only_in_tuning() {
    let connector = MemoryConnector::new();
    let case = IndexSearchConfig {
        nprobes: 7,
        refine_factor: Some(2),
        ..IndexSearchConfig::default().with_metric(MetricType::InnerProduct)
    };
    let mut adapter = adapter_with(&connector, case);
    load_axis_rows(&mut adapter);

    adapter
        .with_connection(|db| {
            db.search_embedding(&[1.0, 0.0], 5, None)?;
            db.search_embedding(&[1.0, 0.0], 5, Some(&SearchFilter::metadata(">= 2")))
        })
        .unwrap();

    let queries = connector
        .store()
        .table(URI, adapter.collection_name())
        .unwrap()
        .queries();
    let (unfiltered, filtered) = (&queries[0], &queries[1]);

    assert_eq!(unfiltered.metric_token(), Some("dot"));
    assert_eq!(filtered.metric_token(), Some("dot"));
    assert_eq!(unfiltered.effective_limit(), filtered.effective_limit());
    assert_eq!(unfiltered.selected(), filtered.selected());

    assert_eq!(unfiltered.probe_count(), Some(7));
    assert_eq!(unfiltered.refine(), Some(2));
    assert_eq!(filtered.probe_count(), None);
    assert_eq!(filtered.refine(), None);
    assert_eq!(filtered.filter(), Some("id >= 2"));
}
