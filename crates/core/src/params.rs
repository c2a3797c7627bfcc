//! Index and search parameter bundles
//!
//! [`IndexSearchConfig`](crate::IndexSearchConfig) renders two bundles: one
//! consumed once when the index is built, one consumed by every unfiltered
//! query. Both derivations are pure.

use serde::Serialize;

use crate::config::IndexSearchConfig;
use crate::metric::translate_metric;

/// Parameters for building the similarity index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexParams {
    /// Backend metric token
    pub metric: &'static str,
    /// Number of IVF partitions
    pub num_partitions: u32,
    /// Number of PQ sub-vectors
    pub num_sub_vectors: u32,
}

/// Parameters for tuning an unfiltered query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchParams {
    /// Backend metric token
    pub metric: &'static str,
    /// Number of partitions probed per query
    pub nprobes: u32,
    /// Re-rank multiplier, absent when the backend has no such knob
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refine_factor: Option<u32>,
}

impl IndexSearchConfig {
    /// Backend metric token for this case
    pub fn metric_token(&self) -> &'static str {
        translate_metric(self.metric_type)
    }

    /// Bundle used once, at optimize time
    pub fn index_params(&self) -> IndexParams {
        IndexParams {
            metric: self.metric_token(),
            num_partitions: self.num_partitions,
            num_sub_vectors: self.num_sub_vectors,
        }
    }

    /// Bundle used on every unfiltered search
    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            metric: self.metric_token(),
            nprobes: self.nprobes,
            refine_factor: self.refine_factor,
        }
    }
}

impl IndexParams {
    /// Render as a JSON object, for logging and result records
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "metric": self.metric,
            "num_partitions": self.num_partitions,
            "num_sub_vectors": self.num_sub_vectors,
        })
    }
}

impl SearchParams {
    /// Render as a JSON object, for logging and result records
    pub fn to_json(&self) -> serde_json::Value {
        let mut value = serde_json::json!({
            "metric": self.metric,
            "nprobes": self.nprobes,
        });
        if let Some(refine_factor) = self.refine_factor {
            value["refine_factor"] = refine_factor.into();
        }
        value
    }
}
