//! Metric translation
//!
//! Benchmark cases name similarity metrics abstractly. Backends want their
//! own tokens. [`translate_metric`] is the single place that mapping lives.

use serde::{Deserialize, Deserializer, Serialize};

/// Metric token for Euclidean distance
pub const METRIC_L2: &str = "L2";
/// Metric token for inner product
pub const METRIC_DOT: &str = "dot";
/// Metric token for cosine distance, also the fallback
pub const METRIC_COSINE: &str = "cosine";

/// Abstract similarity metric used by benchmark cases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricType {
    /// Euclidean distance
    #[serde(rename = "L2")]
    L2,
    /// Inner product
    #[serde(rename = "IP")]
    InnerProduct,
    /// Cosine similarity
    #[serde(rename = "COSINE")]
    Cosine,
}

impl MetricType {
    /// Canonical case-file name
    pub fn name(&self) -> &'static str {
        match self {
            MetricType::L2 => "L2",
            MetricType::InnerProduct => "IP",
            MetricType::Cosine => "COSINE",
        }
    }

    /// Parse a metric name (case-insensitive)
    ///
    /// Accepts the case-file names as well as common aliases.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "l2" | "euclidean" => Some(MetricType::L2),
            "ip" | "dot" | "dot_product" | "inner_product" => Some(MetricType::InnerProduct),
            "cosine" => Some(MetricType::Cosine),
            _ => None,
        }
    }

    /// Backend token for this metric
    pub fn token(&self) -> &'static str {
        translate_metric(Some(*self))
    }
}

/// Translate an optional metric into the backend metric token
///
/// `None` means the case left the metric unset and falls back to cosine.
pub fn translate_metric(metric: Option<MetricType>) -> &'static str {
    match metric {
        Some(MetricType::L2) => METRIC_L2,
        Some(MetricType::InnerProduct) => METRIC_DOT,
        Some(MetricType::Cosine) | None => METRIC_COSINE,
    }
}

/// Translate a free-form metric name; unrecognised names fall back to cosine
pub fn translate_metric_name(name: &str) -> &'static str {
    translate_metric(MetricType::parse(name))
}

/// Deserialize an optional metric, mapping unrecognised names to unset
pub(crate) fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<MetricType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(MetricType::parse))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_translate_documented_tokens() {
        assert_eq!(translate_metric(Some(MetricType::L2)), "L2");
        assert_eq!(translate_metric(Some(MetricType::InnerProduct)), "dot");
        assert_eq!(translate_metric(Some(MetricType::Cosine)), "cosine");
    }

    #[test]
    fn test_unset_falls_back_to_cosine() {
        assert_eq!(translate_metric(None), "cosine");
    }

    #[test]
    fn test_unrecognised_name_falls_back_to_cosine() {
        assert_eq!(translate_metric_name("hamming"), "cosine");
        assert_eq!(translate_metric_name(""), "cosine");
        assert_eq!(translate_metric_name("l2"), "L2");
        assert_eq!(translate_metric_name("IP"), "dot");
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(MetricType::parse("L2"), Some(MetricType::L2));
        assert_eq!(MetricType::parse("euclidean"), Some(MetricType::L2));
        assert_eq!(MetricType::parse("Inner_Product"), Some(MetricType::InnerProduct));
        assert_eq!(MetricType::parse(" cosine "), Some(MetricType::Cosine));
        assert_eq!(MetricType::parse("jaccard"), None);
    }

    #[test]
    fn test_name_parses_back() {
        for metric in [MetricType::L2, MetricType::InnerProduct, MetricType::Cosine] {
            assert_eq!(MetricType::parse(metric.name()), Some(metric));
        }
    }

    proptest! {
        #[test]
        fn prop_translate_is_total(name in "\\PC*") {
            let token = translate_metric_name(&name);
            prop_assert!([METRIC_L2, METRIC_DOT, METRIC_COSINE].contains(&token));
            if MetricType::parse(&name).is_none() {
                prop_assert_eq!(token, METRIC_COSINE);
            }
        }
    }
}
