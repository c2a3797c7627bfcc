//! Benchmark configuration
//!
//! Two configs reach an adapter: a [`ConnectionConfig`] created once per run
//! from user settings, and an [`IndexSearchConfig`] created once per case.
//! Both are validated when they are built. A whole run can also be described
//! by a `vdbbench.toml` file, loaded through [`BenchConfig`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::backend::DbKind;
use crate::collection::validate_collection_name;
use crate::error::{ConfigError, ConfigResult};
use crate::metric::{deserialize_lenient, MetricType};
use crate::secret::SecretString;

/// Config file name used by drivers that keep settings next to their data
pub const CONFIG_FILE_NAME: &str = "vdbbench.toml";

/// Collection name used when a case does not pick one
pub const DEFAULT_COLLECTION_NAME: &str = "VectorDBBenchCollection";

// ============================================================================
// Connection Config
// ============================================================================

/// Connection endpoint and credentials
///
/// Immutable after creation. Use [`ConnectionConfig::local`],
/// [`ConnectionConfig::managed`] or [`ConnectionConfig::for_backend`]; each
/// rejects missing required fields up front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionConfig {
    uri: SecretString,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<SecretString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<String>,
}

impl ConnectionConfig {
    /// Config for an embedded store at `uri`
    pub fn local(uri: impl Into<SecretString>) -> ConfigResult<Self> {
        Self::for_backend(DbKind::LanceDb, Some(uri.into()), None, None)
    }

    /// Config for a managed store; all three fields are required
    pub fn managed(
        uri: impl Into<SecretString>,
        api_key: impl Into<SecretString>,
        region: impl Into<String>,
    ) -> ConfigResult<Self> {
        Self::for_backend(
            DbKind::LanceDbCloud,
            Some(uri.into()),
            Some(api_key.into()),
            Some(region.into()),
        )
    }

    /// Build and validate a config for `kind`
    ///
    /// An absent URI takes the backend's default.
    pub fn for_backend(
        kind: DbKind,
        uri: Option<SecretString>,
        api_key: Option<SecretString>,
        region: Option<String>,
    ) -> ConfigResult<Self> {
        let config = ConnectionConfig {
            uri: uri.unwrap_or_else(|| SecretString::new(kind.default_uri())),
            api_key: api_key.filter(|k| !k.is_blank()),
            region: region.filter(|r| !r.trim().is_empty()),
        };
        config.validate_for(kind)?;
        Ok(config)
    }

    /// Check that every field `kind` requires is present
    pub fn validate_for(&self, kind: DbKind) -> ConfigResult<()> {
        if self.uri.is_blank() {
            return Err(ConfigError::MissingField {
                backend: kind.name(),
                field: "uri",
            });
        }
        if kind.capabilities().requires_api_key {
            if self.api_key.is_none() {
                return Err(ConfigError::MissingField {
                    backend: kind.name(),
                    field: "api_key",
                });
            }
            if self.region.is_none() {
                return Err(ConfigError::MissingField {
                    backend: kind.name(),
                    field: "region",
                });
            }
        }
        Ok(())
    }

    /// Endpoint URI
    pub fn uri(&self) -> &SecretString {
        &self.uri
    }

    /// API key, if any
    pub fn api_key(&self) -> Option<&SecretString> {
        self.api_key.as_ref()
    }

    /// Region, if any
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Plain key-value view handed to the collaborator's connect call
    ///
    /// Secrets are exposed here; the map must not be logged.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert("uri".to_string(), self.uri.expose_secret().to_string());
        if let Some(api_key) = &self.api_key {
            map.insert("api_key".to_string(), api_key.expose_secret().to_string());
        }
        if let Some(region) = &self.region {
            map.insert("region".to_string(), region.clone());
        }
        map
    }

    /// Parse a `[connection]` table for `kind`
    pub fn from_toml_str(kind: DbKind, s: &str) -> ConfigResult<Self> {
        let raw: RawConnectionConfig = toml::from_str(s)?;
        raw.into_config(kind)
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawConnectionConfig {
    #[serde(default)]
    uri: Option<SecretString>,
    #[serde(default)]
    api_key: Option<SecretString>,
    #[serde(default)]
    region: Option<String>,
}

impl RawConnectionConfig {
    fn into_config(self, kind: DbKind) -> ConfigResult<ConnectionConfig> {
        ConnectionConfig::for_backend(kind, self.uri, self.api_key, self.region)
    }
}

// ============================================================================
// Index/Search Config
// ============================================================================

fn default_num_partitions() -> u32 {
    256
}

fn default_num_sub_vectors() -> u32 {
    96
}

fn default_refine_factor() -> Option<u32> {
    Some(0)
}

/// Backend-tunable index and query knobs for one benchmark case
///
/// Values are not range-checked; the store rejects unusable ones when the
/// index is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSearchConfig {
    /// Similarity metric; unset means cosine
    #[serde(
        default,
        deserialize_with = "deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub metric_type: Option<MetricType>,
    /// IVF partition count
    #[serde(default = "default_num_partitions")]
    pub num_partitions: u32,
    /// PQ sub-vector count
    #[serde(default = "default_num_sub_vectors")]
    pub num_sub_vectors: u32,
    /// Partitions probed per query
    #[serde(default)]
    pub nprobes: u32,
    /// Re-rank multiplier; `None` for backends without the knob
    #[serde(
        default = "default_refine_factor",
        skip_serializing_if = "Option::is_none"
    )]
    pub refine_factor: Option<u32>,
}

impl Default for IndexSearchConfig {
    fn default() -> Self {
        Self {
            metric_type: None,
            num_partitions: default_num_partitions(),
            num_sub_vectors: default_num_sub_vectors(),
            nprobes: 0,
            refine_factor: default_refine_factor(),
        }
    }
}

impl IndexSearchConfig {
    /// Defaults shaped for `kind`
    pub fn for_backend(kind: DbKind) -> Self {
        Self::default().shaped_for(kind)
    }

    /// Set the metric
    pub fn with_metric(mut self, metric: MetricType) -> Self {
        self.metric_type = Some(metric);
        self
    }

    /// Drop knobs `kind` does not accept
    pub fn shaped_for(mut self, kind: DbKind) -> Self {
        if !kind.capabilities().supports_refine_factor {
            self.refine_factor = None;
        }
        self
    }

    /// Parse a `[case]` table for `kind`
    pub fn from_toml_str(kind: DbKind, s: &str) -> ConfigResult<Self> {
        let config: IndexSearchConfig = toml::from_str(s)?;
        Ok(config.shaped_for(kind))
    }
}

// ============================================================================
// Config File
// ============================================================================

/// A complete run description loaded from `vdbbench.toml`
///
/// # Example
///
/// ```toml
/// db = "lancedb"
/// collection_name = "VectorDBBenchCollection"
/// drop_old = true
///
/// [connection]
/// uri = "data/vector-lancedb"
///
/// [case]
/// metric_type = "COSINE"
/// num_partitions = 256
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchConfig {
    /// Backend kind
    pub db: DbKind,
    /// Target collection
    pub collection_name: String,
    /// Drop the collection before loading
    pub drop_old: bool,
    /// Connection settings
    pub connection: ConnectionConfig,
    /// Index/search knobs
    pub case: IndexSearchConfig,
}

#[derive(Debug, Deserialize)]
struct RawBenchConfig {
    db: String,
    #[serde(default)]
    collection_name: Option<String>,
    #[serde(default)]
    drop_old: bool,
    #[serde(default)]
    connection: RawConnectionConfig,
    #[serde(default)]
    case: Option<IndexSearchConfig>,
}

impl BenchConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# vdbbench run configuration
#
# Backend: "lancedb" (embedded) or "lancedb_cloud" (managed)
db = "lancedb"

# Target collection and whether to drop it before loading
collection_name = "VectorDBBenchCollection"
drop_old = false

[connection]
uri = "data/vector-lancedb"
# api_key = "..."       # required for lancedb_cloud
# region = "us-east-1"  # required for lancedb_cloud

[case]
# metric_type = "COSINE"   # "L2", "IP" or "COSINE"; unset means cosine
num_partitions = 256
num_sub_vectors = 96
nprobes = 0
refine_factor = 0          # ignored by lancedb_cloud
"#
    }

    /// Parse and validate a config from TOML text
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        let raw: RawBenchConfig = toml::from_str(s)?;
        let db = DbKind::parse(&raw.db)?;
        let collection_name = raw
            .collection_name
            .unwrap_or_else(|| DEFAULT_COLLECTION_NAME.to_string());
        validate_collection_name(&collection_name)?;
        Ok(BenchConfig {
            db,
            collection_name,
            drop_old: raw.drop_old,
            connection: raw.connection.into_config(db)?,
            case: raw.case.unwrap_or_default().shaped_for(db),
        })
    }

    /// Read and parse config from a file path.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> ConfigResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| ConfigError::Io {
                path: path.display().to_string(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })
    }
}
