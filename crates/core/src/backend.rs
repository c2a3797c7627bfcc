//! Backend kinds and capability descriptors
//!
//! The local and managed variants of a store share one adapter. What differs
//! between them is captured here: which connection fields they need, which
//! query knobs they honour, and whether `optimize` builds an index.

use serde::{Deserialize, Serialize};

use crate::config::{ConnectionConfig, IndexSearchConfig};
use crate::error::{ConfigError, ConfigResult};

/// Capabilities of a backend variant
///
/// The adapter consults this descriptor instead of branching on the backend
/// kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendCapabilities {
    /// Query builder accepts a refine factor
    pub supports_refine_factor: bool,
    /// Connection requires an API key and a region
    pub requires_api_key: bool,
    /// Store indexes automatically once connected
    ///
    /// Read by `ready_to_load`. No current kind sets it, so the hook stays a
    /// no-op; a backend that sets it must suspend indexing there.
    pub auto_index_on_connect: bool,
    /// `optimize` issues an index build
    pub builds_index_on_optimize: bool,
}

impl BackendCapabilities {
    /// Embedded store addressed by a local path
    pub const LOCAL: BackendCapabilities = BackendCapabilities {
        supports_refine_factor: true,
        requires_api_key: false,
        auto_index_on_connect: false,
        builds_index_on_optimize: true,
    };

    /// Managed remote store addressed by a `db://` URI
    pub const MANAGED: BackendCapabilities = BackendCapabilities {
        supports_refine_factor: false,
        requires_api_key: true,
        auto_index_on_connect: false,
        builds_index_on_optimize: false,
    };
}

/// Static description of one configuration field
///
/// Drivers use these to validate and render user input without knowing the
/// concrete config types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigField {
    /// Field name as it appears in config files
    pub name: &'static str,
    /// Whether the field must be supplied (after defaults are applied)
    pub required: bool,
    /// Whether the value is a credential
    pub secret: bool,
    /// Default applied when the field is absent
    pub default: Option<&'static str>,
}

impl ConfigField {
    const fn new(
        name: &'static str,
        required: bool,
        secret: bool,
        default: Option<&'static str>,
    ) -> Self {
        ConfigField {
            name,
            required,
            secret,
            default,
        }
    }
}

const LOCAL_CONNECTION_FIELDS: &[ConfigField] = &[ConfigField::new(
    "uri",
    true,
    true,
    Some(DbKind::LOCAL_DEFAULT_URI),
)];

const MANAGED_CONNECTION_FIELDS: &[ConfigField] = &[
    ConfigField::new("uri", true, true, Some(DbKind::MANAGED_DEFAULT_URI)),
    ConfigField::new("api_key", true, true, None),
    ConfigField::new("region", true, false, None),
];

const LOCAL_CASE_FIELDS: &[ConfigField] = &[
    ConfigField::new("metric_type", false, false, None),
    ConfigField::new("num_partitions", false, false, Some("256")),
    ConfigField::new("num_sub_vectors", false, false, Some("96")),
    ConfigField::new("nprobes", false, false, Some("0")),
    ConfigField::new("refine_factor", false, false, Some("0")),
];

const MANAGED_CASE_FIELDS: &[ConfigField] = &[
    ConfigField::new("metric_type", false, false, None),
    ConfigField::new("num_partitions", false, false, Some("256")),
    ConfigField::new("num_sub_vectors", false, false, Some("96")),
    ConfigField::new("nprobes", false, false, Some("0")),
];

/// Backend variants known to the workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DbKind {
    /// Embedded LanceDB
    #[serde(rename = "lancedb")]
    LanceDb,
    /// Managed LanceDB Cloud
    #[serde(rename = "lancedb_cloud")]
    LanceDbCloud,
}

impl DbKind {
    /// Default URI for the embedded store
    pub const LOCAL_DEFAULT_URI: &'static str = "data/vector-lancedb";
    /// Default URI for the managed store
    pub const MANAGED_DEFAULT_URI: &'static str = "db://test";

    /// All known kinds
    pub const ALL: [DbKind; 2] = [DbKind::LanceDb, DbKind::LanceDbCloud];

    /// Name used in config files and logs
    pub fn name(&self) -> &'static str {
        match self {
            DbKind::LanceDb => "lancedb",
            DbKind::LanceDbCloud => "lancedb_cloud",
        }
    }

    /// Parse a backend name (case-insensitive, `-` and `_` interchangeable)
    pub fn parse(s: &str) -> ConfigResult<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "lancedb" => Ok(DbKind::LanceDb),
            "lancedb_cloud" => Ok(DbKind::LanceDbCloud),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }

    /// Capability descriptor for this kind
    pub fn capabilities(&self) -> BackendCapabilities {
        match self {
            DbKind::LanceDb => BackendCapabilities::LOCAL,
            DbKind::LanceDbCloud => BackendCapabilities::MANAGED,
        }
    }

    /// URI used when the connection config leaves it out
    pub fn default_uri(&self) -> &'static str {
        match self {
            DbKind::LanceDb => Self::LOCAL_DEFAULT_URI,
            DbKind::LanceDbCloud => Self::MANAGED_DEFAULT_URI,
        }
    }

    /// Shape of the connection config for this kind
    pub fn config_fields(&self) -> &'static [ConfigField] {
        match self {
            DbKind::LanceDb => LOCAL_CONNECTION_FIELDS,
            DbKind::LanceDbCloud => MANAGED_CONNECTION_FIELDS,
        }
    }

    /// Shape of the per-case index/search config for this kind
    pub fn case_config_fields(&self) -> &'static [ConfigField] {
        match self {
            DbKind::LanceDb => LOCAL_CASE_FIELDS,
            DbKind::LanceDbCloud => MANAGED_CASE_FIELDS,
        }
    }

    /// Parse and validate user connection settings for this kind
    pub fn parse_connection_config(&self, toml: &str) -> ConfigResult<ConnectionConfig> {
        ConnectionConfig::from_toml_str(*self, toml)
    }

    /// Parse user index/search settings for this kind
    pub fn parse_case_config(&self, toml: &str) -> ConfigResult<IndexSearchConfig> {
        IndexSearchConfig::from_toml_str(*self, toml)
    }
}

impl std::fmt::Display for DbKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!(DbKind::parse("lancedb").unwrap(), DbKind::LanceDb);
        assert_eq!(DbKind::parse("LanceDB-Cloud").unwrap(), DbKind::LanceDbCloud);
        assert!(matches!(
            DbKind::parse("milvus"),
            Err(ConfigError::UnknownBackend(name)) if name == "milvus"
        ));
    }

    #[test]
    fn test_parse_connection_config_fills_default_uri() {
        let config = DbKind::LanceDb.parse_connection_config("").unwrap();
        assert_eq!(config.uri().expose_secret(), DbKind::LOCAL_DEFAULT_URI);

        let err = DbKind::LanceDbCloud
            .parse_connection_config("api_key = \"sk\"")
            .unwrap_err();
        assert!(err.is_missing_field());
    }

    #[test]
    fn test_parse_case_config_shapes_for_kind() {
        let local = DbKind::LanceDb.parse_case_config("nprobes = 8").unwrap();
        assert_eq!(local.nprobes, 8);
        assert_eq!(local.refine_factor, Some(0));

        let managed = DbKind::LanceDbCloud
            .parse_case_config("refine_factor = 4")
            .unwrap();
        assert_eq!(managed.refine_factor, None);
    }

    #[test]
    fn test_name_round_trip() {
        for kind in DbKind::ALL {
            assert_eq!(DbKind::parse(kind.name()).unwrap(), kind);
        }
    }

    #[test]
    fn test_capabilities_differ_only_where_expected() {
        let local = DbKind::LanceDb.capabilities();
        let managed = DbKind::LanceDbCloud.capabilities();

        assert!(local.supports_refine_factor);
        assert!(!managed.supports_refine_factor);
        assert!(!local.requires_api_key);
        assert!(managed.requires_api_key);
        assert!(local.builds_index_on_optimize);
        assert!(!managed.builds_index_on_optimize);
        assert_eq!(local.auto_index_on_connect, managed.auto_index_on_connect);
    }

    #[test]
    fn test_config_shapes() {
        let local: Vec<_> = DbKind::LanceDb.config_fields().iter().map(|f| f.name).collect();
        assert_eq!(local, vec!["uri"]);

        let managed = DbKind::LanceDbCloud.config_fields();
        assert!(managed.iter().all(|f| f.required));
        assert!(managed.iter().any(|f| f.name == "api_key" && f.secret));
        assert!(managed.iter().any(|f| f.name == "region" && !f.secret));
    }

    #[test]
    fn test_refine_factor_only_in_local_case_shape() {
        let has_refine = |kind: DbKind| {
            kind.case_config_fields()
                .iter()
                .any(|f| f.name == "refine_factor")
        };
        assert!(has_refine(DbKind::LanceDb));
        assert!(!has_refine(DbKind::LanceDbCloud));
    }

    #[test]
    fn test_default_uris() {
        assert_eq!(DbKind::LanceDb.default_uri(), "data/vector-lancedb");
        assert_eq!(DbKind::LanceDbCloud.default_uri(), "db://test");
    }
}
