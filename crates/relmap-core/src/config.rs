//! Storage configuration.

use crate::error::Error;
use crate::mapping::ScalarKind;
use crate::model::DbType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Provider id used when nothing else is configured.
pub const DEFAULT_STORAGE_PROVIDER_ID: &str = "Default";

/// Resolves storage groups to storage provider ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageProviderRegistry {
    /// Provider for classes whose storage group is not listed. None means unlisted groups fail.
    pub default_provider: Option<String>,

    /// Storage group to provider id.
    pub storage_groups: BTreeMap<String, String>,
}

impl Default for StorageProviderRegistry {
    fn default() -> Self {
        Self {
            default_provider: Some(DEFAULT_STORAGE_PROVIDER_ID.to_string()),
            storage_groups: BTreeMap::new(),
        }
    }
}

impl StorageProviderRegistry {
    /// Create a registry with only a default provider.
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            default_provider: Some(default_provider.into()),
            storage_groups: BTreeMap::new(),
        }
    }

    /// Create a registry without a default provider.
    pub fn without_default() -> Self {
        Self {
            default_provider: None,
            storage_groups: BTreeMap::new(),
        }
    }

    /// Map a storage group to a provider.
    pub fn with_storage_group(mut self, group: impl Into<String>, provider: impl Into<String>) -> Self {
        self.storage_groups.insert(group.into(), provider.into());
        self
    }

    /// Resolve the provider id for a storage group.
    pub fn resolve(&self, group: Option<&str>) -> Result<&str, Error> {
        group
            .and_then(|g| self.storage_groups.get(g))
            .or(self.default_provider.as_ref())
            .map(String::as_str)
            .ok_or_else(|| Error::NoStorageProvider {
                group: group.map(str::to_string),
            })
    }
}

/// Storage type for one scalar kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMapping {
    /// Type name used when no length is declared, e.g. `nvarchar (max)`.
    pub storage_type_name: String,
    /// Type name prefix used with a declared length, e.g. `nvarchar` for `nvarchar (50)`.
    #[serde(default)]
    pub bounded_type_name: Option<String>,
    /// Provider-neutral type.
    pub db_type: DbType,
}

impl TypeMapping {
    /// Create a mapping without a bounded form.
    pub fn new(storage_type_name: impl Into<String>, db_type: DbType) -> Self {
        Self {
            storage_type_name: storage_type_name.into(),
            bounded_type_name: None,
            db_type,
        }
    }

    /// Create a mapping for a length-bounded type.
    pub fn bounded(
        storage_type_name: impl Into<String>,
        bounded_type_name: impl Into<String>,
        db_type: DbType,
    ) -> Self {
        Self {
            storage_type_name: storage_type_name.into(),
            bounded_type_name: Some(bounded_type_name.into()),
            db_type,
        }
    }

    /// Built-in mapping of a scalar kind (SQL Server dialect).
    pub fn builtin(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Boolean => TypeMapping::new("bit", DbType::Boolean),
            ScalarKind::Byte => TypeMapping::new("tinyint", DbType::Byte),
            ScalarKind::Int16 => TypeMapping::new("smallint", DbType::Int16),
            ScalarKind::Int32 => TypeMapping::new("int", DbType::Int32),
            ScalarKind::Int64 => TypeMapping::new("bigint", DbType::Int64),
            ScalarKind::Single => TypeMapping::new("real", DbType::Single),
            ScalarKind::Double => TypeMapping::new("float", DbType::Double),
            ScalarKind::Decimal => TypeMapping::new("decimal (38, 3)", DbType::Decimal),
            ScalarKind::String => TypeMapping::bounded("nvarchar (max)", "nvarchar", DbType::String),
            ScalarKind::Binary => TypeMapping::bounded("varbinary (max)", "varbinary", DbType::Binary),
            ScalarKind::DateTime => TypeMapping::new("datetime", DbType::DateTime),
            ScalarKind::Date => TypeMapping::new("date", DbType::Date),
            ScalarKind::Guid => TypeMapping::new("uniqueidentifier", DbType::Guid),
        }
    }
}

/// Scalar type mappings: built-in defaults plus configured overrides.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeMappingTable {
    /// Overrides of the built-in mappings.
    pub overrides: BTreeMap<ScalarKind, TypeMapping>,

    /// Scalar kinds the storage provider refuses to store.
    pub unsupported: Vec<ScalarKind>,
}

impl TypeMappingTable {
    /// Override the mapping of a scalar kind.
    pub fn with_mapping(mut self, kind: ScalarKind, mapping: TypeMapping) -> Self {
        self.overrides.insert(kind, mapping);
        self
    }

    /// Mark a scalar kind as unsupported.
    pub fn without_kind(mut self, kind: ScalarKind) -> Self {
        if !self.unsupported.contains(&kind) {
            self.unsupported.push(kind);
        }
        self
    }

    /// Effective mapping of a scalar kind, None if the kind is unsupported.
    pub fn mapping(&self, kind: ScalarKind) -> Option<TypeMapping> {
        if self.unsupported.contains(&kind) {
            return None;
        }
        Some(
            self.overrides
                .get(&kind)
                .cloned()
                .unwrap_or_else(|| TypeMapping::builtin(kind)),
        )
    }
}

/// Configuration consumed by the persistence model loader.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfiguration {
    /// Storage group to provider resolution.
    pub providers: StorageProviderRegistry,

    /// Scalar type mappings.
    pub type_mappings: TypeMappingTable,
}

impl StorageConfiguration {
    /// Create a configuration with a single default provider.
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            providers: StorageProviderRegistry::new(default_provider),
            ..Default::default()
        }
    }

    /// Set the provider registry.
    pub fn with_providers(mut self, providers: StorageProviderRegistry) -> Self {
        self.providers = providers;
        self
    }

    /// Map a storage group to a provider.
    pub fn with_storage_group(mut self, group: impl Into<String>, provider: impl Into<String>) -> Self {
        self.providers = self.providers.with_storage_group(group, provider);
        self
    }

    /// Set the type mapping table.
    pub fn with_type_mappings(mut self, type_mappings: TypeMappingTable) -> Self {
        self.type_mappings = type_mappings;
        self
    }

    /// Parse a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::Deserialization(e.to_string()))
    }

    /// Read a JSON configuration from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
