//! Storage type resolution.

use crate::config::TypeMappingTable;
use crate::error::Error;
use crate::mapping::{ScalarKind, ValueType};
use crate::model::{DbType, StorageTypeInformation, ValueConversion};

/// Width of the class-id discriminator column.
pub const CLASS_ID_WIDTH: u32 = 100;

/// Width of a serialized object-id column.
pub const SERIALIZED_OBJECT_ID_WIDTH: u32 = 255;

/// Maps value types to physical storage types.
pub trait StorageTypeInformationProvider {
    /// Storage type for a declared value type.
    ///
    /// Returns [`Error::UnsupportedStorageType`] when the type cannot be stored.
    fn storage_type(&self, value_type: &ValueType, max_length: Option<u32>) -> Result<StorageTypeInformation, Error>;

    /// Storage type of the identity column and of object-id value columns.
    fn storage_type_for_object_id(&self) -> StorageTypeInformation;

    /// Storage type of class-id discriminator columns.
    fn storage_type_for_class_id(&self) -> StorageTypeInformation;

    /// Storage type of the row-version column.
    fn storage_type_for_timestamp(&self) -> StorageTypeInformation;

    /// Storage type of object ids referencing another storage provider.
    fn storage_type_for_serialized_object_id(&self) -> StorageTypeInformation;
}

/// SQL Server flavored storage types, driven by a [`TypeMappingTable`].
#[derive(Debug, Clone, Default)]
pub struct SqlStorageTypeInformationProvider {
    table: TypeMappingTable,
}

impl SqlStorageTypeInformationProvider {
    /// Create a provider using the given mapping table.
    pub fn new(table: TypeMappingTable) -> Self {
        Self { table }
    }

    fn scalar_storage_type(
        &self,
        kind: ScalarKind,
        max_length: Option<u32>,
        value_type: &ValueType,
    ) -> Result<StorageTypeInformation, Error> {
        let mapping = self
            .table
            .mapping(kind)
            .ok_or_else(|| unsupported(value_type))?;

        let storage_type = match (kind.has_length(), max_length, &mapping.bounded_type_name) {
            (true, Some(length), Some(prefix)) => {
                StorageTypeInformation::new(format!("{prefix} ({length})"), mapping.db_type).with_width(length)
            }
            _ => StorageTypeInformation::new(mapping.storage_type_name, mapping.db_type),
        };
        Ok(storage_type)
    }
}

fn unsupported(value_type: &ValueType) -> Error {
    Error::UnsupportedStorageType {
        value_type: value_type.to_string(),
        message: format!("Type '{value_type}' is not supported by this storage provider."),
    }
}

impl StorageTypeInformationProvider for SqlStorageTypeInformationProvider {
    fn storage_type(&self, value_type: &ValueType, max_length: Option<u32>) -> Result<StorageTypeInformation, Error> {
        match value_type {
            ValueType::Scalar(kind) => self.scalar_storage_type(*kind, max_length, value_type),
            ValueType::Enum { name, underlying } => {
                if !underlying.is_integer() {
                    return Err(Error::UnsupportedStorageType {
                        value_type: name.clone(),
                        message: format!(
                            "Enum '{name}' must have an integer underlying type, found '{}'.",
                            underlying.type_name()
                        ),
                    });
                }
                Ok(self
                    .scalar_storage_type(*underlying, None, value_type)?
                    .with_conversion(ValueConversion::EnumToUnderlying))
            }
            ValueType::ObjectId => Ok(self.storage_type_for_object_id()),
            ValueType::Other(_) => Err(unsupported(value_type)),
        }
    }

    fn storage_type_for_object_id(&self) -> StorageTypeInformation {
        StorageTypeInformation::new("uniqueidentifier", DbType::Guid).with_conversion(ValueConversion::ObjectIdToGuid)
    }

    fn storage_type_for_class_id(&self) -> StorageTypeInformation {
        StorageTypeInformation::new(format!("varchar ({CLASS_ID_WIDTH})"), DbType::AnsiString)
            .with_conversion(ValueConversion::ClassIdToString)
            .with_width(CLASS_ID_WIDTH)
    }

    fn storage_type_for_timestamp(&self) -> StorageTypeInformation {
        StorageTypeInformation::new("rowversion", DbType::Binary)
    }

    fn storage_type_for_serialized_object_id(&self) -> StorageTypeInformation {
        StorageTypeInformation::new(format!("varchar ({SERIALIZED_OBJECT_ID_WIDTH})"), DbType::AnsiString)
            .with_conversion(ValueConversion::ObjectIdToString)
            .with_width(SERIALIZED_OBJECT_ID_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TypeMapping;

    fn provider() -> SqlStorageTypeInformationProvider {
        SqlStorageTypeInformationProvider::default()
    }

    fn type_name(value_type: ValueType, max_length: Option<u32>) -> String {
        provider().storage_type(&value_type, max_length).unwrap().storage_type_name
    }

    #[test]
    fn test_scalar_types() {
        assert_eq!(type_name(ScalarKind::Boolean.into(), None), "bit");
        assert_eq!(type_name(ScalarKind::Int32.into(), None), "int");
        assert_eq!(type_name(ScalarKind::Int64.into(), None), "bigint");
        assert_eq!(type_name(ScalarKind::Decimal.into(), None), "decimal (38, 3)");
        assert_eq!(type_name(ScalarKind::Guid.into(), None), "uniqueidentifier");
        assert_eq!(type_name(ScalarKind::DateTime.into(), None), "datetime");
    }

    #[test]
    fn test_length_bounded_types() {
        assert_eq!(type_name(ScalarKind::String.into(), None), "nvarchar (max)");
        assert_eq!(type_name(ScalarKind::String.into(), Some(100)), "nvarchar (100)");
        assert_eq!(type_name(ScalarKind::Binary.into(), Some(1000)), "varbinary (1000)");

        let storage_type = provider()
            .storage_type(&ScalarKind::String.into(), Some(100))
            .unwrap();
        assert_eq!(storage_type.width, Some(100));

        // max length is ignored for fixed-width types
        assert_eq!(type_name(ScalarKind::Int32.into(), Some(10)), "int");
    }

    #[test]
    fn test_enum_uses_underlying_type() {
        let storage_type = provider()
            .storage_type(&ValueType::enumeration("OrderPriority", ScalarKind::Int16), None)
            .unwrap();

        assert_eq!(storage_type.storage_type_name, "smallint");
        assert_eq!(storage_type.conversion, ValueConversion::EnumToUnderlying);
    }

    #[test]
    fn test_enum_with_non_integer_underlying_rejected() {
        let result = provider().storage_type(&ValueType::enumeration("Weird", ScalarKind::String), None);
        assert!(matches!(result, Err(Error::UnsupportedStorageType { .. })));
    }

    #[test]
    fn test_unknown_type_rejected() {
        match provider().storage_type(&ValueType::other("Char"), None) {
            Err(Error::UnsupportedStorageType { value_type, message }) => {
                assert_eq!(value_type, "Char");
                assert_eq!(message, "Type 'Char' is not supported by this storage provider.");
            }
            other => panic!("Expected UnsupportedStorageType, got {other:?}"),
        }
    }

    #[test]
    fn test_configured_overrides() {
        let provider = SqlStorageTypeInformationProvider::new(
            TypeMappingTable::default()
                .with_mapping(ScalarKind::String, TypeMapping::bounded("varchar (max)", "varchar", DbType::AnsiString))
                .without_kind(ScalarKind::Single),
        );

        let storage_type = provider.storage_type(&ScalarKind::String.into(), Some(20)).unwrap();
        assert_eq!(storage_type.storage_type_name, "varchar (20)");
        assert_eq!(storage_type.db_type, DbType::AnsiString);
        assert!(provider.storage_type(&ScalarKind::Single.into(), None).is_err());
    }

    #[test]
    fn test_infrastructure_types() {
        let provider = provider();

        assert_eq!(provider.storage_type_for_object_id().storage_type_name, "uniqueidentifier");
        assert_eq!(provider.storage_type_for_class_id().storage_type_name, "varchar (100)");
        assert_eq!(provider.storage_type_for_timestamp().storage_type_name, "rowversion");
        assert_eq!(
            provider.storage_type_for_serialized_object_id().conversion,
            ValueConversion::ObjectIdToString
        );
    }
}
