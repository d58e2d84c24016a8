//! Object ids and their self-describing string form.
//!
//! A serialized object id reads `ClassID|value|ValueType`, for example
//! `Order|5682f032-2f0b-494b-a31c-c97f02b89c36|Guid`. The class id may not
//! contain `|`; the value may.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const SEPARATOR: char = '|';

/// The id value of a domain object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectIdValue {
    /// GUID id.
    Guid(Uuid),
    /// 32-bit integer id.
    Int32(i32),
    /// 64-bit integer id.
    Int64(i64),
    /// String id.
    String(String),
}

impl ObjectIdValue {
    /// Name of the value type as written into the serialized form.
    pub fn type_name(&self) -> &'static str {
        match self {
            ObjectIdValue::Guid(_) => "Guid",
            ObjectIdValue::Int32(_) => "Int32",
            ObjectIdValue::Int64(_) => "Int64",
            ObjectIdValue::String(_) => "String",
        }
    }
}

impl fmt::Display for ObjectIdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectIdValue::Guid(v) => write!(f, "{v}"),
            ObjectIdValue::Int32(v) => write!(f, "{v}"),
            ObjectIdValue::Int64(v) => write!(f, "{v}"),
            ObjectIdValue::String(v) => f.write_str(v),
        }
    }
}

/// Identity of a domain object: its class id plus an id value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectId {
    /// Class id of the object.
    pub class_id: String,
    /// Id value.
    pub value: ObjectIdValue,
}

impl ObjectId {
    /// Create an object id with a GUID value.
    pub fn guid(class_id: impl Into<String>, value: Uuid) -> Self {
        Self {
            class_id: class_id.into(),
            value: ObjectIdValue::Guid(value),
        }
    }

    /// Create an object id with a 32-bit integer value.
    pub fn int32(class_id: impl Into<String>, value: i32) -> Self {
        Self {
            class_id: class_id.into(),
            value: ObjectIdValue::Int32(value),
        }
    }

    /// Create an object id with a 64-bit integer value.
    pub fn int64(class_id: impl Into<String>, value: i64) -> Self {
        Self {
            class_id: class_id.into(),
            value: ObjectIdValue::Int64(value),
        }
    }

    /// Create an object id with a string value.
    pub fn string(class_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            class_id: class_id.into(),
            value: ObjectIdValue::String(value.into()),
        }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            self.class_id,
            self.value,
            self.value.type_name()
        )
    }
}

impl FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| Error::InvalidObjectId {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let (class_id, rest) = s
            .split_once(SEPARATOR)
            .ok_or_else(|| invalid("missing separator after class id"))?;
        let (value, type_name) = rest
            .rsplit_once(SEPARATOR)
            .ok_or_else(|| invalid("missing separator before value type"))?;

        if class_id.is_empty() {
            return Err(invalid("class id is empty"));
        }

        let value = match type_name {
            "Guid" => ObjectIdValue::Guid(
                Uuid::parse_str(value).map_err(|e| invalid(&e.to_string()))?,
            ),
            "Int32" => ObjectIdValue::Int32(value.parse().map_err(|_| invalid("value is not an Int32"))?),
            "Int64" => ObjectIdValue::Int64(value.parse().map_err(|_| invalid("value is not an Int64"))?),
            "String" => ObjectIdValue::String(value.to_string()),
            other => return Err(invalid(&format!("unknown value type '{other}'"))),
        };

        Ok(ObjectId {
            class_id: class_id.to_string(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guid_object_id_format() {
        let value = Uuid::parse_str("5682f032-2f0b-494b-a31c-c97f02b89c36").unwrap();
        let object_id = ObjectId::guid("Order", value);

        assert_eq!(
            object_id.to_string(),
            "Order|5682f032-2f0b-494b-a31c-c97f02b89c36|Guid"
        );
        assert_eq!(object_id.to_string().parse::<ObjectId>().unwrap(), object_id);
    }

    #[test]
    fn test_string_value_may_contain_separator() {
        let object_id = ObjectId::string("Official", "a|b");
        let parsed: ObjectId = object_id.to_string().parse().unwrap();

        assert_eq!(parsed.value, ObjectIdValue::String("a|b".to_string()));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("Order".parse::<ObjectId>(), Err(Error::InvalidObjectId { .. })));
        assert!("Order|1|Decimal".parse::<ObjectId>().is_err());
        assert!("Order|abc|Int32".parse::<ObjectId>().is_err());
        assert!("|1|Int32".parse::<ObjectId>().is_err());
        assert!("Order|not-a-guid|Guid".parse::<ObjectId>().is_err());
    }
}
