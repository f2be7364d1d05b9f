//! # Tri-state Patch Fields
//!
//! A partial update must tell three things apart for every field:
//!
//! | Variant | On the wire | Meaning |
//! |---------|-------------|---------|
//! | [`Field::Absent`] | key omitted | leave the stored value alone |
//! | [`Field::Null`] | `null` | clear a nullable field |
//! | [`Field::Value`] | the value | overwrite |
//!
//! `Option<T>` can only express two of these, so patch structs use `Field<T>` and annotate every
//! member with `#[serde(default, skip_serializing_if = "Field::is_absent")]`.
//!
//! ```rust
//! use console_framework::Field;
//! use serde::Serialize;
//!
//! #[derive(Serialize, Default)]
//! struct ClanPatch {
//!     #[serde(default, skip_serializing_if = "Field::is_absent")]
//!     name: Field<String>,
//!     #[serde(default, skip_serializing_if = "Field::is_absent")]
//!     leader_id: Field<i64>,
//! }
//!
//! let patch = ClanPatch { leader_id: Field::Null, ..Default::default() };
//! assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"leader_id":null}"#);
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Field<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    pub fn is_present(&self) -> bool {
        !self.is_absent()
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Seeds a field from a nullable record value: `None` becomes an explicit `Null`.
    pub fn from_nullable(value: Option<T>) -> Self {
        match value {
            Some(v) => Field::Value(v),
            None => Field::Null,
        }
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Field::Value(value)
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Only reachable when the owner forgot `skip_serializing_if`.
            Field::Absent | Field::Null => serializer.serialize_none(),
            Field::Value(v) => v.serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Field::from_nullable(Option::<T>::deserialize(deserializer)?))
    }
}
