//! Common ID Types
//!
//! Type-safe wrappers over the database's `BIGSERIAL` keys for entities that
//! are referenced across bounded contexts.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Generic typed ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type UserId = Id<markers::User>;
///
/// let id = UserId::from_raw(7);
/// assert_eq!(id.get(), 7);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id<T> {
    value: i64,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    /// Wrap a raw database key
    pub const fn from_raw(value: i64) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    /// Raw key for binding into queries
    pub const fn get(&self) -> i64 {
        self.value
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<i64> for Id<T> {
    fn from(value: i64) -> Self {
        Self::from_raw(value)
    }
}

impl<T> From<Id<T>> for i64 {
    fn from(id: Id<T>) -> Self {
        id.value
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i64::deserialize(deserializer).map(Self::from_raw)
    }
}

/// Marker types for different entity IDs
pub mod markers {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct User;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Recipe;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Tag;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Ingredient;
}

/// Type aliases for common IDs
pub type UserId = Id<markers::User>;
pub type RecipeId = Id<markers::Recipe>;
pub type TagId = Id<markers::Tag>;
pub type IngredientId = Id<markers::Ingredient>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_raw() {
        let id: RecipeId = Id::from_raw(42);
        assert_eq!(id.get(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_id_serializes_as_number() {
        let id = UserId::from_raw(3);
        assert_eq!(serde_json::to_string(&id).unwrap(), "3");

        let parsed: TagId = serde_json::from_str("11").unwrap();
        assert_eq!(parsed, TagId::from_raw(11));
    }

    #[test]
    fn test_ids_order_by_value() {
        let mut ids = vec![IngredientId::from_raw(5), IngredientId::from_raw(2)];
        ids.sort();
        assert_eq!(ids, vec![IngredientId::from_raw(2), IngredientId::from_raw(5)]);
    }
}
