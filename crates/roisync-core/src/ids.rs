//! Stable object identity.
//!
//! Every wire shape carries the identifier of the logical object it belongs
//! to. Identifiers that cannot be read back are regenerated through an
//! [`IdSource`] so the fallback is visible and deterministic in tests.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Object identifier - UUID shared by every part of one logical object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub Uuid);

impl ObjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a textual UUID, `None` if it is not one
    pub fn parse(text: &str) -> Option<Self> {
        Uuid::parse_str(text).ok().map(Self)
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ObjectId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Supplier of identifiers for objects whose identity was lost
pub trait IdSource {
    fn next_id(&mut self) -> ObjectId;
}

/// Random v4 identifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&mut self) -> ObjectId {
        ObjectId::new()
    }
}

/// Identifiers counting up from `00000000-0000-0000-0000-000000000001`
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    issued: u128,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many identifiers were handed out
    pub fn issued(&self) -> u128 {
        self.issued
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> ObjectId {
        self.issued += 1;
        ObjectId(Uuid::from_u128(self.issued))
    }
}

impl<T: IdSource + ?Sized> IdSource for &mut T {
    fn next_id(&mut self) -> ObjectId {
        (**self).next_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_are_predictable() {
        let mut ids = SequentialIds::new();
        assert_eq!(
            ids.next_id().to_string(),
            "00000000-0000-0000-0000-000000000001"
        );
        assert_eq!(ids.next_id().0, Uuid::from_u128(2));
        assert_eq!(ids.issued(), 2);
    }

    #[test]
    fn parse_rejects_non_uuid() {
        assert!(ObjectId::parse("4f0a3bd5-2954-4110-a37c-bab2a01e8e2c").is_some());
        assert!(ObjectId::parse("NoParent").is_none());
        assert!(ObjectId::parse("").is_none());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id: ObjectId = "4f0a3bd5-2954-4110-a37c-bab2a01e8e2c".parse().unwrap();
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"4f0a3bd5-2954-4110-a37c-bab2a01e8e2c\""
        );
    }
}
