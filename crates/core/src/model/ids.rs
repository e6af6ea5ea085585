use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a catalog item (the image filename).
///
/// Serialized transparently so the persisted seen set stays a plain JSON
/// array of strings.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Creates a new `ItemId`
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the underlying filename
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for ItemId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_display() {
        let id = ItemId::new("portrait.jpg");
        assert_eq!(id.to_string(), "portrait.jpg");
    }

    #[test]
    fn test_item_id_equality() {
        assert_eq!(ItemId::from("a.jpg"), ItemId::new("a.jpg".to_string()));
        assert_ne!(ItemId::from("a.jpg"), ItemId::from("b.jpg"));
    }

    #[test]
    fn test_item_id_serde_is_transparent() {
        let id = ItemId::new("a b.jpg");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"a b.jpg\"");
        let back: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
