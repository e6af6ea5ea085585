use thiserror::Error;

use crate::model::{CatalogItem, ItemId};

/// Number of items presented per round.
pub const ROUND_SIZE: usize = 2;

/// Errors that can occur assembling a round.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoundError {
    #[error("round contains the same item twice: {0}")]
    DuplicateItem(ItemId),
}

/// Exactly two items selected for one quiz presentation.
///
/// Ephemeral; replaced on every "next round" action. Only the two ids are
/// folded into the persisted seen set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    slots: [CatalogItem; ROUND_SIZE],
}

impl Round {
    /// Builds a round from two items drawn in order.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::DuplicateItem` if both slots share an id.
    pub fn new(first: CatalogItem, second: CatalogItem) -> Result<Self, RoundError> {
        if first.id == second.id {
            return Err(RoundError::DuplicateItem(first.id));
        }
        Ok(Self {
            slots: [first, second],
        })
    }

    /// The two items in draw order.
    #[must_use]
    pub fn slots(&self) -> &[CatalogItem; ROUND_SIZE] {
        &self.slots
    }

    /// Ids of both slots, in draw order.
    #[must_use]
    pub fn ids(&self) -> [ItemId; ROUND_SIZE] {
        [self.slots[0].id.clone(), self.slots[1].id.clone()]
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
