use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The three instinct codes shown in the sub-category dropdown.
///
/// Normalized items carry whatever two characters their folder name starts
/// with; this set is for presentation only and nothing validates against it.
pub const SUB_CATEGORIES: [&str; 3] = ["Se", "So", "Sx"];

/// Errors that can occur constructing a `Category`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CategoryError {
    #[error("category out of range 1-9: {0}")]
    OutOfRange(u8),
}

/// One of the nine primary type labels.
///
/// The nine types sit on a ring: each has two adjacent neighbours ("wings"),
/// with 1 and 9 adjacent to each other.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Category(u8);

impl Category {
    /// All nine categories in display order.
    pub const ALL: [Category; 9] = [
        Category(1),
        Category(2),
        Category(3),
        Category(4),
        Category(5),
        Category(6),
        Category(7),
        Category(8),
        Category(9),
    ];

    /// Creates a category from its numeric label, or `None` outside 1-9.
    #[must_use]
    pub fn new(value: u8) -> Option<Self> {
        (1..=9).contains(&value).then_some(Self(value))
    }

    /// Returns the numeric label (1-9)
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// The adjacent category counter-clockwise on the ring (1's predecessor is 9).
    #[must_use]
    pub fn prev(self) -> Self {
        if self.0 == 1 { Self(9) } else { Self(self.0 - 1) }
    }

    /// The adjacent category clockwise on the ring (9's successor is 1).
    #[must_use]
    pub fn next(self) -> Self {
        if self.0 == 9 { Self(1) } else { Self(self.0 + 1) }
    }

    /// Both admissible wings for this category, lower neighbour first.
    #[must_use]
    pub fn wings(self) -> [Category; 2] {
        [self.prev(), self.next()]
    }

    /// True when `other` is adjacent to `self` under the modulo-9 ring.
    #[must_use]
    pub fn is_wing_of(self, other: Category) -> bool {
        other.prev() == self || other.next() == self
    }
}

impl TryFrom<u8> for Category {
    type Error = CategoryError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(CategoryError::OutOfRange(value))
    }
}

impl From<Category> for u8 {
    fn from(category: Category) -> Self {
        category.0
    }
}

impl fmt::Debug for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Category({})", self.0)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
