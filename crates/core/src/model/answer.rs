use crate::model::Category;

//
// ─── DIFFICULTY TIER ───────────────────────────────────────────────────────────
//

/// Difficulty level controlling which answer fields are graded.
///
/// - `Novice`: category only
/// - `Proficient`: category + sub-category
/// - `Expert`: category + sub-category + wing (where the item has one)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Novice,
    Proficient,
    Expert,
}

impl Tier {
    /// All tiers in ascending strictness, for the tier switcher.
    pub const ALL: [Tier; 3] = [Tier::Novice, Tier::Proficient, Tier::Expert];

    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Tier::Novice => "Novice",
            Tier::Proficient => "Proficient",
            Tier::Expert => "Expert",
        }
    }

    /// Whether the sub-category question is asked (and counted) at this tier.
    #[must_use]
    pub fn asks_sub_category(self) -> bool {
        !matches!(self, Tier::Novice)
    }

    /// Whether the wing question is asked (and counted) at this tier.
    #[must_use]
    pub fn asks_wing(self) -> bool {
        matches!(self, Tier::Expert)
    }
}

//
// ─── ANSWER ────────────────────────────────────────────────────────────────────
//

/// Per-slot user input for one round. Cleared at round start.
///
/// All fields are optional: an omitted field is never equal to anything
/// during grading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answer {
    pub category: Option<Category>,
    pub sub_category: Option<String>,
    pub wing: Option<Category>,
}

impl Answer {
    /// An answer with no fields filled in.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_field_applicability() {
        assert!(!Tier::Novice.asks_sub_category());
        assert!(Tier::Proficient.asks_sub_category());
        assert!(Tier::Expert.asks_sub_category());

        assert!(!Tier::Novice.asks_wing());
        assert!(!Tier::Proficient.asks_wing());
        assert!(Tier::Expert.asks_wing());
    }

    #[test]
    fn empty_answer_has_no_fields() {
        let answer = Answer::empty();
        assert_eq!(answer.category, None);
        assert_eq!(answer.sub_category, None);
        assert_eq!(answer.wing, None);
    }
}
