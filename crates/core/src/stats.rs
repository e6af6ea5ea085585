use serde::{Deserialize, Serialize};

use crate::grading::SlotGrade;
use crate::model::{Round, Tier, ROUND_SIZE};

//
// ─── COUNTERS ──────────────────────────────────────────────────────────────────
//

/// Cumulative accuracy counters for one bucket.
///
/// Serialized camelCase: this is the client-storage format, and the flat
/// legacy record used the same field names. Counters only ever grow
/// (saturating).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsRecord {
    pub items_total: u32,
    pub overall_correct: u32,
    pub category_correct: u32,
    pub sub_category_attempts: u32,
    pub sub_category_correct: u32,
    pub wing_attempts: u32,
    pub wing_correct: u32,
}

impl StatsRecord {
    /// Folds one graded slot into this bucket.
    ///
    /// Sub-category counters move only at tiers that ask the question; wing
    /// counters additionally require the item to carry a wing, so the
    /// vacuous `wing_correct` grade never inflates them.
    fn absorb(&mut self, grade: SlotGrade, has_wing: bool, tier: Tier) {
        self.items_total = self.items_total.saturating_add(1);
        if grade.fully_correct {
            self.overall_correct = self.overall_correct.saturating_add(1);
        }
        if grade.category_correct {
            self.category_correct = self.category_correct.saturating_add(1);
        }
        if tier.asks_sub_category() {
            self.sub_category_attempts = self.sub_category_attempts.saturating_add(1);
            if grade.sub_category_correct {
                self.sub_category_correct = self.sub_category_correct.saturating_add(1);
            }
        }
        if tier.asks_wing() && has_wing {
            self.wing_attempts = self.wing_attempts.saturating_add(1);
            if grade.wing_correct {
                self.wing_correct = self.wing_correct.saturating_add(1);
            }
        }
    }
}

//
// ─── STATS BOOK ────────────────────────────────────────────────────────────────
//

/// The persisted accuracy aggregate: one bucket per tier plus the
/// all-tiers `overall` bucket.
///
/// All four keys are required when decoding; a stored record without them is
/// the legacy flat shape and is migrated at the storage boundary via
/// [`StatsBook::from_legacy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsBook {
    pub overall: StatsRecord,
    pub novice: StatsRecord,
    pub proficient: StatsRecord,
    pub expert: StatsRecord,
}

impl StatsBook {
    /// Lifts a legacy flat record into the per-tier shape: the legacy
    /// counters become `overall`, the tier buckets start empty.
    #[must_use]
    pub fn from_legacy(legacy: StatsRecord) -> Self {
        Self {
            overall: legacy,
            ..Self::default()
        }
    }

    /// The bucket for a tier.
    #[must_use]
    pub fn tier(&self, tier: Tier) -> &StatsRecord {
        match tier {
            Tier::Novice => &self.novice,
            Tier::Proficient => &self.proficient,
            Tier::Expert => &self.expert,
        }
    }

    fn tier_mut(&mut self, tier: Tier) -> &mut StatsRecord {
        match tier {
            Tier::Novice => &mut self.novice,
            Tier::Proficient => &mut self.proficient,
            Tier::Expert => &mut self.expert,
        }
    }

    /// Folds a graded round into a new book.
    ///
    /// Each slot is counted once under `overall` and once under the active
    /// tier; the other two tier buckets are untouched. Returns the updated
    /// copy so callers persist a whole-value snapshot.
    #[must_use]
    pub fn record(&self, round: &Round, grades: &[SlotGrade; ROUND_SIZE], tier: Tier) -> Self {
        let mut next = *self;
        for (item, grade) in round.slots().iter().zip(grades) {
            let has_wing = item.wing.is_some();
            next.overall.absorb(*grade, has_wing, tier);
            next.tier_mut(tier).absorb(*grade, has_wing, tier);
        }
        next
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
