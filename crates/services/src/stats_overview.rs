use std::sync::Arc;

use drill_core::model::Tier;
use drill_core::stats::{StatsBook, StatsRecord};
use storage::repository::{StatsStore, StorageError};

/// Display-ready accuracy figures for one bucket.
///
/// Ratios are `None` until the corresponding question has been attempted, so
/// the ui can render a placeholder instead of a fake 0%.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketOverview {
    pub label: &'static str,
    pub items_total: u32,
    pub fully_correct: u32,
    pub accuracy: Option<f64>,
    pub category_accuracy: Option<f64>,
    pub sub_category_accuracy: Option<f64>,
    pub wing_accuracy: Option<f64>,
}

impl BucketOverview {
    fn from_record(label: &'static str, record: &StatsRecord) -> Self {
        Self {
            label,
            items_total: record.items_total,
            fully_correct: record.overall_correct,
            accuracy: ratio(record.overall_correct, record.items_total),
            category_accuracy: ratio(record.category_correct, record.items_total),
            sub_category_accuracy: ratio(
                record.sub_category_correct,
                record.sub_category_attempts,
            ),
            wing_accuracy: ratio(record.wing_correct, record.wing_attempts),
        }
    }
}

/// Accuracy overview across all buckets, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsOverview {
    pub overall: BucketOverview,
    pub tiers: [BucketOverview; 3],
}

impl StatsOverview {
    /// Derives the overview from a loaded book.
    #[must_use]
    pub fn from_book(book: &StatsBook) -> Self {
        Self {
            overall: BucketOverview::from_record("Overall", &book.overall),
            tiers: [
                BucketOverview::from_record(Tier::Novice.label(), &book.novice),
                BucketOverview::from_record(Tier::Proficient.label(), &book.proficient),
                BucketOverview::from_record(Tier::Expert.label(), &book.expert),
            ],
        }
    }
}

fn ratio(correct: u32, attempts: u32) -> Option<f64> {
    (attempts > 0).then(|| f64::from(correct) / f64::from(attempts))
}

/// Read side of the statistics store, for the stats view.
#[derive(Clone)]
pub struct StatsOverviewService {
    stats: Arc<dyn StatsStore>,
}

impl StatsOverviewService {
    #[must_use]
    pub fn new(stats: Arc<dyn StatsStore>) -> Self {
        Self { stats }
    }

    /// Loads the persisted book and derives display fractions.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for backend failures.
    pub async fn overview(&self) -> Result<StatsOverview, StorageError> {
        let book = self.stats.load_stats().await?;
        Ok(StatsOverview::from_book(&book))
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unattempted_questions_have_no_ratio() {
        let overview = StatsOverview::from_book(&StatsBook::default());
        assert_eq!(overview.overall.accuracy, None);
        assert_eq!(overview.tiers[0].sub_category_accuracy, None);
        assert_eq!(overview.tiers[2].wing_accuracy, None);
    }

    #[test]
    fn ratios_derive_from_counters() {
        let book = StatsBook {
            overall: StatsRecord {
                items_total: 4,
                overall_correct: 3,
                category_correct: 4,
                sub_category_attempts: 2,
                sub_category_correct: 1,
                ..StatsRecord::default()
            },
            ..StatsBook::default()
        };
        let overview = StatsOverview::from_book(&book);

        assert_eq!(overview.overall.accuracy, Some(0.75));
        assert_eq!(overview.overall.category_accuracy, Some(1.0));
        assert_eq!(overview.overall.sub_category_accuracy, Some(0.5));
        assert_eq!(overview.overall.wing_accuracy, None);
    }

    #[test]
    fn buckets_keep_display_order() {
        let overview = StatsOverview::from_book(&StatsBook::default());
        assert_eq!(overview.tiers[0].label, "Novice");
        assert_eq!(overview.tiers[1].label, "Proficient");
        assert_eq!(overview.tiers[2].label, "Expert");
    }
}
