use crate::model::{CatalogItem, Category};

//
// ─── BANDS ─────────────────────────────────────────────────────────────────────
//

/// Category band used for weighted pool selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    /// Categories 1-4.
    Low,
    /// Categories 5-8.
    High,
    /// Category 9 only.
    Neutral,
}

impl Band {
    /// The band a category falls into.
    #[must_use]
    pub fn of(category: Category) -> Self {
        match category.value() {
            1..=4 => Band::Low,
            5..=8 => Band::High,
            _ => Band::Neutral,
        }
    }
}

//
// ─── POOL SET ──────────────────────────────────────────────────────────────────
//

/// Read-only partition of the catalog by category band.
///
/// Disjoint and exhaustive over items with a parsed category; items without
/// one belong to no band (they still count toward coverage bookkeeping, which
/// runs over the full item list).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolSet {
    low: Vec<CatalogItem>,
    high: Vec<CatalogItem>,
    neutral: Vec<CatalogItem>,
}

impl PoolSet {
    /// Partitions the normalized catalog once, after load.
    #[must_use]
    pub fn partition(items: &[CatalogItem]) -> Self {
        let mut pools = Self::default();
        for item in items {
            let Some(category) = item.category else {
                continue;
            };
            match Band::of(category) {
                Band::Low => pools.low.push(item.clone()),
                Band::High => pools.high.push(item.clone()),
                Band::Neutral => pools.neutral.push(item.clone()),
            }
        }
        pools
    }

    /// Items in the given band.
    #[must_use]
    pub fn band(&self, band: Band) -> &[CatalogItem] {
        match band {
            Band::Low => &self.low,
            Band::High => &self.high,
            Band::Neutral => &self.neutral,
        }
    }

    /// Total number of pooled items (excludes unparseable categories).
    #[must_use]
    pub fn len(&self) -> usize {
        self.low.len() + self.high.len() + self.neutral.len()
    }

    /// True when no band holds any item.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CatalogEntry;

    fn item(folder: &str, file: &str) -> CatalogItem {
        CatalogItem::from_entry(CatalogEntry {
            folder: folder.to_string(),
            file: file.to_string(),
            title: String::new(),
        })
    }

    #[test]
    fn band_rule_matches_category_ranges() {
        assert_eq!(Band::of(Category::new(1).unwrap()), Band::Low);
        assert_eq!(Band::of(Category::new(4).unwrap()), Band::Low);
        assert_eq!(Band::of(Category::new(5).unwrap()), Band::High);
        assert_eq!(Band::of(Category::new(8).unwrap()), Band::High);
        assert_eq!(Band::of(Category::new(9).unwrap()), Band::Neutral);
    }

    #[test]
    fn partition_is_disjoint_and_exhaustive_over_parsed_items() {
        let items = vec![
            item("Se1", "a.jpg"),
            item("So4w3", "b.jpg"),
            item("Sx5", "c.jpg"),
            item("Se8w7", "d.jpg"),
            item("So9", "e.jpg"),
            item("Sexx", "f.jpg"), // no category, no band
        ];
        let pools = PoolSet::partition(&items);

        assert_eq!(pools.band(Band::Low).len(), 2);
        assert_eq!(pools.band(Band::High).len(), 2);
        assert_eq!(pools.band(Band::Neutral).len(), 1);
        assert_eq!(pools.len(), 5);
    }

    #[test]
    fn empty_catalog_partitions_to_empty_pools() {
        let pools = PoolSet::partition(&[]);
        assert!(pools.is_empty());
    }
}
