use serde::Deserialize;

use crate::model::{Category, ItemId};

//
// ─── RAW CATALOG ENTRY ─────────────────────────────────────────────────────────
//

/// One record as delivered by the remote catalog endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    /// Folder/location key, e.g. `"Se4w5"`. Carries the labels.
    pub folder: String,
    /// Image filename, unique within the catalog.
    pub file: String,
    /// Display label, opaque to the quiz logic.
    #[serde(default)]
    pub title: String,
}

//
// ─── NORMALIZED ITEM ───────────────────────────────────────────────────────────
//

/// A quiz-eligible image with its labels extracted from the folder name.
///
/// Normalization never drops an entry: folder names that yield no category or
/// wing produce `None` fields, and every consumer must tolerate them. The
/// sub-category is the first two characters verbatim, unvalidated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub id: ItemId,
    pub folder: String,
    pub category: Option<Category>,
    pub sub_category: String,
    pub wing: Option<Category>,
    pub title: String,
}

impl CatalogItem {
    /// Normalizes a raw catalog entry. Pure; never fails.
    #[must_use]
    pub fn from_entry(entry: CatalogEntry) -> Self {
        let category = first_digit_run(&entry.folder).and_then(Category::new);
        let wing = wing_digit(&entry.folder).and_then(Category::new);
        let sub_category: String = entry.folder.chars().take(2).collect();

        Self {
            id: ItemId::new(entry.file),
            folder: entry.folder,
            category,
            sub_category,
            wing,
            title: entry.title,
        }
    }
}

/// First run of ASCII digits in `s`, parsed. Values above `u8::MAX` are
/// treated the same as no digits at all.
fn first_digit_run(s: &str) -> Option<u8> {
    let digits: String = s
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// The digit immediately following the first case-insensitive `w` marker.
fn wing_digit(s: &str) -> Option<u8> {
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c.eq_ignore_ascii_case(&'w')
            && let Some(d) = chars.peek().and_then(|n| n.to_digit(10))
        {
            return u8::try_from(d).ok();
        }
    }
    None
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(folder: &str, file: &str) -> CatalogEntry {
        CatalogEntry {
            folder: folder.to_string(),
            file: file.to_string(),
            title: String::new(),
        }
    }

    #[test]
    fn normalizes_full_folder_key() {
        let item = CatalogItem::from_entry(entry("Se4w5", "a.jpg"));
        assert_eq!(item.id, ItemId::from("a.jpg"));
        assert_eq!(item.category, Category::new(4));
        assert_eq!(item.sub_category, "Se");
        assert_eq!(item.wing, Category::new(5));
    }

    #[test]
    fn wing_marker_is_case_insensitive() {
        let item = CatalogItem::from_entry(entry("SX9W1", "b.jpg"));
        assert_eq!(item.category, Category::new(9));
        assert_eq!(item.wing, Category::new(1));
    }

    #[test]
    fn missing_wing_yields_none() {
        let item = CatalogItem::from_entry(entry("So9", "c.jpg"));
        assert_eq!(item.category, Category::new(9));
        assert_eq!(item.wing, None);
        assert_eq!(item.sub_category, "So");
    }

    #[test]
    fn digitless_folder_yields_no_category() {
        let item = CatalogItem::from_entry(entry("Sexx", "d.jpg"));
        assert_eq!(item.category, None);
        assert_eq!(item.wing, None);
        assert_eq!(item.sub_category, "Se");
    }

    #[test]
    fn out_of_range_digit_run_yields_no_category() {
        // "12" is a digit run but not a valid type label.
        let item = CatalogItem::from_entry(entry("So12x", "e.jpg"));
        assert_eq!(item.category, None);
    }

    #[test]
    fn trailing_w_without_digit_is_ignored() {
        let item = CatalogItem::from_entry(entry("Se4w", "f.jpg"));
        assert_eq!(item.category, Category::new(4));
        assert_eq!(item.wing, None);
    }

    #[test]
    fn short_folder_keeps_what_it_has() {
        let item = CatalogItem::from_entry(entry("S", "g.jpg"));
        assert_eq!(item.sub_category, "S");
        assert_eq!(item.category, None);
    }

    #[test]
    fn wings_parsed_from_valid_keys_are_adjacent() {
        for category in Category::ALL {
            for wing in category.wings() {
                let folder = format!("Sx{category}w{wing}");
                let item = CatalogItem::from_entry(entry(&folder, "x.jpg"));
                assert_eq!(item.category, Some(category));
                let parsed_wing = item.wing.unwrap();
                assert!(parsed_wing.is_wing_of(category));
            }
        }
    }

    #[test]
    fn entry_decodes_with_optional_title() {
        let entry: CatalogEntry =
            serde_json::from_str(r#"{"folder": "Se4w5", "file": "a.jpg"}"#).unwrap();
        assert_eq!(entry.title, "");
        let item = CatalogItem::from_entry(entry);
        assert_eq!(item.folder, "Se4w5");
    }
}
