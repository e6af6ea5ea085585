use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

use drill_core::model::Category;

/// Descriptive trait text for one `"<instinct><type>"` combination.
///
/// Presentation data only; nothing validates the table against the catalog,
/// and a missing key simply renders no trait panel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TraitEntry {
    pub side: String,
    pub gaze: String,
    pub build: String,
    pub impression: String,
}

static TABLE: OnceLock<HashMap<String, TraitEntry>> = OnceLock::new();

fn table() -> &'static HashMap<String, TraitEntry> {
    TABLE.get_or_init(|| {
        serde_json::from_str(include_str!("../assets/traits.json")).unwrap_or_default()
    })
}

/// Looks up the trait text for a sub-category/category combination.
#[must_use]
pub fn trait_entry(sub_category: &str, category: Category) -> Option<&'static TraitEntry> {
    table().get(&format!("{sub_category}{category}"))
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
