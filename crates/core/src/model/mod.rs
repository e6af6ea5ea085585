mod answer;
mod category;
mod ids;
mod item;
mod round;

pub use answer::{Answer, Tier};
pub use category::{Category, CategoryError, SUB_CATEGORIES};
pub use ids::ItemId;
pub use item::{CatalogEntry, CatalogItem};
pub use round::{Round, RoundError, ROUND_SIZE};
