#![forbid(unsafe_code)]

pub mod grading;
pub mod images;
pub mod model;
pub mod pools;
pub mod stats;
pub mod time;

pub use model::{
    Answer, CatalogEntry, CatalogItem, Category, CategoryError, ItemId, Round, RoundError, Tier,
    ROUND_SIZE, SUB_CATEGORIES,
};
pub use time::Clock;
