mod quiz;
mod state;
mod stats;

pub use quiz::QuizView;
pub use state::{view_state_from_resource, ViewError, ViewState};
pub use stats::StatsView;
