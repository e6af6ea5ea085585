mod draw;
mod service;
mod session;

pub use draw::draw_round;
pub use service::{GradedRound, QuizLoopService};
pub use session::QuizSession;
