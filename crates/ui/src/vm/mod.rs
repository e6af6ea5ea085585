mod quiz_vm;

pub use quiz_vm::{feedback_text, feedback_tone, wing_options, FeedbackTone};
