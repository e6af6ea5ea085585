use drill_core::grading::SlotGrade;
use drill_core::model::{Category, Tier};

/// Visual tone of the per-slot feedback line after grading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackTone {
    /// Fully correct at the active tier.
    Positive,
    /// Some graded field correct at a non-novice tier.
    Partial,
    Negative,
}

impl FeedbackTone {
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            FeedbackTone::Positive => "quiz-feedback--positive",
            FeedbackTone::Partial => "quiz-feedback--partial",
            FeedbackTone::Negative => "quiz-feedback--negative",
        }
    }
}

/// Tone for one graded slot. Only fields the tier actually asks about count
/// toward partial credit, and the vacuous wing grade of a wingless item never
/// does.
#[must_use]
pub fn feedback_tone(grade: SlotGrade, tier: Tier, has_wing: bool) -> FeedbackTone {
    if grade.fully_correct {
        return FeedbackTone::Positive;
    }
    let mut any = grade.category_correct;
    if tier.asks_sub_category() {
        any = any || grade.sub_category_correct;
    }
    if tier.asks_wing() && has_wing {
        any = any || grade.wing_correct;
    }
    if any && tier != Tier::Novice {
        FeedbackTone::Partial
    } else {
        FeedbackTone::Negative
    }
}

/// Per-field feedback summary for one graded slot.
#[must_use]
pub fn feedback_text(grade: SlotGrade, tier: Tier, has_wing: bool) -> String {
    if tier == Tier::Novice {
        return if grade.category_correct {
            "Type correct".to_string()
        } else {
            "Type wrong".to_string()
        };
    }
    if grade.fully_correct {
        return "All correct".to_string();
    }

    let mut parts = Vec::with_capacity(3);
    parts.push(if grade.category_correct { "Type ✓" } else { "Type ✗" });
    parts.push(if grade.sub_category_correct {
        "Instinct ✓"
    } else {
        "Instinct ✗"
    });
    if tier.asks_wing() && has_wing {
        parts.push(if grade.wing_correct { "Wing ✓" } else { "Wing ✗" });
    }
    parts.join(" · ")
}

/// Wing dropdown options for a chosen type: its two ring neighbours.
/// No type chosen yet means no options (the dropdown stays hidden).
#[must_use]
pub fn wing_options(chosen: Option<Category>) -> Vec<Category> {
    chosen.map_or_else(Vec::new, |category| category.wings().to_vec())
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
