use crate::model::{Answer, CatalogItem, Round, Tier, ROUND_SIZE};

//
// ─── SLOT GRADE ────────────────────────────────────────────────────────────────
//

/// Per-field and overall correctness for one answered slot.
///
/// `wing_correct` is vacuously true when the item carries no wing; the
/// statistics aggregator only counts a wing attempt when one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotGrade {
    pub category_correct: bool,
    pub sub_category_correct: bool,
    pub wing_correct: bool,
    pub fully_correct: bool,
}

//
// ─── GRADING ───────────────────────────────────────────────────────────────────
//

/// Grades a single slot against its ground-truth item.
///
/// Pure function of its inputs. Field rules:
/// - category: answer present and equal
/// - sub-category: string equality (an omitted answer matches nothing)
/// - wing: vacuously correct when the item has no wing, else present and equal
///
/// `fully_correct` requires progressively more fields as the tier rises, so
/// an answer that is fully correct under `Expert` is also fully correct under
/// the two tiers below it.
#[must_use]
pub fn grade_slot(item: &CatalogItem, answer: &Answer, tier: Tier) -> SlotGrade {
    let category_correct = match (answer.category, item.category) {
        (Some(given), Some(truth)) => given == truth,
        _ => false,
    };
    let sub_category_correct = answer.sub_category.as_deref() == Some(item.sub_category.as_str());
    let wing_correct = match item.wing {
        None => true,
        Some(truth) => answer.wing == Some(truth),
    };

    let fully_correct = match tier {
        Tier::Novice => category_correct,
        Tier::Proficient => category_correct && sub_category_correct,
        Tier::Expert => category_correct && sub_category_correct && wing_correct,
    };

    SlotGrade {
        category_correct,
        sub_category_correct,
        wing_correct,
        fully_correct,
    }
}

/// Grades both slots of a round in draw order.
#[must_use]
pub fn grade_round(
    round: &Round,
    answers: &[Answer; ROUND_SIZE],
    tier: Tier,
) -> [SlotGrade; ROUND_SIZE] {
    let slots = round.slots();
    [
        grade_slot(&slots[0], &answers[0], tier),
        grade_slot(&slots[1], &answers[1], tier),
    ]
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CatalogEntry, CatalogItem, Category};

    fn item(folder: &str, file: &str) -> CatalogItem {
        CatalogItem::from_entry(CatalogEntry {
            folder: folder.to_string(),
            file: file.to_string(),
            title: String::new(),
        })
    }

    fn answer(category: Option<u8>, sub: Option<&str>, wing: Option<u8>) -> Answer {
        Answer {
            category: category.and_then(Category::new),
            sub_category: sub.map(str::to_string),
            wing: wing.and_then(Category::new),
        }
    }

    #[test]
    fn full_answer_is_fully_correct_under_expert() {
        let g = item("Se4w5", "a.jpg");
        let grade = grade_slot(&g, &answer(Some(4), Some("Se"), Some(5)), Tier::Expert);
        assert!(grade.category_correct);
        assert!(grade.sub_category_correct);
        assert!(grade.wing_correct);
        assert!(grade.fully_correct);
    }

    #[test]
    fn omitted_wing_fails_expert_but_passes_proficient() {
        let g = item("Se4w5", "a.jpg");
        let partial = answer(Some(4), Some("Se"), None);

        let expert = grade_slot(&g, &partial, Tier::Expert);
        assert!(!expert.wing_correct);
        assert!(!expert.fully_correct);

        let proficient = grade_slot(&g, &partial, Tier::Proficient);
        assert!(proficient.fully_correct);
    }

    #[test]
    fn wing_is_vacuous_when_item_has_none() {
        let g = item("So9", "b.jpg");
        let grade = grade_slot(&g, &answer(Some(9), Some("So"), None), Tier::Expert);
        assert!(grade.wing_correct);
        assert!(grade.fully_correct);
    }

    #[test]
    fn omitted_fields_match_nothing() {
        let g = item("Se4w5", "a.jpg");
        let grade = grade_slot(&g, &Answer::empty(), Tier::Novice);
        assert!(!grade.category_correct);
        assert!(!grade.sub_category_correct);
        assert!(!grade.fully_correct);
    }

    #[test]
    fn category_never_matches_an_unparsed_item() {
        // An item whose folder yielded no category cannot be answered correctly.
        let g = item("Sexx", "d.jpg");
        let grade = grade_slot(&g, &answer(Some(4), Some("Se"), None), Tier::Novice);
        assert!(!grade.category_correct);
        assert!(!grade.fully_correct);
    }

    #[test]
    fn full_correctness_is_monotonic_across_tiers() {
        let g = item("Se4w5", "a.jpg");
        let full = answer(Some(4), Some("Se"), Some(5));
        assert!(grade_slot(&g, &full, Tier::Expert).fully_correct);
        assert!(grade_slot(&g, &full, Tier::Proficient).fully_correct);
        assert!(grade_slot(&g, &full, Tier::Novice).fully_correct);
    }

    #[test]
    fn grade_round_grades_slots_in_draw_order() {
        let round = Round::new(item("Se4w5", "a.jpg"), item("So9", "b.jpg")).unwrap();
        let answers = [answer(Some(4), Some("Se"), Some(5)), answer(Some(1), None, None)];
        let grades = grade_round(&round, &answers, Tier::Novice);
        assert!(grades[0].fully_correct);
        assert!(!grades[1].fully_correct);
    }
}
