use rand::rngs::StdRng;
use std::collections::HashSet;
use std::fmt;

use drill_core::grading::SlotGrade;
use drill_core::model::{Answer, CatalogItem, ItemId, Round, Tier, ROUND_SIZE};
use drill_core::pools::PoolSet;

use crate::error::{DrawError, QuizError};
use crate::rounds::draw::draw_round;

//
// ─── ACTIVE ROUND ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq)]
struct ActiveRound {
    round: Round,
    answers: [Answer; ROUND_SIZE],
    grades: Option<[SlotGrade; ROUND_SIZE]>,
}

impl ActiveRound {
    fn new(round: Round) -> Self {
        Self {
            round,
            answers: [Answer::empty(), Answer::empty()],
            grades: None,
        }
    }
}

//
// ─── QUIZ SESSION ──────────────────────────────────────────────────────────────
//

/// In-memory state for a running quiz.
///
/// Owns the normalized catalog, the derived pools, and the random source.
/// One round is active at a time: answers accumulate while it is pending,
/// grading freezes it, and only a graded round can be replaced by the next
/// draw. All storage traffic goes through `QuizLoopService`; the session
/// itself never touches the stores.
pub struct QuizSession {
    items: Vec<CatalogItem>,
    pools: PoolSet,
    rng: StdRng,
    tier: Tier,
    active: Option<ActiveRound>,
    rounds_played: u32,
}

impl QuizSession {
    /// Builds a session over a normalized catalog.
    ///
    /// # Errors
    ///
    /// Returns `DrawError::CatalogTooSmall` if fewer than two items are
    /// drawable (empty catalog, or nothing parsed into any band).
    pub fn new(items: Vec<CatalogItem>, tier: Tier, rng: StdRng) -> Result<Self, DrawError> {
        let pools = PoolSet::partition(&items);
        if items.len() < ROUND_SIZE || pools.len() < ROUND_SIZE {
            return Err(DrawError::CatalogTooSmall);
        }
        Ok(Self {
            items,
            pools,
            rng,
            tier,
            active: None,
            rounds_played: 0,
        })
    }

    #[must_use]
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Switches the grading tier. Takes effect for the next grading call;
    /// the original widget allows switching mid-round.
    pub fn set_tier(&mut self, tier: Tier) {
        self.tier = tier;
    }

    #[must_use]
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Number of rounds drawn so far.
    #[must_use]
    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// The currently presented round, if any.
    #[must_use]
    pub fn current_round(&self) -> Option<&Round> {
        self.active.as_ref().map(|a| &a.round)
    }

    /// The grades of the current round, once graded.
    #[must_use]
    pub fn current_grades(&self) -> Option<&[SlotGrade; ROUND_SIZE]> {
        self.active.as_ref().and_then(|a| a.grades.as_ref())
    }

    #[must_use]
    pub fn answers(&self) -> Option<&[Answer; ROUND_SIZE]> {
        self.active.as_ref().map(|a| &a.answers)
    }

    /// True once the active round has been graded.
    #[must_use]
    pub fn is_graded(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| a.grades.is_some())
    }

    /// Records one answer field update for a slot of the pending round.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoActiveRound` before the first draw and
    /// `QuizError::AlreadyGraded` once the round is frozen.
    pub fn set_answer(&mut self, slot: usize, answer: Answer) -> Result<(), QuizError> {
        let active = self.active.as_mut().ok_or(QuizError::NoActiveRound)?;
        if active.grades.is_some() {
            return Err(QuizError::AlreadyGraded);
        }
        if let Some(target) = active.answers.get_mut(slot) {
            *target = answer;
        }
        Ok(())
    }

    /// How many catalog items are not in the given seen set.
    ///
    /// Counted over the full item list, including items outside every band,
    /// mirroring the coverage-cycle bookkeeping of the original widget.
    #[must_use]
    pub fn unseen_remaining(&self, seen: &HashSet<ItemId>) -> usize {
        self.items
            .iter()
            .filter(|item| !seen.contains(&item.id))
            .count()
    }

    /// Draws the next round and installs it as the pending one, clearing
    /// answers and grades. Called by the quiz loop, which guards ordering
    /// and persists the drawn ids.
    pub(crate) fn install_next_round(
        &mut self,
        seen: &HashSet<ItemId>,
    ) -> Result<Round, DrawError> {
        let round = draw_round(&self.pools, seen, &mut self.rng)?;
        self.active = Some(ActiveRound::new(round.clone()));
        self.rounds_played = self.rounds_played.saturating_add(1);
        Ok(round)
    }

    /// The pending round and its answers, for grading.
    pub(crate) fn pending(&self) -> Result<(&Round, &[Answer; ROUND_SIZE]), QuizError> {
        let active = self.active.as_ref().ok_or(QuizError::NoActiveRound)?;
        if active.grades.is_some() {
            return Err(QuizError::AlreadyGraded);
        }
        Ok((&active.round, &active.answers))
    }

    /// True when a pending (ungraded) round blocks the next draw.
    pub(crate) fn has_pending_round(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.grades.is_none())
    }

    pub(crate) fn mark_graded(&mut self, grades: [SlotGrade; ROUND_SIZE]) {
        if let Some(active) = self.active.as_mut() {
            active.grades = Some(grades);
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("items_len", &self.items.len())
            .field("tier", &self.tier)
            .field("rounds_played", &self.rounds_played)
            .field("has_active", &self.active.is_some())
            .field("is_graded", &self.is_graded())
            .finish_non_exhaustive()
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use drill_core::model::CatalogEntry;
    use rand::SeedableRng;

    fn item(folder: &str, file: &str) -> CatalogItem {
        CatalogItem::from_entry(CatalogEntry {
            folder: folder.to_string(),
            file: file.to_string(),
            title: String::new(),
        })
    }

    fn catalog() -> Vec<CatalogItem> {
        vec![
            item("Se1", "a.jpg"),
            item("So2w1", "b.jpg"),
            item("Sx5", "c.jpg"),
            item("Se6w7", "d.jpg"),
            item("So9", "e.jpg"),
            item("Sx9w8", "f.jpg"),
        ]
    }

    fn session() -> QuizSession {
        QuizSession::new(catalog(), Tier::Proficient, StdRng::seed_from_u64(1)).unwrap()
    }

    #[test]
    fn rejects_a_catalog_too_small_for_a_round() {
        let err = QuizSession::new(
            vec![item("Se1", "a.jpg")],
            Tier::Novice,
            StdRng::seed_from_u64(1),
        )
        .unwrap_err();
        assert!(matches!(err, DrawError::CatalogTooSmall));

        // Items exist but none parse into a band.
        let err = QuizSession::new(
            vec![item("Sexx", "a.jpg"), item("Soyy", "b.jpg")],
            Tier::Novice,
            StdRng::seed_from_u64(1),
        )
        .unwrap_err();
        assert!(matches!(err, DrawError::CatalogTooSmall));
    }

    #[test]
    fn answers_require_an_active_round() {
        let mut session = session();
        let err = session.set_answer(0, Answer::empty()).unwrap_err();
        assert!(matches!(err, QuizError::NoActiveRound));
    }

    #[test]
    fn install_round_clears_answers_and_grades() {
        let mut session = session();
        session.install_next_round(&HashSet::new()).unwrap();

        session
            .set_answer(0, Answer {
                category: drill_core::model::Category::new(1),
                sub_category: Some("Se".into()),
                wing: None,
            })
            .unwrap();
        session.mark_graded(
            [SlotGrade {
                category_correct: true,
                sub_category_correct: true,
                wing_correct: true,
                fully_correct: true,
            }; 2],
        );
        assert!(session.is_graded());

        session.install_next_round(&HashSet::new()).unwrap();
        assert!(!session.is_graded());
        assert_eq!(session.answers().unwrap()[0], Answer::empty());
        assert_eq!(session.rounds_played(), 2);
    }

    #[test]
    fn graded_round_freezes_answers() {
        let mut session = session();
        session.install_next_round(&HashSet::new()).unwrap();
        session.mark_graded(
            [SlotGrade {
                category_correct: false,
                sub_category_correct: false,
                wing_correct: true,
                fully_correct: false,
            }; 2],
        );

        let err = session.set_answer(0, Answer::empty()).unwrap_err();
        assert!(matches!(err, QuizError::AlreadyGraded));
        assert!(matches!(session.pending(), Err(QuizError::AlreadyGraded)));
    }

    #[test]
    fn unseen_remaining_counts_the_full_catalog() {
        let session = session();
        let mut seen = HashSet::new();
        assert_eq!(session.unseen_remaining(&seen), 6);
        seen.insert(ItemId::from("a.jpg"));
        seen.insert(ItemId::from("e.jpg"));
        assert_eq!(session.unseen_remaining(&seen), 4);
    }

    #[test]
    fn tier_switch_takes_effect_immediately() {
        let mut session = session();
        assert_eq!(session.tier(), Tier::Proficient);
        session.set_tier(Tier::Expert);
        assert_eq!(session.tier(), Tier::Expert);
    }
}
