use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::sync::Arc;

use drill_core::grading::{grade_round, SlotGrade};
use drill_core::model::{CatalogItem, Round, Tier, ROUND_SIZE};
use drill_core::stats::StatsBook;
use drill_core::Clock;
use storage::repository::{SeenStore, StatsStore};

use crate::error::QuizError;
use crate::rounds::session::QuizSession;

/// Result of grading the current round.
#[derive(Debug, Clone, PartialEq)]
pub struct GradedRound {
    pub grades: [SlotGrade; ROUND_SIZE],
    pub tier: Tier,
    pub graded_at: DateTime<Utc>,
    /// The freshly persisted aggregate, for immediate display.
    pub stats: StatsBook,
}

/// Orchestrates round draws and grading against the persistent stores.
///
/// Stateless apart from its collaborators; the mutable quiz state lives in
/// `QuizSession`, owned by the caller. Store writes for a round happen
/// strictly after grading and strictly before the next draw, so the two
/// persisted records never see a half-finished round.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    seen: Arc<dyn SeenStore>,
    stats: Arc<dyn StatsStore>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, seen: Arc<dyn SeenStore>, stats: Arc<dyn StatsStore>) -> Self {
        Self { clock, seen, stats }
    }

    /// Builds a session over a normalized catalog with an OS-seeded RNG.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Draw` if the catalog cannot support a round.
    pub fn start(&self, items: Vec<CatalogItem>, tier: Tier) -> Result<QuizSession, QuizError> {
        Ok(QuizSession::new(items, tier, StdRng::from_os_rng())?)
    }

    /// Builds a session with a fixed seed, for deterministic draws.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Draw` if the catalog cannot support a round.
    pub fn start_seeded(
        &self,
        items: Vec<CatalogItem>,
        tier: Tier,
        seed: u64,
    ) -> Result<QuizSession, QuizError> {
        Ok(QuizSession::new(items, tier, StdRng::seed_from_u64(seed))?)
    }

    /// Draws the next round: loads the seen set, rolls the coverage cycle
    /// over when fewer than two items remain unseen, draws, and persists
    /// both drawn ids.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::RoundNotGraded` while a pending round awaits
    /// grading, and propagates draw or storage failures.
    pub async fn next_round(&self, session: &mut QuizSession) -> Result<Round, QuizError> {
        if session.has_pending_round() {
            return Err(QuizError::RoundNotGraded);
        }

        let mut seen = self.seen.load_seen().await?;
        if session.unseen_remaining(&seen) < ROUND_SIZE {
            tracing::debug!(
                rounds_played = session.rounds_played(),
                "coverage cycle complete, resetting seen set"
            );
            self.seen.reset_seen().await?;
            seen = HashSet::new();
        }

        let round = session.install_next_round(&seen)?;
        self.seen.save_seen(&round.ids()).await?;
        Ok(round)
    }

    /// Grades the pending round at the session's tier and persists the
    /// updated statistics before returning.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoActiveRound` before the first draw,
    /// `QuizError::AlreadyGraded` on re-submission, and propagates storage
    /// failures.
    pub async fn grade_current(&self, session: &mut QuizSession) -> Result<GradedRound, QuizError> {
        let tier = session.tier();
        let grades = {
            let (round, answers) = session.pending()?;
            grade_round(round, answers, tier)
        };

        let book = self.stats.load_stats().await?;
        let round = session
            .current_round()
            .ok_or(QuizError::NoActiveRound)?;
        let updated = book.record(round, &grades, tier);
        self.stats.save_stats(&updated).await?;

        session.mark_graded(grades);

        Ok(GradedRound {
            grades,
            tier,
            graded_at: self.clock.now(),
            stats: updated,
        })
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
