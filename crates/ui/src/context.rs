use std::sync::Arc;

use drill_core::model::Tier;
use services::{CatalogService, QuizLoopService, StatsOverviewService};
use url::Url;

/// Composition-root-facing surface the ui needs from the application.
pub trait UiApp: Send + Sync {
    fn catalog(&self) -> CatalogService;
    fn quiz_loop(&self) -> Arc<QuizLoopService>;
    fn stats_overview(&self) -> Arc<StatsOverviewService>;
    fn image_base(&self) -> Url;
    fn default_tier(&self) -> Tier;
    /// Fixed RNG seed for deterministic draws; `None` in normal use.
    fn rng_seed(&self) -> Option<u64>;
}

#[derive(Clone)]
pub struct AppContext {
    catalog: CatalogService,
    quiz_loop: Arc<QuizLoopService>,
    stats_overview: Arc<StatsOverviewService>,
    image_base: Url,
    default_tier: Tier,
    rng_seed: Option<u64>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            catalog: app.catalog(),
            quiz_loop: app.quiz_loop(),
            stats_overview: app.stats_overview(),
            image_base: app.image_base(),
            default_tier: app.default_tier(),
            rng_seed: app.rng_seed(),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> CatalogService {
        self.catalog.clone()
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn stats_overview(&self) -> Arc<StatsOverviewService> {
        Arc::clone(&self.stats_overview)
    }

    #[must_use]
    pub fn image_base(&self) -> Url {
        self.image_base.clone()
    }

    #[must_use]
    pub fn default_tier(&self) -> Tier {
        self.default_tier
    }

    #[must_use]
    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }
}

/// Build an `AppContext` from a ui-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
