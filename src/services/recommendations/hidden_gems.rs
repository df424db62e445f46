use super::{RecommendationEngine, Selected};
use crate::{db::CatalogQuery, error::AppResult};

impl RecommendationEngine {
    /// Verified, well-described sites in the lesser-visited regions
    pub(super) async fn hidden_gems(&self, limit: usize) -> AppResult<Vec<Selected>> {
        let query = CatalogQuery::new()
            .verified()
            .in_regions(&self.rules.hidden_gem_regions)
            .description_longer_than(self.rules.hidden_gem_min_description);
        self.shuffled(query, limit).await
    }
}
