use super::{RecommendationEngine, Selected};
use crate::{db::CatalogQuery, error::AppResult};

impl RecommendationEngine {
    /// Verified sites, newest first. Deterministic.
    pub(super) async fn popular(&self, limit: usize) -> AppResult<Vec<Selected>> {
        self.fetch(CatalogQuery::new().verified().order_by_id_desc().limit(limit))
            .await
    }
}
