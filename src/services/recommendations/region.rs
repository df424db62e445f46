use super::{RecommendationEngine, Selected};
use crate::{db::CatalogQuery, error::AppResult, models::Region};

impl RecommendationEngine {
    /// Random sites from `region`, or from anywhere when no region is given
    pub(super) async fn by_region(
        &self,
        region: Option<Region>,
        limit: usize,
    ) -> AppResult<Vec<Selected>> {
        match region {
            Some(region) => self.shuffled(CatalogQuery::new().in_region(region), limit).await,
            None => self.random_selection(limit).await,
        }
    }
}
