use super::{RecommendationEngine, Selected};
use crate::{db::CatalogQuery, error::AppResult, models::GeoPoint};

impl RecommendationEngine {
    /// Located sites nearest to `origin`; random sites when there is no origin
    pub(super) async fn nearby(
        &self,
        origin: Option<GeoPoint>,
        limit: usize,
    ) -> AppResult<Vec<Selected>> {
        let Some(origin) = origin else {
            return self.random_selection(limit).await;
        };

        let mut selected = self
            .fetch(CatalogQuery::new().order_by_distance(origin).limit(limit))
            .await?;
        for item in &mut selected {
            item.distance_km = item
                .record
                .coordinates()
                .map(|point| origin.distance_km(&point));
        }

        Ok(selected)
    }
}
