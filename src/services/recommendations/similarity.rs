use super::{RecommendationEngine, Selected};
use crate::{
    db::{CatalogQuery, Filter, TextField},
    error::AppResult,
};

impl RecommendationEngine {
    /// Sites sharing region, type or patron saint with the reference site
    ///
    /// A missing or unknown reference falls back to random sites.
    pub(super) async fn similar(
        &self,
        reference_id: Option<i64>,
        limit: usize,
    ) -> AppResult<Vec<Selected>> {
        let Some(reference_id) = reference_id else {
            return self.random_selection(limit).await;
        };
        let Some(reference) = self.catalog.find_by_id(reference_id).await? else {
            tracing::info!(reference_id, "Reference site not found, using random selection");
            return self.random_selection(limit).await;
        };

        let mut traits = Vec::new();
        if let Some(region) = reference.region {
            traits.push(Filter::RegionIs(region));
        }
        if let Some(site_type) = reference.site_type {
            traits.push(Filter::SiteTypeIs(site_type));
        }
        if let Some(patron) = reference
            .patron_saint
            .as_deref()
            .and_then(|patron| self.matcher.normalize(patron))
        {
            traits.push(Filter::contains(&[TextField::PatronSaint], patron));
        }

        let query = CatalogQuery::new()
            .excluding(reference.id)
            .matching_any(traits);
        self.shuffled(query, limit).await
    }
}
