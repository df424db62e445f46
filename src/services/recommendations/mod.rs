//! Monastery recommendation engine
//!
//! `RecommendationEngine::recommend` maps a typed strategy onto one of the
//! selectors in the submodules, formats what the selector picked, and turns
//! any upstream failure into a single generic error.

use std::sync::Arc;

use crate::{
    db::{CatalogQuery, CatalogRepository},
    error::{AppError, AppResult},
    models::{
        FeastDescriptor, MonasteryRecord, RecommendationItem, RecommendationRequest,
        RecommendationResponse, Strategy,
    },
    services::calendar::CalendarProvider,
};

mod feast;
mod formatter;
mod hidden_gems;
mod matcher;
mod popularity;
mod proximity;
mod region;
mod rules;
mod seasonal;
mod shuffle;
mod similarity;

pub use formatter::format_record;
pub use rules::CurationRules;
pub use shuffle::Shuffler;

use matcher::SaintNameMatcher;

const DEFAULT_CALENDAR_WINDOW_DAYS: u32 = 30;

/// A record chosen by a selector, before formatting
#[derive(Debug, Clone)]
struct Selected {
    record: MonasteryRecord,
    feast: Option<FeastDescriptor>,
    distance_km: Option<f64>,
}

impl Selected {
    fn plain(record: MonasteryRecord) -> Self {
        Self {
            record,
            feast: None,
            distance_km: None,
        }
    }

    fn into_item(self) -> RecommendationItem {
        RecommendationItem {
            monastery: format_record(self.record),
            feast: self.feast,
            distance_km: self.distance_km,
        }
    }
}

pub struct RecommendationEngine {
    catalog: Arc<dyn CatalogRepository>,
    calendar: Arc<dyn CalendarProvider>,
    rules: CurationRules,
    matcher: SaintNameMatcher,
    shuffler: Shuffler,
    calendar_window_days: u32,
}

impl RecommendationEngine {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        calendar: Arc<dyn CalendarProvider>,
        rules: CurationRules,
    ) -> Self {
        let matcher = SaintNameMatcher::new(&rules.honorifics);
        Self {
            catalog,
            calendar,
            rules,
            matcher,
            shuffler: Shuffler::from_entropy(),
            calendar_window_days: DEFAULT_CALENDAR_WINDOW_DAYS,
        }
    }

    pub fn with_shuffler(mut self, shuffler: Shuffler) -> Self {
        self.shuffler = shuffler;
        self
    }

    pub fn with_calendar_window(mut self, days: u32) -> Self {
        self.calendar_window_days = days;
        self
    }

    /// Runs the requested strategy and returns at most `limit` formatted records
    pub async fn recommend(
        &self,
        request: RecommendationRequest,
    ) -> AppResult<RecommendationResponse> {
        let kind = request.strategy.kind();
        let limit = request.limit;

        let selected = match request.strategy {
            Strategy::ByFeast { date } => self.by_feast(date, limit).await,
            Strategy::ByRegion { region } => self.by_region(region, limit).await,
            Strategy::Nearby { origin } => self.nearby(origin, limit).await,
            Strategy::Similar { reference_id } => self.similar(reference_id, limit).await,
            Strategy::Popular => self.popular(limit).await,
            Strategy::HiddenGems => self.hidden_gems(limit).await,
            Strategy::UpcomingFeasts { from } => self.upcoming_feasts(from, limit).await,
            Strategy::Seasonal { month } => self.seasonal(month, limit).await,
        };

        let selected = selected.map_err(|e| {
            tracing::error!(strategy = %kind, error = %e, "Recommendation strategy failed");
            AppError::RecommendationFailed
        })?;

        let recommendations: Vec<RecommendationItem> = selected
            .into_iter()
            .take(limit)
            .map(Selected::into_item)
            .collect();

        tracing::info!(
            strategy = %kind,
            limit,
            count = recommendations.len(),
            "Recommendations selected"
        );

        Ok(RecommendationResponse {
            strategy: kind,
            recommendations,
        })
    }

    /// `limit` records drawn uniformly from everything `query` matches
    ///
    /// The store applies the random order before the limit, so every matching
    /// record can be drawn no matter how large the catalog is.
    async fn shuffled(&self, query: CatalogQuery, limit: usize) -> AppResult<Vec<Selected>> {
        let seed = self.shuffler.next_seed();
        tracing::debug!(seed, limit, "Drawing random sample");

        self.fetch(query.order_randomly(seed).limit(limit)).await
    }

    /// Fallback used whenever a strategy lacks the parameters it needs
    async fn random_selection(&self, limit: usize) -> AppResult<Vec<Selected>> {
        self.shuffled(CatalogQuery::new(), limit).await
    }

    async fn fetch(&self, query: CatalogQuery) -> AppResult<Vec<Selected>> {
        let records = self.catalog.find(&query).await?;
        Ok(records.into_iter().map(Selected::plain).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{catalog::MockCatalogRepository, Filter, SortOrder},
        models::{Region, StrategyKind},
        services::calendar::{MockCalendarProvider, StaticCalendar},
    };
    use chrono::NaiveDate;

    fn engine_with(
        catalog: MockCatalogRepository,
        calendar: Arc<dyn CalendarProvider>,
    ) -> RecommendationEngine {
        RecommendationEngine::new(Arc::new(catalog), calendar, CurationRules::default())
            .with_shuffler(Shuffler::seeded(3))
    }

    fn records(n: i64) -> Vec<MonasteryRecord> {
        (1..=n)
            .map(|id| MonasteryRecord::new(id, format!("Mănăstirea {}", id)))
            .collect()
    }

    #[tokio::test]
    async fn test_store_failure_becomes_generic_error() {
        let mut catalog = MockCatalogRepository::new();
        catalog
            .expect_find()
            .returning(|_| Err(AppError::Database(sqlx::Error::PoolTimedOut)));

        let engine = engine_with(catalog, Arc::new(StaticCalendar::default()));
        let result = engine
            .recommend(RecommendationRequest::new(Strategy::Popular, 10))
            .await;

        assert!(matches!(result, Err(AppError::RecommendationFailed)));
    }

    #[tokio::test]
    async fn test_calendar_failure_becomes_generic_error() {
        let mut calendar = MockCalendarProvider::new();
        calendar
            .expect_upcoming_feasts()
            .returning(|_, _| Err(AppError::Calendar("provider offline".to_string())));

        let engine = engine_with(MockCatalogRepository::new(), Arc::new(calendar));
        let from = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        let result = engine
            .recommend(RecommendationRequest::new(Strategy::UpcomingFeasts { from }, 10))
            .await;

        assert!(matches!(result, Err(AppError::RecommendationFailed)));
    }

    #[tokio::test]
    async fn test_popular_query_shape() {
        let mut catalog = MockCatalogRepository::new();
        catalog
            .expect_find()
            .withf(|query| *query == CatalogQuery::new().verified().order_by_id_desc().limit(4))
            .times(1)
            .returning(|_| Ok(records(4)));

        let engine = engine_with(catalog, Arc::new(StaticCalendar::default()));
        let response = engine
            .recommend(RecommendationRequest::new(Strategy::Popular, 4))
            .await
            .unwrap();

        assert_eq!(response.strategy, StrategyKind::Popular);
        assert_eq!(response.recommendations.len(), 4);
    }

    #[tokio::test]
    async fn test_random_strategy_orders_randomly_before_limit() {
        let mut catalog = MockCatalogRepository::new();
        catalog
            .expect_find()
            .withf(|query| {
                matches!(query.order, SortOrder::Random(_))
                    && query.limit == Some(5)
                    && query.filters == vec![Filter::RegionIs(Region::Oltenia)]
            })
            .times(1)
            .returning(|_| Ok(records(5)));

        let engine = engine_with(catalog, Arc::new(StaticCalendar::default()));
        let response = engine
            .recommend(RecommendationRequest::new(
                Strategy::ByRegion {
                    region: Some(Region::Oltenia),
                },
                5,
            ))
            .await
            .unwrap();

        assert_eq!(response.recommendations.len(), 5);
    }

    #[tokio::test]
    async fn test_result_never_exceeds_limit() {
        let mut catalog = MockCatalogRepository::new();
        // A misbehaving store that ignores LIMIT
        catalog.expect_find().returning(|_| Ok(records(30)));

        let engine = engine_with(catalog, Arc::new(StaticCalendar::default()));
        let response = engine
            .recommend(RecommendationRequest::new(Strategy::Popular, 3))
            .await
            .unwrap();

        assert_eq!(response.recommendations.len(), 3);
    }
}
