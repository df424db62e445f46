use chrono::{Datelike, NaiveDate};

use super::{RecommendationEngine, Selected};
use crate::{
    db::{CatalogQuery, Filter, TextField},
    error::AppResult,
    models::FeastDescriptor,
};

impl RecommendationEngine {
    /// Sites whose patron saint feast falls on `date` (any year)
    ///
    /// Without a date, sites dedicated to one of the major feasts.
    pub(super) async fn by_feast(
        &self,
        date: Option<NaiveDate>,
        limit: usize,
    ) -> AppResult<Vec<Selected>> {
        let Some(date) = date else {
            let major: Vec<Filter> = self
                .rules
                .major_feasts
                .iter()
                .filter_map(|name| self.matcher.normalize(name))
                .map(|needle| Filter::contains(&[TextField::PatronSaint], needle))
                .collect();
            return self
                .fetch(CatalogQuery::new().matching_any(major).limit(limit))
                .await;
        };

        let query = CatalogQuery::new()
            .filter_by_month_day(date.month(), date.day())
            .limit(limit);
        let mut selected = self.fetch(query).await?;

        if let Some(feast) = self.feast_on(date).await {
            for item in &mut selected {
                item.feast = Some(feast.clone());
            }
        }

        Ok(selected)
    }

    /// Sites dedicated to a saint commemorated in the window starting at `from`
    pub(super) async fn upcoming_feasts(
        &self,
        from: NaiveDate,
        limit: usize,
    ) -> AppResult<Vec<Selected>> {
        let feasts = self
            .calendar
            .upcoming_feasts(from, self.calendar_window_days)
            .await?;
        let candidates = self.matcher.candidates(&feasts);

        tracing::debug!(
            feasts = feasts.len(),
            candidates = candidates.len(),
            "Resolved upcoming saint feasts"
        );

        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let query = CatalogQuery::new()
            .filter(self.matcher.filter(&candidates))
            .limit(limit);
        let mut selected = self.fetch(query).await?;

        for item in &mut selected {
            item.feast = self.matcher.best_match(&item.record, &candidates).cloned();
        }

        Ok(selected)
    }

    /// Calendar feast on the same month and day, saints preferred
    ///
    /// Only decorates results, so a calendar failure is logged and ignored.
    async fn feast_on(&self, date: NaiveDate) -> Option<FeastDescriptor> {
        let feasts = match self.calendar.feasts_in_month(date.month()).await {
            Ok(feasts) => feasts,
            Err(e) => {
                tracing::warn!(error = %e, "Calendar lookup failed, omitting feast details");
                return None;
            }
        };

        let mut same_day: Vec<FeastDescriptor> = feasts
            .into_iter()
            .filter(|feast| feast.date.day() == date.day())
            .collect();
        same_day.sort_by_key(|feast| !feast.is_saint());
        same_day.into_iter().next()
    }
}
