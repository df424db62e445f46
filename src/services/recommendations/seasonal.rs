use super::{RecommendationEngine, Selected};
use crate::{
    db::{CatalogQuery, Filter, TextField},
    error::AppResult,
};

/// Meteorological seasons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    /// Season of a month number, `None` outside 1..=12
    fn from_month(month: i64) -> Option<Self> {
        match month {
            12 | 1 | 2 => Some(Season::Winter),
            3..=5 => Some(Season::Spring),
            6..=8 => Some(Season::Summer),
            9..=11 => Some(Season::Autumn),
            _ => None,
        }
    }
}

impl RecommendationEngine {
    pub(super) async fn seasonal(&self, month: i64, limit: usize) -> AppResult<Vec<Selected>> {
        let Some(season) = Season::from_month(month) else {
            tracing::debug!(month, "Month out of range, using random selection");
            return self.random_selection(limit).await;
        };

        let rules = &self.rules;
        let query = match season {
            Season::Winter => CatalogQuery::new().in_regions(&rules.winter_regions),
            Season::Spring => {
                CatalogQuery::new().matching_any(keyword_filters(&rules.spring_keywords))
            }
            Season::Summer => {
                CatalogQuery::new().matching_any(keyword_filters(&rules.summer_keywords))
            }
            Season::Autumn => CatalogQuery::new().in_regions(&rules.autumn_regions),
        };

        self.shuffled(query, limit).await
    }
}

fn keyword_filters(keywords: &[String]) -> Vec<Filter> {
    keywords
        .iter()
        .map(|keyword| {
            Filter::contains(
                &[TextField::SpecialFeatures, TextField::Description],
                keyword.clone(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_buckets() {
        assert_eq!(Season::from_month(12), Some(Season::Winter));
        assert_eq!(Season::from_month(1), Some(Season::Winter));
        assert_eq!(Season::from_month(2), Some(Season::Winter));
        assert_eq!(Season::from_month(3), Some(Season::Spring));
        assert_eq!(Season::from_month(5), Some(Season::Spring));
        assert_eq!(Season::from_month(6), Some(Season::Summer));
        assert_eq!(Season::from_month(8), Some(Season::Summer));
        assert_eq!(Season::from_month(9), Some(Season::Autumn));
        assert_eq!(Season::from_month(11), Some(Season::Autumn));
    }

    #[test]
    fn test_out_of_range_months() {
        assert_eq!(Season::from_month(0), None);
        assert_eq!(Season::from_month(13), None);
        assert_eq!(Season::from_month(-4), None);
    }

    #[test]
    fn test_keyword_filters_search_features_and_description() {
        let filters = keyword_filters(&["park".to_string()]);
        assert_eq!(
            filters,
            vec![Filter::contains(
                &[TextField::SpecialFeatures, TextField::Description],
                "park"
            )]
        );
    }
}
