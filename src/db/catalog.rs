//! Declarative read access to the monastery catalog
//!
//! Strategies describe what they want as a `CatalogQuery` and never see store
//! syntax. Each backend translates the same query: `PgCatalog` to SQL,
//! `MemoryCatalog` by evaluating `Filter::matches` directly.

use crate::{
    error::AppResult,
    models::{GeoPoint, MonasteryRecord, Region, SiteType},
};

/// Free-text columns that substring filters can search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Name,
    PatronSaint,
    Description,
    SpecialFeatures,
}

impl TextField {
    pub fn column(&self) -> &'static str {
        match self {
            TextField::Name => "name",
            TextField::PatronSaint => "patron_saint",
            TextField::Description => "description",
            TextField::SpecialFeatures => "special_features",
        }
    }

    fn value<'a>(&self, record: &'a MonasteryRecord) -> Option<&'a str> {
        match self {
            TextField::Name => Some(record.name.as_str()),
            TextField::PatronSaint => record.patron_saint.as_deref(),
            TextField::Description => record.description.as_deref(),
            TextField::SpecialFeatures => record.special_features.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Verified,
    RegionIs(Region),
    /// An empty list matches nothing
    RegionIn(Vec<Region>),
    SiteTypeIs(SiteType),
    ExcludeId(i64),
    /// Patron saint feast falls on this month and day of any year
    MonthDay { month: u32, day: u32 },
    /// Case-insensitive substring match against any of the fields
    Contains {
        fields: Vec<TextField>,
        needle: String,
    },
    DescriptionLongerThan(usize),
    /// Disjunction; an empty list matches nothing
    Any(Vec<Filter>),
}

impl Filter {
    pub fn contains(fields: &[TextField], needle: impl Into<String>) -> Self {
        Filter::Contains {
            fields: fields.to_vec(),
            needle: needle.into(),
        }
    }

    /// Reference semantics every backend must agree with
    pub fn matches(&self, record: &MonasteryRecord) -> bool {
        match self {
            Filter::Verified => record.verified,
            Filter::RegionIs(region) => record.region == Some(*region),
            Filter::RegionIn(regions) => record
                .region
                .map(|region| regions.contains(&region))
                .unwrap_or(false),
            Filter::SiteTypeIs(site_type) => record.site_type == Some(*site_type),
            Filter::ExcludeId(id) => record.id != *id,
            Filter::MonthDay { month, day } => {
                use chrono::Datelike;
                record
                    .feast_date()
                    .map(|date| date.month() == *month && date.day() == *day)
                    .unwrap_or(false)
            }
            Filter::Contains { fields, needle } => {
                let needle = needle.to_lowercase();
                fields.iter().any(|field| {
                    field
                        .value(record)
                        .map(|value| value.to_lowercase().contains(&needle))
                        .unwrap_or(false)
                })
            }
            Filter::DescriptionLongerThan(threshold) => {
                record
                    .description
                    .as_deref()
                    .map(|text| text.chars().count())
                    .unwrap_or(0)
                    > *threshold
            }
            Filter::Any(filters) => filters.iter().any(|filter| filter.matches(record)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortOrder {
    IdAsc,
    IdDesc,
    /// Nearest first; records without coordinates are left out entirely
    Distance(GeoPoint),
    /// Pseudo-random permutation of the whole match set, fixed by the seed
    Random(u64),
}

/// Filter, order and limit over the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogQuery {
    pub filters: Vec<Filter>,
    pub order: SortOrder,
    pub limit: Option<usize>,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogQuery {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            order: SortOrder::IdAsc,
            limit: None,
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn verified(self) -> Self {
        self.filter(Filter::Verified)
    }

    pub fn in_region(self, region: Region) -> Self {
        self.filter(Filter::RegionIs(region))
    }

    pub fn in_regions(self, regions: &[Region]) -> Self {
        self.filter(Filter::RegionIn(regions.to_vec()))
    }

    pub fn excluding(self, id: i64) -> Self {
        self.filter(Filter::ExcludeId(id))
    }

    pub fn filter_by_month_day(self, month: u32, day: u32) -> Self {
        self.filter(Filter::MonthDay { month, day })
    }

    pub fn matching_any(self, filters: Vec<Filter>) -> Self {
        self.filter(Filter::Any(filters))
    }

    pub fn description_longer_than(self, threshold: usize) -> Self {
        self.filter(Filter::DescriptionLongerThan(threshold))
    }

    pub fn order_by_distance(mut self, origin: GeoPoint) -> Self {
        self.order = SortOrder::Distance(origin);
        self
    }

    /// Random order applied before the limit, reproducible for a given seed
    pub fn order_randomly(mut self, seed: u64) -> Self {
        self.order = SortOrder::Random(seed);
        self
    }

    pub fn order_by_id_desc(mut self) -> Self {
        self.order = SortOrder::IdDesc;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// True when a record passes every filter and the ordering's own requirements
    pub fn accepts(&self, record: &MonasteryRecord) -> bool {
        if matches!(self.order, SortOrder::Distance(_)) && record.coordinates().is_none() {
            return false;
        }
        self.filters.iter().all(|filter| filter.matches(record))
    }
}

/// Read-only access to the monastery catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Runs a filtered, ordered, limited read
    async fn find(&self, query: &CatalogQuery) -> AppResult<Vec<MonasteryRecord>>;

    /// Looks up a single record by id
    async fn find_by_id(&self, id: i64) -> AppResult<Option<MonasteryRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StoredDate;
    use chrono::NaiveDate;

    fn record() -> MonasteryRecord {
        let mut record = MonasteryRecord::new(1, "Mănăstirea Putna");
        record.region = Some(Region::Bucovina);
        record.site_type = Some(SiteType::Monastery);
        record.patron_saint = Some("Adormirea Maicii Domnului".to_string());
        record.patron_saint_date = Some(StoredDate::Date(
            NaiveDate::from_ymd_opt(1470, 8, 15).unwrap(),
        ));
        record.description = Some("Ctitorie a lui Ștefan cel Mare".to_string());
        record
    }

    #[test]
    fn test_empty_any_matches_nothing() {
        assert!(!Filter::Any(vec![]).matches(&record()));
        assert!(!Filter::RegionIn(vec![]).matches(&record()));
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let filter = Filter::contains(&[TextField::PatronSaint], "MAICII domnului");
        assert!(filter.matches(&record()));

        let filter = Filter::contains(&[TextField::SpecialFeatures], "adormirea");
        assert!(!filter.matches(&record()));
    }

    #[test]
    fn test_month_day_ignores_year() {
        assert!(Filter::MonthDay { month: 8, day: 15 }.matches(&record()));
        assert!(!Filter::MonthDay { month: 8, day: 16 }.matches(&record()));
    }

    #[test]
    fn test_description_length_counts_characters() {
        // 30 characters, 31 bytes
        assert!(Filter::DescriptionLongerThan(29).matches(&record()));
        assert!(!Filter::DescriptionLongerThan(30).matches(&record()));
    }

    #[test]
    fn test_null_region_never_matches_region_filters() {
        let mut record = record();
        record.region = None;
        assert!(!Filter::RegionIs(Region::Bucovina).matches(&record));
        assert!(!Filter::RegionIn(vec![Region::Bucovina]).matches(&record));
    }

    #[test]
    fn test_distance_order_requires_coordinates() {
        let query = CatalogQuery::new().order_by_distance(GeoPoint::new(47.0, 25.0));
        let mut record = record();
        assert!(!query.accepts(&record));

        record.latitude = Some(47.79);
        record.longitude = Some(25.55);
        assert!(query.accepts(&record));
    }

    #[test]
    fn test_builder_collects_filters() {
        let query = CatalogQuery::new()
            .verified()
            .in_region(Region::Banat)
            .order_by_id_desc()
            .limit(5);
        assert_eq!(
            query.filters,
            vec![Filter::Verified, Filter::RegionIs(Region::Banat)]
        );
        assert_eq!(query.order, SortOrder::IdDesc);
        assert_eq!(query.limit, Some(5));
    }
}
