use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::{path::Path, sync::Arc};

use crate::{
    db::catalog::{CatalogQuery, CatalogRepository, SortOrder},
    error::{AppError, AppResult},
    models::MonasteryRecord,
};

/// Catalog repository over an in-process record list
///
/// Serves the offline fixture mode and the test suites. Queries are evaluated
/// with the same filter semantics the SQL backend implements.
#[derive(Clone, Debug, Default)]
pub struct MemoryCatalog {
    records: Arc<Vec<MonasteryRecord>>,
}

impl MemoryCatalog {
    pub fn new(records: Vec<MonasteryRecord>) -> Self {
        Self {
            records: Arc::new(records),
        }
    }

    /// Loads a JSON array of records
    pub async fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::Config(format!("Cannot read catalog fixture {}: {}", path.display(), e))
        })?;
        let records: Vec<MonasteryRecord> = serde_json::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Invalid catalog fixture {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            records = records.len(),
            "Loaded catalog fixture"
        );

        Ok(Self::new(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait::async_trait]
impl CatalogRepository for MemoryCatalog {
    async fn find(&self, query: &CatalogQuery) -> AppResult<Vec<MonasteryRecord>> {
        let mut matched: Vec<&MonasteryRecord> = self
            .records
            .iter()
            .filter(|record| query.accepts(record))
            .collect();

        match query.order {
            SortOrder::IdAsc => matched.sort_by_key(|record| record.id),
            SortOrder::IdDesc => matched.sort_by_key(|record| std::cmp::Reverse(record.id)),
            SortOrder::Distance(origin) => {
                let distance = |record: &MonasteryRecord| {
                    record
                        .coordinates()
                        .map(|point| origin.distance_km(&point))
                        .unwrap_or(f64::INFINITY)
                };
                matched.sort_by(|a, b| {
                    distance(*a)
                        .total_cmp(&distance(*b))
                        .then(a.id.cmp(&b.id))
                });
            }
            SortOrder::Random(seed) => {
                // Start from id order so the permutation depends on the seed only
                matched.sort_by_key(|record| record.id);
                matched.shuffle(&mut StdRng::seed_from_u64(seed));
            }
        }

        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }

        Ok(matched.into_iter().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<MonasteryRecord>> {
        Ok(self.records.iter().find(|record| record.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeoPoint, Region};

    fn catalog() -> MemoryCatalog {
        let mut near = MonasteryRecord::new(1, "Near");
        near.latitude = Some(45.01);
        near.longitude = Some(25.01);
        near.region = Some(Region::Muntenia);

        let mut far = MonasteryRecord::new(2, "Far");
        far.latitude = Some(47.0);
        far.longitude = Some(26.0);
        far.region = Some(Region::Moldova);

        let nowhere = MonasteryRecord::new(3, "Nowhere");

        MemoryCatalog::new(vec![far, nowhere, near])
    }

    #[tokio::test]
    async fn test_find_orders_by_distance_and_skips_unlocated() {
        let query = CatalogQuery::new().order_by_distance(GeoPoint::new(45.0, 25.0));
        let ids: Vec<i64> = catalog()
            .find(&query)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_find_applies_order_and_limit() {
        let query = CatalogQuery::new().order_by_id_desc().limit(2);
        let ids: Vec<i64> = catalog()
            .find(&query)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let catalog = catalog();
        let found = tokio_test::assert_ok!(catalog.find_by_id(2).await);
        assert_eq!(found.unwrap().name, "Far");
        assert!(tokio_test::assert_ok!(catalog.find_by_id(99).await).is_none());
    }

    #[test]
    fn test_region_filter_is_exact() {
        let query = CatalogQuery::new().in_region(Region::Moldova);
        let found = tokio_test::block_on(catalog().find(&query)).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 2);
    }

    fn region_catalog(size: i64) -> MemoryCatalog {
        MemoryCatalog::new(
            (1..=size)
                .map(|id| {
                    let mut record = MonasteryRecord::new(id, format!("Schit {}", id));
                    record.region = Some(Region::Banat);
                    record
                })
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_random_order_is_a_seeded_permutation() {
        let catalog = region_catalog(50);
        let ids = |records: Vec<MonasteryRecord>| -> Vec<i64> {
            records.iter().map(|r| r.id).collect()
        };

        let first = ids(catalog.find(&CatalogQuery::new().order_randomly(9)).await.unwrap());
        let again = ids(catalog.find(&CatalogQuery::new().order_randomly(9)).await.unwrap());
        let other = ids(catalog.find(&CatalogQuery::new().order_randomly(10)).await.unwrap());

        assert_eq!(first, again);
        assert_ne!(first, other);
        assert_ne!(first, (1..=50).collect::<Vec<_>>());

        let mut sorted = first.clone();
        sorted.sort();
        assert_eq!(sorted, (1..=50).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_random_order_reaches_past_the_first_rows() {
        let catalog = region_catalog(800);
        let mut seen = std::collections::BTreeSet::new();
        for seed in 0..20 {
            let query = CatalogQuery::new().order_randomly(seed).limit(10);
            let found = catalog.find(&query).await.unwrap();
            assert_eq!(found.len(), 10);
            seen.extend(found.into_iter().map(|record| record.id));
        }

        assert!(seen.iter().any(|id| *id > 500));
        assert!(seen.len() > 120);
    }

    #[tokio::test]
    async fn test_from_json_file_reports_missing_file() {
        let result = MemoryCatalog::from_json_file("/nonexistent/catalog.json").await;
        let err = tokio_test::assert_err!(result);
        assert!(matches!(err, AppError::Config(_)));
    }
}
