use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, QueryBuilder};

use crate::{
    db::catalog::{CatalogQuery, CatalogRepository, Filter, SortOrder},
    error::AppResult,
    models::{GeoPoint, MonasteryRecord, StoredDate, EARTH_RADIUS_KM},
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

const COLUMNS: &str = "id, name, slug, description, short_description, address, city, county, \
    region, patron_saint, patron_saint_date, founded_year, history, special_features, relics, \
    icons, type, images, cover_image, email, phone, website, latitude, longitude, verified, \
    admin_id, created_at, updated_at";

/// Row shape of the `monasteries` table
#[derive(Debug, sqlx::FromRow)]
struct MonasteryRow {
    id: i64,
    name: String,
    slug: String,
    description: Option<String>,
    short_description: Option<String>,
    address: Option<String>,
    city: Option<String>,
    county: Option<String>,
    region: Option<String>,
    patron_saint: Option<String>,
    patron_saint_date: Option<NaiveDate>,
    founded_year: Option<i32>,
    history: Option<String>,
    special_features: Option<String>,
    relics: Option<Vec<String>>,
    icons: Option<Vec<String>>,
    #[sqlx(rename = "type")]
    site_type: Option<String>,
    images: Option<Vec<String>>,
    cover_image: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    website: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    verified: bool,
    admin_id: Option<i64>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<MonasteryRow> for MonasteryRecord {
    fn from(row: MonasteryRow) -> Self {
        // Unknown enum values are a write-path bug; keep serving the row without them
        let region = row.region.as_deref().and_then(|code| {
            code.parse()
                .map_err(|e: String| {
                    tracing::warn!(id = row.id, error = %e, "Ignoring stored region")
                })
                .ok()
        });
        let site_type = row.site_type.as_deref().and_then(|code| {
            code.parse()
                .map_err(|e: String| {
                    tracing::warn!(id = row.id, error = %e, "Ignoring stored site type")
                })
                .ok()
        });

        MonasteryRecord {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            short_description: row.short_description,
            address: row.address,
            city: row.city,
            county: row.county,
            region,
            patron_saint: row.patron_saint,
            patron_saint_date: row.patron_saint_date.map(StoredDate::Date),
            founded_year: row.founded_year,
            history: row.history,
            special_features: row.special_features,
            relics: row.relics,
            icons: row.icons,
            site_type,
            images: row.images,
            cover_image: row.cover_image,
            email: row.email,
            phone: row.phone,
            website: row.website,
            latitude: row.latitude,
            longitude: row.longitude,
            verified: row.verified,
            admin_id: row.admin_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Catalog repository backed by the `monasteries` table
#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CatalogRepository for PgCatalog {
    async fn find(&self, query: &CatalogQuery) -> AppResult<Vec<MonasteryRecord>> {
        let mut builder = build_select(query);
        let rows: Vec<MonasteryRow> = builder.build_query_as().fetch_all(&self.pool).await?;

        tracing::debug!(rows = rows.len(), "Catalog query completed");

        Ok(rows.into_iter().map(MonasteryRecord::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<MonasteryRecord>> {
        let sql = format!("SELECT {} FROM monasteries WHERE id = ", COLUMNS);
        let mut builder = QueryBuilder::<Postgres>::new(sql);
        builder.push_bind(id);

        let row: Option<MonasteryRow> = builder.build_query_as().fetch_optional(&self.pool).await?;

        Ok(row.map(MonasteryRecord::from))
    }
}

/// Translates a catalog query into a parameterized SELECT
fn build_select(query: &CatalogQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {} FROM monasteries WHERE TRUE", COLUMNS));

    for filter in &query.filters {
        builder.push(" AND ");
        push_filter(&mut builder, filter);
    }

    match query.order {
        SortOrder::IdAsc => {
            builder.push(" ORDER BY id ASC");
        }
        SortOrder::IdDesc => {
            builder.push(" ORDER BY id DESC");
        }
        SortOrder::Distance(origin) => {
            builder.push(" AND latitude IS NOT NULL AND longitude IS NOT NULL ORDER BY ");
            push_distance(&mut builder, origin);
            builder.push(" ASC, id ASC");
        }
        SortOrder::Random(seed) => {
            // Hashing ids with the seed gives a reproducible shuffle of the full match set
            builder.push(" ORDER BY md5(id::text || ");
            builder.push_bind(seed.to_string());
            builder.push("), id ASC");
        }
    }

    if let Some(limit) = query.limit {
        builder.push(" LIMIT ");
        builder.push_bind(limit as i64);
    }

    builder
}

fn push_filter(builder: &mut QueryBuilder<'static, Postgres>, filter: &Filter) {
    match filter {
        Filter::Verified => {
            builder.push("verified = TRUE");
        }
        Filter::RegionIs(region) => {
            builder.push("region = ");
            builder.push_bind(region.code());
        }
        Filter::RegionIn(regions) if regions.is_empty() => {
            builder.push("FALSE");
        }
        Filter::RegionIn(regions) => {
            let codes: Vec<String> = regions.iter().map(|r| r.code().to_string()).collect();
            builder.push("region = ANY(");
            builder.push_bind(codes);
            builder.push(")");
        }
        Filter::SiteTypeIs(site_type) => {
            builder.push("type = ");
            builder.push_bind(site_type.code());
        }
        Filter::ExcludeId(id) => {
            builder.push("id <> ");
            builder.push_bind(*id);
        }
        Filter::MonthDay { month, day } => {
            builder.push("(EXTRACT(MONTH FROM patron_saint_date) = ");
            builder.push_bind(*month as i32);
            builder.push(" AND EXTRACT(DAY FROM patron_saint_date) = ");
            builder.push_bind(*day as i32);
            builder.push(")");
        }
        Filter::Contains { fields, .. } if fields.is_empty() => {
            builder.push("FALSE");
        }
        Filter::Contains { fields, needle } => {
            let pattern = format!("%{}%", escape_like(needle));
            builder.push("(");
            for (i, field) in fields.iter().enumerate() {
                if i > 0 {
                    builder.push(" OR ");
                }
                builder.push(format!("COALESCE({}, '') ILIKE ", field.column()));
                builder.push_bind(pattern.clone());
            }
            builder.push(")");
        }
        Filter::DescriptionLongerThan(threshold) => {
            builder.push("char_length(COALESCE(description, '')) > ");
            builder.push_bind(*threshold as i64);
        }
        Filter::Any(filters) if filters.is_empty() => {
            builder.push("FALSE");
        }
        Filter::Any(filters) => {
            builder.push("(");
            for (i, inner) in filters.iter().enumerate() {
                if i > 0 {
                    builder.push(" OR ");
                }
                push_filter(builder, inner);
            }
            builder.push(")");
        }
    }
}

/// Haversine distance in km as a SQL expression over the row's coordinates
fn push_distance(builder: &mut QueryBuilder<'static, Postgres>, origin: GeoPoint) {
    // LEAST keeps rounding on near-antipodal points inside ASIN's domain
    builder.push(format!(
        "(2 * {} * ASIN(LEAST(1, SQRT(POWER(SIN(RADIANS(latitude - ",
        EARTH_RADIUS_KM
    ));
    builder.push_bind(origin.latitude);
    builder.push(") / 2), 2) + COS(RADIANS(");
    builder.push_bind(origin.latitude);
    builder.push(")) * COS(RADIANS(latitude)) * POWER(SIN(RADIANS(longitude - ");
    builder.push_bind(origin.longitude);
    builder.push(") / 2), 2)))))");
}

/// Escapes LIKE wildcards so user text only ever matches literally
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
