use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt::Display, str::FromStr};

use super::{FeastDescriptor, GeoPoint, Region, SiteType};

/// Identifier of a recommendation strategy as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    ByFeast,
    ByRegion,
    Nearby,
    Similar,
    Popular,
    HiddenGems,
    UpcomingFeasts,
    Seasonal,
}

impl StrategyKind {
    pub fn code(&self) -> &'static str {
        match self {
            StrategyKind::ByFeast => "by_feast",
            StrategyKind::ByRegion => "by_region",
            StrategyKind::Nearby => "nearby",
            StrategyKind::Similar => "similar",
            StrategyKind::Popular => "popular",
            StrategyKind::HiddenGems => "hidden_gems",
            StrategyKind::UpcomingFeasts => "upcoming_feasts",
            StrategyKind::Seasonal => "seasonal",
        }
    }
}

impl Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "by_feast" => Ok(StrategyKind::ByFeast),
            "by_region" => Ok(StrategyKind::ByRegion),
            "nearby" => Ok(StrategyKind::Nearby),
            "similar" => Ok(StrategyKind::Similar),
            "popular" => Ok(StrategyKind::Popular),
            "hidden_gems" => Ok(StrategyKind::HiddenGems),
            "upcoming_feasts" => Ok(StrategyKind::UpcomingFeasts),
            "seasonal" => Ok(StrategyKind::Seasonal),
            _ => Err(format!("unknown strategy: {}", s)),
        }
    }
}

/// A strategy together with the parameters it actually uses
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    /// Patron saint feast on the given month/day, or the major feasts when absent
    ByFeast { date: Option<NaiveDate> },
    ByRegion { region: Option<Region> },
    Nearby { origin: Option<GeoPoint> },
    Similar { reference_id: Option<i64> },
    Popular,
    HiddenGems,
    /// Saints commemorated in the calendar window starting at `from`
    UpcomingFeasts { from: NaiveDate },
    /// Month number; anything outside 1..=12 selects at random
    Seasonal { month: i64 },
}

impl Strategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::ByFeast { .. } => StrategyKind::ByFeast,
            Strategy::ByRegion { .. } => StrategyKind::ByRegion,
            Strategy::Nearby { .. } => StrategyKind::Nearby,
            Strategy::Similar { .. } => StrategyKind::Similar,
            Strategy::Popular => StrategyKind::Popular,
            Strategy::HiddenGems => StrategyKind::HiddenGems,
            Strategy::UpcomingFeasts { .. } => StrategyKind::UpcomingFeasts,
            Strategy::Seasonal { .. } => StrategyKind::Seasonal,
        }
    }
}

/// Bounds applied to the requested result size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitPolicy {
    pub default: usize,
    pub max: usize,
}

impl Default for LimitPolicy {
    fn default() -> Self {
        Self { default: 10, max: 50 }
    }
}

impl LimitPolicy {
    /// Non-positive or absent values use the default; large ones are capped
    pub fn resolve(&self, requested: Option<i64>) -> usize {
        let max = self.max.max(1);
        match requested {
            Some(n) if n > 0 => (n as usize).min(max),
            _ => self.default.clamp(1, max),
        }
    }
}

/// A fully resolved recommendation request
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationRequest {
    pub strategy: Strategy,
    pub limit: usize,
}

impl RecommendationRequest {
    pub fn new(strategy: Strategy, limit: usize) -> Self {
        Self { strategy, limit }
    }
}

/// Raw request parameters as they arrive in a query string
///
/// Every field is optional and parsed leniently: a value that does not parse
/// is treated as absent, so the strategy falls back instead of failing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationParams {
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub region: Option<Region>,
    #[serde(default, deserialize_with = "lenient")]
    pub reference_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub lng: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub feast_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient")]
    pub month: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub limit: Option<i64>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        let parsed = value.trim().parse().ok();
        if parsed.is_none() {
            tracing::debug!(value = %value, "Ignoring unparseable parameter");
        }
        parsed
    }))
}

impl RecommendationParams {
    /// Resolves loose parameters into a typed request
    ///
    /// Unknown strategies become `popular`. `today` fills in the start of the
    /// upcoming feasts window and the month of the seasonal strategy.
    pub fn into_request(self, today: NaiveDate, limits: &LimitPolicy) -> RecommendationRequest {
        let kind = self
            .strategy
            .as_deref()
            .and_then(|s| s.parse::<StrategyKind>().ok())
            .unwrap_or(StrategyKind::Popular);

        let strategy = match kind {
            StrategyKind::ByFeast => Strategy::ByFeast {
                date: self.feast_date,
            },
            StrategyKind::ByRegion => Strategy::ByRegion {
                region: self.region,
            },
            StrategyKind::Nearby => Strategy::Nearby {
                origin: match (self.lat, self.lng) {
                    (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
                        Some(GeoPoint::new(lat, lng))
                    }
                    _ => None,
                },
            },
            StrategyKind::Similar => Strategy::Similar {
                reference_id: self.reference_id,
            },
            StrategyKind::Popular => Strategy::Popular,
            StrategyKind::HiddenGems => Strategy::HiddenGems,
            StrategyKind::UpcomingFeasts => Strategy::UpcomingFeasts {
                from: self.feast_date.unwrap_or(today),
            },
            StrategyKind::Seasonal => Strategy::Seasonal {
                month: self.month.unwrap_or_else(|| i64::from(today.month())),
            },
        };

        RecommendationRequest::new(strategy, limits.resolve(self.limit))
    }
}

/// A record in its API-safe shape
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedMonastery {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub region: Option<Region>,
    pub patron_saint: Option<String>,
    pub patron_saint_date: Option<NaiveDate>,
    pub founded_year: Option<i32>,
    pub history: Option<String>,
    pub special_features: Option<String>,
    pub relics: Vec<String>,
    pub icons: Vec<String>,
    #[serde(rename = "type")]
    pub site_type: Option<SiteType>,
    pub images: Vec<String>,
    pub cover_image: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub verified: bool,
    pub admin_id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// One entry of a recommendation list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationItem {
    #[serde(flatten)]
    pub monastery: FormattedMonastery,
    /// Feast that matched this site, feast strategies only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feast: Option<FeastDescriptor>,
    /// Great-circle distance from the query point, nearby only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationResponse {
    pub strategy: StrategyKind,
    pub recommendations: Vec<RecommendationItem>,
}
