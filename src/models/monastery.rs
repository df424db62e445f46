use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Historical regions a site can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Banat,
    Bucovina,
    Crisana,
    Dobrogea,
    Maramures,
    Moldova,
    Muntenia,
    Oltenia,
    Transilvania,
}

impl Region {
    pub const ALL: [Region; 9] = [
        Region::Banat,
        Region::Bucovina,
        Region::Crisana,
        Region::Dobrogea,
        Region::Maramures,
        Region::Moldova,
        Region::Muntenia,
        Region::Oltenia,
        Region::Transilvania,
    ];

    /// Code used in storage and on the wire
    pub fn code(&self) -> &'static str {
        match self {
            Region::Banat => "banat",
            Region::Bucovina => "bucovina",
            Region::Crisana => "crisana",
            Region::Dobrogea => "dobrogea",
            Region::Maramures => "maramures",
            Region::Moldova => "moldova",
            Region::Muntenia => "muntenia",
            Region::Oltenia => "oltenia",
            Region::Transilvania => "transilvania",
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_lowercase();
        Region::ALL
            .into_iter()
            .find(|region| region.code() == code)
            .ok_or_else(|| format!("unknown region: {}", s))
    }
}

/// Kind of religious site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteType {
    Monastery,
    Hermitage,
    Church,
}

impl SiteType {
    pub fn code(&self) -> &'static str {
        match self {
            SiteType::Monastery => "monastery",
            SiteType::Hermitage => "hermitage",
            SiteType::Church => "church",
        }
    }
}

impl Display for SiteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for SiteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monastery" => Ok(SiteType::Monastery),
            "hermitage" => Ok(SiteType::Hermitage),
            "church" => Ok(SiteType::Church),
            _ => Err(format!("unknown site type: {}", s)),
        }
    }
}

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Mean Earth radius used for great-circle distances
pub const EARTH_RADIUS_KM: f64 = 6371.0;

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Haversine distance to `other` in kilometres
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
    }
}

/// Patron saint feast date as it was stored
///
/// Older rows keep the date as free text, newer ones as a real date.
/// Only month and day carry meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredDate {
    Date(NaiveDate),
    Text(String),
}

impl StoredDate {
    /// Best-effort conversion to a calendar date
    pub fn to_date(&self) -> Option<NaiveDate> {
        match self {
            StoredDate::Date(date) => Some(*date),
            StoredDate::Text(text) => parse_stored_date(text),
        }
    }
}

fn parse_stored_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.date_naive());
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(timestamp.date());
    }
    NaiveDate::parse_from_str(text, "%d.%m.%Y").ok()
}

/// A catalog record as loaded from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonasteryRecord {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub region: Option<Region>,
    #[serde(default)]
    pub patron_saint: Option<String>,
    #[serde(default)]
    pub patron_saint_date: Option<StoredDate>,
    #[serde(default)]
    pub founded_year: Option<i32>,
    #[serde(default)]
    pub history: Option<String>,
    #[serde(default)]
    pub special_features: Option<String>,
    #[serde(default)]
    pub relics: Option<Vec<String>>,
    #[serde(default)]
    pub icons: Option<Vec<String>>,
    #[serde(default, rename = "type")]
    pub site_type: Option<SiteType>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub admin_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl MonasteryRecord {
    /// Creates a bare record with every optional field empty
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self {
            id,
            name,
            slug,
            description: None,
            short_description: None,
            address: None,
            city: None,
            county: None,
            region: None,
            patron_saint: None,
            patron_saint_date: None,
            founded_year: None,
            history: None,
            special_features: None,
            relics: None,
            icons: None,
            site_type: None,
            images: None,
            cover_image: None,
            email: None,
            phone: None,
            website: None,
            latitude: None,
            longitude: None,
            verified: false,
            admin_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Location of the site, only when both halves are stored
    pub fn coordinates(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint::new(latitude, longitude)),
            _ => None,
        }
    }

    /// Patron saint feast date coerced to a calendar date
    pub fn feast_date(&self) -> Option<NaiveDate> {
        self.patron_saint_date.as_ref().and_then(StoredDate::to_date)
    }
}

fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
