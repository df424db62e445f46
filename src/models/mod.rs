mod feast;
mod monastery;
mod recommendation;

pub use feast::{FeastCategory, FeastDescriptor};
pub use monastery::{GeoPoint, MonasteryRecord, Region, SiteType, StoredDate, EARTH_RADIUS_KM};
pub use recommendation::{
    FormattedMonastery, LimitPolicy, RecommendationItem, RecommendationParams,
    RecommendationRequest, RecommendationResponse, Strategy, StrategyKind,
};
