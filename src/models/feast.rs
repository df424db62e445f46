use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Liturgical category of a feast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeastCategory {
    /// Commemoration of a saint, the only kind a patron saint can match
    Saint,
    /// Feasts of the Lord
    Lord,
    /// Feasts of the Mother of God
    Theotokos,
    Other,
}

/// A dated feast as reported by the calendar provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeastDescriptor {
    pub name: String,
    pub localized_name: String,
    pub category: FeastCategory,
    pub date: NaiveDate,
}

impl FeastDescriptor {
    pub fn is_saint(&self) -> bool {
        self.category == FeastCategory::Saint
    }
}
