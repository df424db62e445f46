//! Liturgical calendar abstraction
//!
//! The engine only needs two lookups: feasts within a window of days, and the
//! feasts of a given month. `StaticCalendar` answers both from the fixed-date
//! feasts of the Orthodox year; movable feasts (Easter cycle) are not covered.

use chrono::{Datelike, Duration, NaiveDate, Utc};

use crate::{
    error::AppResult,
    models::{FeastCategory, FeastDescriptor},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Feasts dated from `from` through `from + window_days`, in date order
    async fn upcoming_feasts(&self, from: NaiveDate, window_days: u32)
        -> AppResult<Vec<FeastDescriptor>>;

    /// Feasts of the given month (1-12) in the current year
    async fn feasts_in_month(&self, month: u32) -> AppResult<Vec<FeastDescriptor>>;
}

/// A feast that falls on the same month and day every year
#[derive(Debug, Clone, PartialEq)]
pub struct FixedFeast {
    pub month: u32,
    pub day: u32,
    pub name: String,
    pub localized_name: String,
    pub category: FeastCategory,
}

impl FixedFeast {
    fn new(
        month: u32,
        day: u32,
        name: &str,
        localized_name: &str,
        category: FeastCategory,
    ) -> Self {
        Self {
            month,
            day,
            name: name.to_string(),
            localized_name: localized_name.to_string(),
            category,
        }
    }

    fn on(&self, year: i32) -> Option<FeastDescriptor> {
        NaiveDate::from_ymd_opt(year, self.month, self.day).map(|date| FeastDescriptor {
            name: self.name.clone(),
            localized_name: self.localized_name.clone(),
            category: self.category,
            date,
        })
    }
}

/// Calendar over a table of fixed-date feasts
#[derive(Debug, Clone)]
pub struct StaticCalendar {
    feasts: Vec<FixedFeast>,
}

impl Default for StaticCalendar {
    fn default() -> Self {
        Self::new(orthodox_fixed_feasts())
    }
}

impl StaticCalendar {
    pub fn new(feasts: Vec<FixedFeast>) -> Self {
        Self { feasts }
    }

    fn feasts_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<FeastDescriptor> {
        let mut found: Vec<FeastDescriptor> = (from.year()..=to.year())
            .flat_map(|year| self.feasts.iter().filter_map(move |feast| feast.on(year)))
            .filter(|feast| feast.date >= from && feast.date <= to)
            .collect();
        found.sort_by_key(|feast| feast.date);
        found
    }
}

#[async_trait::async_trait]
impl CalendarProvider for StaticCalendar {
    async fn upcoming_feasts(
        &self,
        from: NaiveDate,
        window_days: u32,
    ) -> AppResult<Vec<FeastDescriptor>> {
        let to = from
            .checked_add_signed(Duration::days(i64::from(window_days)))
            .unwrap_or(NaiveDate::MAX);
        Ok(self.feasts_between(from, to))
    }

    async fn feasts_in_month(&self, month: u32) -> AppResult<Vec<FeastDescriptor>> {
        let year = Utc::now().year();
        let mut found: Vec<FeastDescriptor> = self
            .feasts
            .iter()
            .filter(|feast| feast.month == month)
            .filter_map(|feast| feast.on(year))
            .collect();
        found.sort_by_key(|feast| feast.date);
        Ok(found)
    }
}

fn orthodox_fixed_feasts() -> Vec<FixedFeast> {
    use FeastCategory::{Lord, Saint, Theotokos};

    vec![
        FixedFeast::new(
            1,
            1,
            "Saint Basil the Great",
            "Sfântul Vasile cel Mare",
            Saint,
        ),
        FixedFeast::new(
            1,
            6,
            "Theophany",
            "Botezul Domnului",
            Lord,
        ),
        FixedFeast::new(
            1,
            7,
            "Synaxis of Saint John the Baptist",
            "Sfântul Ioan Botezătorul",
            Saint,
        ),
        FixedFeast::new(
            1,
            30,
            "Three Holy Hierarchs",
            "Sfinții Trei Ierarhi",
            Saint,
        ),
        FixedFeast::new(
            2,
            2,
            "Presentation of the Lord",
            "Întâmpinarea Domnului",
            Lord,
        ),
        FixedFeast::new(
            3,
            9,
            "Forty Martyrs of Sebaste",
            "Sfinții 40 de Mucenici",
            Saint,
        ),
        FixedFeast::new(
            3,
            25,
            "Annunciation",
            "Buna Vestire",
            Theotokos,
        ),
        FixedFeast::new(
            4,
            23,
            "Saint George",
            "Sfântul Mare Mucenic Gheorghe",
            Saint,
        ),
        FixedFeast::new(
            5,
            21,
            "Saints Constantine and Helen",
            "Sfinții Împărați Constantin și Elena",
            Saint,
        ),
        FixedFeast::new(
            6,
            2,
            "Saint John the New of Suceava",
            "Sfântul Ioan cel Nou de la Suceava",
            Saint,
        ),
        FixedFeast::new(
            6,
            24,
            "Nativity of Saint John the Baptist",
            "Nașterea Sfântului Ioan Botezătorul",
            Saint,
        ),
        FixedFeast::new(
            6,
            29,
            "Saints Peter and Paul",
            "Sfinții Apostoli Petru și Pavel",
            Saint,
        ),
        FixedFeast::new(
            7,
            20,
            "Saint Elijah the Prophet",
            "Sfântul Proroc Ilie",
            Saint,
        ),
        FixedFeast::new(
            8,
            6,
            "Transfiguration",
            "Schimbarea la Față",
            Lord,
        ),
        FixedFeast::new(
            8,
            15,
            "Dormition of the Mother of God",
            "Adormirea Maicii Domnului",
            Theotokos,
        ),
        FixedFeast::new(
            8,
            29,
            "Beheading of Saint John the Baptist",
            "Tăierea capului Sfântului Ioan Botezătorul",
            Saint,
        ),
        FixedFeast::new(
            9,
            8,
            "Nativity of the Mother of God",
            "Nașterea Maicii Domnului",
            Theotokos,
        ),
        FixedFeast::new(
            9,
            14,
            "Exaltation of the Holy Cross",
            "Înălțarea Sfintei Cruci",
            Lord,
        ),
        FixedFeast::new(
            10,
            14,
            "Saint Paraskeva",
            "Sfânta Cuvioasă Parascheva",
            Saint,
        ),
        FixedFeast::new(
            10,
            26,
            "Saint Demetrius",
            "Sfântul Mare Mucenic Dimitrie",
            Saint,
        ),
        FixedFeast::new(
            10,
            27,
            "Saint Demetrius the New",
            "Sfântul Cuvios Dimitrie cel Nou",
            Saint,
        ),
        FixedFeast::new(
            11,
            8,
            "Archangels Michael and Gabriel",
            "Sfinții Arhangheli Mihail și Gavriil",
            Saint,
        ),
        FixedFeast::new(
            11,
            21,
            "Entry of the Mother of God into the Temple",
            "Intrarea în Biserică a Maicii Domnului",
            Theotokos,
        ),
        FixedFeast::new(
            11,
            30,
            "Saint Andrew the Apostle",
            "Sfântul Apostol Andrei",
            Saint,
        ),
        FixedFeast::new(
            12,
            6,
            "Saint Nicholas",
            "Sfântul Ierarh Nicolae",
            Saint,
        ),
        FixedFeast::new(
            12,
            25,
            "Nativity of the Lord",
            "Nașterea Domnului",
            Lord,
        ),
        FixedFeast::new(
            12,
            27,
            "Saint Stephen the Archdeacon",
            "Sfântul Arhidiacon Ștefan",
            Saint,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_upcoming_feasts_within_window() {
        let calendar = StaticCalendar::default();
        let feasts = calendar.upcoming_feasts(date(2025, 10, 10), 20).await.unwrap();
        let names: Vec<&str> = feasts.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Saint Paraskeva", "Saint Demetrius", "Saint Demetrius the New"]
        );
    }

    #[tokio::test]
    async fn test_upcoming_feasts_wrap_into_next_year() {
        let calendar = StaticCalendar::default();
        let feasts = calendar.upcoming_feasts(date(2025, 12, 26), 12).await.unwrap();
        let dates: Vec<NaiveDate> = feasts.iter().map(|f| f.date).collect();
        assert_eq!(
            dates,
            vec![
                date(2025, 12, 27),
                date(2026, 1, 1),
                date(2026, 1, 6),
                date(2026, 1, 7)
            ]
        );
    }

    #[tokio::test]
    async fn test_window_includes_start_day() {
        let calendar = StaticCalendar::default();
        let feasts = calendar.upcoming_feasts(date(2025, 12, 6), 0).await.unwrap();
        assert_eq!(feasts.len(), 1);
        assert_eq!(feasts[0].localized_name, "Sfântul Ierarh Nicolae");
    }

    #[tokio::test]
    async fn test_feasts_in_month() {
        let calendar = StaticCalendar::default();
        let feasts = calendar.feasts_in_month(8).await.unwrap();
        let days: Vec<u32> = feasts.iter().map(|f| f.date.day()).collect();
        assert_eq!(days, vec![6, 15, 29]);
        assert!(calendar.feasts_in_month(13).await.unwrap().is_empty());
    }
}
