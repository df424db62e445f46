use serde::Deserialize;
use std::path::Path;

use crate::{
    error::{AppError, AppResult},
    models::Region,
};

/// Editorial choices behind the curated strategies
///
/// None of these values are derived from data. They ship as defaults and can be
/// replaced wholesale from a JSON file; absent keys keep their default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CurationRules {
    /// Feasts used by `by_feast` when no date is given
    pub major_feasts: Vec<String>,
    /// Lesser-visited regions eligible as hidden gems
    pub hidden_gem_regions: Vec<Region>,
    /// Description length, in characters, a hidden gem must exceed
    pub hidden_gem_min_description: usize,
    pub winter_regions: Vec<Region>,
    pub spring_keywords: Vec<String>,
    pub summer_keywords: Vec<String>,
    pub autumn_regions: Vec<Region>,
    /// Leading words dropped from saint names before matching
    pub honorifics: Vec<String>,
}

impl Default for CurationRules {
    fn default() -> Self {
        Self {
            major_feasts: strings(&[
                "Adormirea Maicii Domnului",
                "Sfântul Ierarh Nicolae",
                "Sfinții Arhangheli Mihail și Gavriil",
                "Sfânta Treime",
            ]),
            hidden_gem_regions: vec![
                Region::Banat,
                Region::Crisana,
                Region::Dobrogea,
                Region::Maramures,
            ],
            hidden_gem_min_description: 200,
            winter_regions: vec![Region::Bucovina, Region::Maramures],
            spring_keywords: strings(&["garden", "park", "grădin", "parc"]),
            summer_keywords: strings(&["activit", "tourism", "turism"]),
            autumn_regions: vec![Region::Transilvania, Region::Moldova],
            honorifics: strings(&[
                "saint", "saints", "st.", "holy", "great", "martyr", "prophet", "apostle",
                "apostles", "venerable", "sfântul", "sfânta", "sfinții", "sfantul", "sfanta",
                "sfintii", "sf.", "sfinte", "mare", "mucenic", "mucenici", "mucenița", "ierarh",
                "ierarhul", "proroc", "prorocul", "apostol", "apostolul", "apostoli", "cuvios",
                "cuvioasa", "cuvioasă", "împărați", "imparati", "arhangheli", "arhidiacon",
            ]),
        }
    }
}

impl CurationRules {
    /// Reads rules from a JSON file
    pub async fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::Config(format!("Cannot read curation rules {}: {}", path.display(), e))
        })?;
        let rules = serde_json::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Invalid curation rules {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), "Loaded curation rules");

        Ok(rules)
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let rules = CurationRules::default();
        assert_eq!(rules.major_feasts.len(), 4);
        assert_eq!(rules.hidden_gem_regions.len(), 4);
        assert_eq!(rules.winter_regions.len(), 2);
        assert_eq!(rules.autumn_regions.len(), 2);
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let rules: CurationRules = serde_json::from_str(
            r#"{"winterRegions": ["oltenia", "banat"], "hiddenGemMinDescription": 80}"#,
        )
        .unwrap();
        assert_eq!(rules.winter_regions, vec![Region::Oltenia, Region::Banat]);
        assert_eq!(rules.hidden_gem_min_description, 80);
        assert_eq!(rules.spring_keywords, CurationRules::default().spring_keywords);
    }

    #[test]
    fn test_unknown_region_is_rejected() {
        let result = serde_json::from_str::<CurationRules>(r#"{"autumnRegions": ["narnia"]}"#);
        assert!(result.is_err());
    }
}
