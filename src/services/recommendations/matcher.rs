use crate::{
    db::{Filter, TextField},
    models::{FeastDescriptor, MonasteryRecord},
};

/// Shortest normalized name still worth matching on
const MIN_NAME_CHARS: usize = 3;

/// A saint name ready for substring matching, with the feast it came from
#[derive(Debug, Clone, PartialEq)]
pub struct SaintCandidate {
    pub needle: String,
    pub feast: FeastDescriptor,
}

/// Fuzzy join between feast titles and free-text patron saint fields
///
/// Neither side uses a controlled vocabulary, so both are reduced to a bare
/// name: lowercased, trimmed, leading honorifics dropped. Matching is then
/// plain substring containment.
#[derive(Debug, Clone)]
pub struct SaintNameMatcher {
    honorifics: Vec<String>,
}

impl SaintNameMatcher {
    pub fn new(honorifics: &[String]) -> Self {
        Self {
            honorifics: honorifics.iter().map(|h| h.trim().to_lowercase()).collect(),
        }
    }

    /// Bare saint name, or `None` when too little is left to match on
    pub fn normalize(&self, name: &str) -> Option<String> {
        let lowered = name.trim().to_lowercase();
        let words: Vec<&str> = lowered
            .split_whitespace()
            .skip_while(|word| self.honorifics.iter().any(|h| h == word))
            .collect();
        let normalized = words.join(" ");

        if normalized.chars().count() < MIN_NAME_CHARS {
            None
        } else {
            Some(normalized)
        }
    }

    /// Candidate names from the saint feasts in `feasts`, first occurrence wins
    pub fn candidates(&self, feasts: &[FeastDescriptor]) -> Vec<SaintCandidate> {
        let mut candidates: Vec<SaintCandidate> = Vec::new();
        for feast in feasts.iter().filter(|feast| feast.is_saint()) {
            let Some(needle) = self.normalize(&feast.localized_name) else {
                continue;
            };
            if candidates.iter().any(|c| c.needle == needle) {
                continue;
            }
            candidates.push(SaintCandidate {
                needle,
                feast: feast.clone(),
            });
        }
        candidates
    }

    /// Records whose patron saint or name mentions any candidate
    ///
    /// No candidates yields an empty disjunction, which matches nothing.
    pub fn filter(&self, candidates: &[SaintCandidate]) -> Filter {
        Filter::Any(
            candidates
                .iter()
                .map(|c| {
                    Filter::contains(&[TextField::PatronSaint, TextField::Name], c.needle.clone())
                })
                .collect(),
        )
    }

    /// Feast of the first candidate the record mentions
    pub fn best_match<'a>(
        &self,
        record: &MonasteryRecord,
        candidates: &'a [SaintCandidate],
    ) -> Option<&'a FeastDescriptor> {
        let patron = record.patron_saint.as_deref().unwrap_or_default().to_lowercase();
        let name = record.name.to_lowercase();
        candidates
            .iter()
            .find(|c| patron.contains(&c.needle) || name.contains(&c.needle))
            .map(|c| &c.feast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeastCategory;
    use crate::services::recommendations::CurationRules;
    use chrono::NaiveDate;

    fn matcher() -> SaintNameMatcher {
        SaintNameMatcher::new(&CurationRules::default().honorifics)
    }

    fn feast(localized: &str, category: FeastCategory) -> FeastDescriptor {
        FeastDescriptor {
            name: localized.to_string(),
            localized_name: localized.to_string(),
            category,
            date: NaiveDate::from_ymd_opt(2025, 12, 6).unwrap(),
        }
    }

    #[test]
    fn test_normalize_strips_honorifics() {
        let m = matcher();
        assert_eq!(m.normalize("Sfântul Ierarh Nicolae").as_deref(), Some("nicolae"));
        assert_eq!(m.normalize("  Saint Nicholas ").as_deref(), Some("nicholas"));
        assert_eq!(m.normalize("Holy Saints Peter and Paul").as_deref(), Some("peter and paul"));
        assert_eq!(
            m.normalize("Sfinții Împărați Constantin și Elena").as_deref(),
            Some("constantin și elena")
        );
    }

    #[test]
    fn test_normalize_keeps_inner_words() {
        let m = matcher();
        assert_eq!(
            m.normalize("Adormirea Maicii Domnului").as_deref(),
            Some("adormirea maicii domnului")
        );
    }

    #[test]
    fn test_normalize_rejects_empty_names() {
        let m = matcher();
        assert_eq!(m.normalize("Sfântul"), None);
        assert_eq!(m.normalize("   "), None);
        assert_eq!(m.normalize("Sf. Ab"), None);
    }

    #[test]
    fn test_candidates_keep_saints_only_and_dedupe() {
        let m = matcher();
        let feasts = vec![
            feast("Sfântul Ierarh Nicolae", FeastCategory::Saint),
            feast("Nașterea Domnului", FeastCategory::Lord),
            feast("Sf. Nicolae", FeastCategory::Saint),
        ];
        let candidates = m.candidates(&feasts);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].needle, "nicolae");
    }

    #[test]
    fn test_empty_candidates_build_match_nothing_filter() {
        assert_eq!(matcher().filter(&[]), Filter::Any(vec![]));
    }

    #[test]
    fn test_best_match_looks_at_patron_and_name() {
        let m = matcher();
        let candidates = m.candidates(&[
            feast("Sfântul Proroc Ilie", FeastCategory::Saint),
            feast("Sfânta Cuvioasă Parascheva", FeastCategory::Saint),
        ]);

        let mut by_patron = MonasteryRecord::new(1, "Mănăstirea Agapia");
        by_patron.patron_saint = Some("Sf. Cuvioasa PARASCHEVA".to_string());
        assert_eq!(
            m.best_match(&by_patron, &candidates).map(|f| f.localized_name.as_str()),
            Some("Sfânta Cuvioasă Parascheva")
        );

        let by_name = MonasteryRecord::new(2, "Schitul Sfântul Ilie");
        assert_eq!(
            m.best_match(&by_name, &candidates).map(|f| f.localized_name.as_str()),
            Some("Sfântul Proroc Ilie")
        );

        let unrelated = MonasteryRecord::new(3, "Mănăstirea Putna");
        assert!(m.best_match(&unrelated, &candidates).is_none());
    }
}
