use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::time::Instant;

use crate::{
    models::{LaptopRecord, PreferenceProfile, ScoredCandidate},
    services::{CatalogStore, ScoringEngine},
};

/// Brand filter value that lets every brand through
pub const ALL_BRANDS: &str = "all";

/// Brand filter applied after ranking
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BrandFilter {
    #[default]
    All,
    /// Case-sensitive exact match on the record's brand
    Exact(String),
}

impl From<&str> for BrandFilter {
    fn from(value: &str) -> Self {
        if value == ALL_BRANDS {
            BrandFilter::All
        } else {
            BrandFilter::Exact(value.to_string())
        }
    }
}

impl From<String> for BrandFilter {
    fn from(value: String) -> Self {
        BrandFilter::from(value.as_str())
    }
}

impl From<BrandFilter> for String {
    fn from(filter: BrandFilter) -> Self {
        match filter {
            BrandFilter::All => ALL_BRANDS.to_string(),
            BrandFilter::Exact(brand) => brand,
        }
    }
}

impl BrandFilter {
    pub fn matches(&self, record: &LaptopRecord) -> bool {
        match self {
            BrandFilter::All => true,
            BrandFilter::Exact(brand) => record.brand == *brand,
        }
    }
}

/// Search text and brand filter applied on top of a ranking
///
/// The default value is the reset state: empty search, all brands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub brand: BrandFilter,
}

impl ResultFilter {
    pub fn new(search: impl Into<String>, brand: impl Into<BrandFilter>) -> Self {
        Self {
            search: search.into(),
            brand: brand.into(),
        }
    }

    /// True when the filter lets everything through
    pub fn is_reset(&self) -> bool {
        self.search.is_empty() && self.brand == BrandFilter::All
    }

    pub fn matches(&self, record: &LaptopRecord) -> bool {
        matches_search(record, &self.search.to_lowercase()) && self.brand.matches(record)
    }
}

/// Case-insensitive substring match on name or brand; `needle` is lowercase
fn matches_search(record: &LaptopRecord, needle: &str) -> bool {
    needle.is_empty()
        || record.name.to_lowercase().contains(needle)
        || record.brand.to_lowercase().contains(needle)
}

/// Ranking order: score, then rating, then price, then catalog position
///
/// A missing rating sorts after any rating.
pub fn compare_candidates(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| match (a.record.rating, b.record.rating) {
            (Some(ra), Some(rb)) => rb.total_cmp(&ra),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.record.price.total_cmp(&b.record.price))
        .then_with(|| a.position.cmp(&b.position))
}

/// A catalog scored and sorted for one profile
///
/// Scoring happens once in [`RankedCatalog::build`]; filtering only walks
/// the already sorted candidates, so search and brand changes never
/// re-score.
#[derive(Debug, Clone, Default)]
pub struct RankedCatalog {
    candidates: Vec<ScoredCandidate>,
}

impl RankedCatalog {
    /// Scores every record and sorts with the tie-break chain
    pub fn build(
        engine: &ScoringEngine,
        profile: &PreferenceProfile,
        catalog: &CatalogStore,
    ) -> Self {
        let start = Instant::now();

        let mut candidates: Vec<ScoredCandidate> = catalog
            .records()
            .iter()
            .enumerate()
            .map(|(position, record)| {
                let (score, breakdown) = engine.evaluate(profile, record);
                ScoredCandidate {
                    record: record.clone(),
                    score,
                    breakdown,
                    position,
                }
            })
            .collect();

        candidates.sort_by(compare_candidates);

        tracing::debug!(
            candidates = candidates.len(),
            purpose = %profile.purpose,
            budget = profile.budget,
            top_score = candidates.first().map(|c| c.score),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Catalog ranked"
        );

        Self { candidates }
    }

    /// Every candidate in rank order
    pub fn candidates(&self) -> &[ScoredCandidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidates passing the filter, in rank order
    pub fn filter(&self, filter: &ResultFilter) -> Vec<&ScoredCandidate> {
        let needle = filter.search.to_lowercase();
        self.candidates
            .iter()
            .filter(|c| matches_search(&c.record, &needle) && filter.brand.matches(&c.record))
            .collect()
    }

    /// At most `limit` filtered candidates
    pub fn top(&self, filter: &ResultFilter, limit: usize) -> Vec<&ScoredCandidate> {
        let mut results = self.filter(filter);
        results.truncate(limit);
        results
    }
}

/// Scores, sorts and filters a catalog in one call
///
/// An empty result is a valid outcome; callers decide how to present it.
pub fn rank(
    engine: &ScoringEngine,
    profile: &PreferenceProfile,
    catalog: &CatalogStore,
    search_text: &str,
    brand_filter: &str,
) -> Vec<ScoredCandidate> {
    let filter = ResultFilter::new(search_text, brand_filter);
    RankedCatalog::build(engine, profile, catalog)
        .filter(&filter)
        .into_iter()
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LaptopId, ScoreBreakdown};

    fn candidate(id: &str, score: f64, rating: Option<f64>, price: f64, position: usize) -> ScoredCandidate {
        let mut record = LaptopRecord::new(id, id, "Acme", price);
        record.rating = rating;
        ScoredCandidate {
            record,
            score,
            breakdown: ScoreBreakdown::default(),
            position,
        }
    }

    fn ids(candidates: &[&ScoredCandidate]) -> Vec<String> {
        candidates.iter().map(|c| c.record.id.to_string()).collect()
    }

    #[test]
    fn test_tie_break_chain() {
        let mut candidates = vec![
            candidate("late", 0.5, Some(4.5), 1000.0, 4),
            candidate("unrated", 0.5, None, 900.0, 3),
            candidate("pricey", 0.5, Some(4.5), 1200.0, 2),
            candidate("rated", 0.5, Some(4.8), 1500.0, 1),
            candidate("best", 0.9, None, 2500.0, 5),
            candidate("early", 0.5, Some(4.5), 1000.0, 0),
        ];
        candidates.sort_by(compare_candidates);

        let order: Vec<&str> = candidates.iter().map(|c| c.record.id.as_str()).collect();
        assert_eq!(order, vec!["best", "rated", "early", "late", "pricey", "unrated"]);
    }

    #[test]
    fn test_brand_filter_sentinel() {
        assert_eq!(BrandFilter::from("all"), BrandFilter::All);
        assert_eq!(BrandFilter::from("Dell"), BrandFilter::Exact("Dell".to_string()));

        let record = LaptopRecord::new("1", "XPS", "Dell", 1000.0);
        assert!(BrandFilter::All.matches(&record));
        assert!(BrandFilter::from("Dell").matches(&record));
        assert!(!BrandFilter::from("dell").matches(&record));
    }

    #[test]
    fn test_brand_filter_serde() {
        let filter: ResultFilter = serde_json::from_str(r#"{ "search": "xps", "brand": "all" }"#).unwrap();
        assert_eq!(filter.brand, BrandFilter::All);
        let json = serde_json::to_string(&BrandFilter::from("HP")).unwrap();
        assert_eq!(json, "\"HP\"");
    }

    #[test]
    fn test_search_matches_name_or_brand() {
        let record = LaptopRecord::new("1", "ThinkPad X1 Carbon", "Lenovo", 1649.0);
        assert!(ResultFilter::new("thinkpad", "all").matches(&record));
        assert!(ResultFilter::new("LENOVO", "all").matches(&record));
        assert!(ResultFilter::new("", "all").matches(&record));
        assert!(!ResultFilter::new("spectre", "all").matches(&record));
        assert!(!ResultFilter::new("thinkpad", "HP").matches(&record));
    }

    #[test]
    fn test_reset_filter() {
        assert!(ResultFilter::default().is_reset());
        assert!(!ResultFilter::new("x", "all").is_reset());
        assert!(!ResultFilter::new("", "Dell").is_reset());
    }

    #[test]
    fn test_filter_and_top_keep_rank_order() {
        let records = vec![
            LaptopRecord::new("1", "Alpha", "Acme", 900.0).with_rating(4.0),
            LaptopRecord::new("2", "Beta", "Acme", 800.0).with_rating(4.5),
            LaptopRecord::new("3", "Gamma", "Other", 700.0).with_rating(4.9),
        ];
        let catalog = CatalogStore::new(records).unwrap();
        let ranked = RankedCatalog::build(&ScoringEngine::default(), &PreferenceProfile::default(), &catalog);

        // Identical specs and all within budget: rating decides
        assert_eq!(ids(&ranked.filter(&ResultFilter::default())), vec!["3", "2", "1"]);
        assert_eq!(ids(&ranked.filter(&ResultFilter::new("", "Acme"))), vec!["2", "1"]);
        assert_eq!(ids(&ranked.top(&ResultFilter::default(), 1)), vec!["3"]);
        assert!(ranked.filter(&ResultFilter::new("zeta", "all")).is_empty());
    }

    #[test]
    fn test_rank_on_empty_catalog() {
        let catalog = CatalogStore::default();
        let results = rank(&ScoringEngine::default(), &PreferenceProfile::default(), &catalog, "", "all");
        assert!(results.is_empty());
    }

    #[test]
    fn test_rank_returns_owned_candidates() {
        let catalog = CatalogStore::new(vec![LaptopRecord::new("1", "Alpha", "Acme", 900.0)]).unwrap();
        let results = rank(&ScoringEngine::default(), &PreferenceProfile::default(), &catalog, "alp", "Acme");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].record.id, LaptopId::from("1"));
        assert_eq!(results[0].position, 0);
    }
}
