use serde::{Deserialize, Serialize};
use std::fmt::Display;

mod favorite;
mod laptop;
mod preferences;

pub use favorite::{ComparisonMode, FavoriteEntry, FavoritesSnapshot};
pub use laptop::{
    parse_battery_hours, parse_capacity_gb, parse_display_inches, parse_storage, parse_weight_kg,
    LaptopRecord, LaptopSpecs, RawLaptop, RawSpecifications, SoftwareSuggestion, StorageKind,
};
pub use preferences::{clamp_intensity, PreferenceProfile, Purpose, UseCases};

/// Catalog identifier of a laptop
///
/// Every reference to a record goes through this identifier, never through
/// its position in a list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaptopId(String);

impl LaptopId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for LaptopId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for LaptopId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for LaptopId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-dimension sub-scores, each within [0, 1]
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct SubScores {
    pub budget: f64,
    pub portability: f64,
    pub performance: f64,
    pub battery: f64,
    pub display: f64,
}

impl SubScores {
    /// Weighted sum of the sub-scores
    pub fn dot(&self, weights: &SubScores) -> f64 {
        self.budget * weights.budget
            + self.portability * weights.portability
            + self.performance * weights.performance
            + self.battery * weights.battery
            + self.display * weights.display
    }

    pub fn sum(&self) -> f64 {
        self.budget + self.portability + self.performance + self.battery + self.display
    }
}

/// How a match score was assembled
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ScoreBreakdown {
    pub sub_scores: SubScores,
    /// Normalized weights; they sum to 1
    pub weights: SubScores,
    /// Weighted sum before the use-case bonus
    pub base: f64,
    /// Accumulated bonus from satisfied use cases
    pub use_case_bonus: f64,
}

/// A laptop paired with its match score for one profile
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoredCandidate {
    pub record: LaptopRecord,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    /// Position of the record in the catalog, the last tie-breaker
    #[serde(skip)]
    pub position: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_laptop_id_display_and_serde() {
        let id = LaptopId::from("xps-15");
        assert_eq!(format!("{}", id), "xps-15");

        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"xps-15\"");

        let deserialized: LaptopId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, id);
    }

    #[test]
    fn test_sub_scores_dot() {
        let scores = SubScores {
            budget: 1.0,
            portability: 0.5,
            performance: 0.0,
            battery: 1.0,
            display: 0.5,
        };
        let weights = SubScores {
            budget: 0.2,
            portability: 0.2,
            performance: 0.2,
            battery: 0.2,
            display: 0.2,
        };
        assert!((scores.dot(&weights) - 0.6).abs() < 1e-9);
        assert!((weights.sum() - 1.0).abs() < 1e-9);
    }
}
