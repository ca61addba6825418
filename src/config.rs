use serde::Deserialize;

use crate::services::ScoringConfig;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the JSON catalog file
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Optional path to a JSON preference profile; the form defaults are used when absent
    #[serde(default)]
    pub profile_path: Option<String>,

    /// Free-text search applied to the ranked results
    #[serde(default)]
    pub search: String,

    /// Brand filter ("all" passes everything)
    #[serde(default = "default_brand")]
    pub brand: String,

    /// Maximum number of results to print
    #[serde(default)]
    pub result_limit: Option<usize>,

    /// Redis connection URL for persisting favorites
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Weight of the budget sub-score, on the 0-100 slider scale
    #[serde(default = "default_budget_weight")]
    pub budget_weight: f64,

    /// Fraction of the budget over which the budget fit decays to zero
    #[serde(default = "default_overshoot_band")]
    pub overshoot_band: f64,

    /// Bonus per satisfied use case
    #[serde(default = "default_use_case_bonus")]
    pub use_case_bonus: f64,
}

fn default_catalog_path() -> String {
    "data/catalog.json".to_string()
}

fn default_brand() -> String {
    "all".to_string()
}

fn default_budget_weight() -> f64 {
    50.0
}

fn default_overshoot_band() -> f64 {
    0.25
}

fn default_use_case_bonus() -> f64 {
    0.1
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Scoring knobs derived from this configuration
    pub fn scoring(&self) -> ScoringConfig {
        ScoringConfig {
            budget_weight: self.budget_weight,
            overshoot_band: self.overshoot_band,
            use_case_bonus: self.use_case_bonus,
            ..ScoringConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_env() {
        let vars: Vec<(String, String)> = Vec::new();
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.catalog_path, "data/catalog.json");
        assert_eq!(config.brand, "all");
        assert!(config.search.is_empty());
        assert!(config.profile_path.is_none());
        assert!(config.redis_url.is_none());
        assert_eq!(config.overshoot_band, 0.25);
    }

    #[test]
    fn test_overrides_flow_into_scoring() {
        let vars = vec![
            ("BRAND".to_string(), "Dell".to_string()),
            ("RESULT_LIMIT".to_string(), "3".to_string()),
            ("OVERSHOOT_BAND".to_string(), "0.5".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.brand, "Dell");
        assert_eq!(config.result_limit, Some(3));

        let scoring = config.scoring();
        assert_eq!(scoring.overshoot_band, 0.5);
        assert_eq!(scoring.budget_weight, 50.0);
        assert_eq!(scoring.neutral_score, ScoringConfig::default().neutral_score);
    }
}
