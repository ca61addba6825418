use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Lowest and highest value an intensity slider can take
pub const INTENSITY_MIN: f64 = 0.0;
pub const INTENSITY_MAX: f64 = 100.0;

/// Primary purpose of the laptop
///
/// Unknown purpose strings deserialize to `General`, which applies no
/// emphasis to any sub-score.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Purpose {
    #[default]
    General,
    Business,
    Creative,
    Gaming,
    Student,
}

impl From<String> for Purpose {
    fn from(value: String) -> Self {
        Purpose::from(value.as_str())
    }
}

impl From<&str> for Purpose {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "business" => Purpose::Business,
            "creative" => Purpose::Creative,
            "gaming" => Purpose::Gaming,
            "student" => Purpose::Student,
            _ => Purpose::General,
        }
    }
}

impl Display for Purpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Purpose::General => "general",
            Purpose::Business => "business",
            Purpose::Creative => "creative",
            Purpose::Gaming => "gaming",
            Purpose::Student => "student",
        };
        write!(f, "{}", name)
    }
}

/// Independent use-case switches
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UseCases {
    #[serde(default)]
    pub gaming: bool,
    #[serde(default)]
    pub video_editing: bool,
    #[serde(default)]
    pub programming: bool,
    #[serde(default)]
    pub office_work: bool,
}

impl UseCases {
    /// Returns true when no use case is switched on
    pub fn is_empty(&self) -> bool {
        !(self.gaming || self.video_editing || self.programming || self.office_work)
    }
}

/// Weighted preferences submitted by the user
///
/// A profile is an immutable input: a new one replaces the old one on every
/// form submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceProfile {
    /// Budget ceiling in currency units
    pub budget: f64,
    #[serde(default)]
    pub purpose: Purpose,
    /// Intensity sliders, nominally within [0, 100]
    pub portability: f64,
    pub performance: f64,
    pub battery_life: f64,
    pub display_quality: f64,
    #[serde(flatten)]
    pub use_cases: UseCases,
}

impl Default for PreferenceProfile {
    /// Form defaults: mid-range budget, balanced sliders, office work on
    fn default() -> Self {
        Self {
            budget: 1500.0,
            purpose: Purpose::General,
            portability: 50.0,
            performance: 50.0,
            battery_life: 50.0,
            display_quality: 50.0,
            use_cases: UseCases {
                office_work: true,
                ..UseCases::default()
            },
        }
    }
}

/// Clamps a slider value into [0, 100]
///
/// NaN is a caller bug: it trips an assertion in debug builds and is treated
/// as zero otherwise.
pub fn clamp_intensity(value: f64) -> f64 {
    debug_assert!(!value.is_nan(), "intensity must be a number");
    if value.is_nan() {
        INTENSITY_MIN
    } else {
        value.clamp(INTENSITY_MIN, INTENSITY_MAX)
    }
}

impl PreferenceProfile {
    /// Copy of this profile with every slider clamped and the budget made non-negative
    pub fn normalized(&self) -> Self {
        debug_assert!(!self.budget.is_nan(), "budget must be a number");
        let budget = if self.budget.is_nan() { 0.0 } else { self.budget.max(0.0) };

        Self {
            budget,
            purpose: self.purpose,
            portability: clamp_intensity(self.portability),
            performance: clamp_intensity(self.performance),
            battery_life: clamp_intensity(self.battery_life),
            display_quality: clamp_intensity(self.display_quality),
            use_cases: self.use_cases,
        }
    }
}
