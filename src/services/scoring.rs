use serde::{Deserialize, Serialize};

use crate::models::{
    clamp_intensity, parse_display_inches, LaptopRecord, LaptopSpecs, PreferenceProfile, Purpose,
    ScoreBreakdown, StorageKind, SubScores,
};

/// Memory at which the memory component of performance saturates
const MEMORY_CEILING_GB: f64 = 32.0;
/// Storage at which the storage component of performance saturates
const STORAGE_CEILING_GB: f64 = 1024.0;
/// Battery life at which the battery attribute saturates
const BATTERY_CEILING_HOURS: f64 = 20.0;
/// Weights mapped to full and zero portability
const LIGHTEST_KG: f64 = 1.0;
const HEAVIEST_KG: f64 = 2.5;
/// Screen diagonals mapped to full and zero portability
const SMALLEST_INCHES: f64 = 13.0;
const LARGEST_INCHES: f64 = 17.0;

/// Tunable parameters of the scoring formula
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoringConfig {
    /// Weight of the budget sub-score on the 0-100 slider scale
    pub budget_weight: f64,
    /// Fraction of the budget over which the budget fit decays to zero
    pub overshoot_band: f64,
    /// Bonus per use case whose threshold a laptop clears
    pub use_case_bonus: f64,
    /// Sub-score assigned when the attribute it needs is missing
    pub neutral_score: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            budget_weight: 50.0,
            overshoot_band: 0.25,
            use_case_bonus: 0.1,
            neutral_score: 0.5,
        }
    }
}

/// Computes how well a laptop matches a preference profile
///
/// Scoring is pure: the same profile and record always produce the same
/// score, and no input makes it fail.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Match score in [0, 1]
    pub fn score(&self, profile: &PreferenceProfile, record: &LaptopRecord) -> f64 {
        self.evaluate(profile, record).0
    }

    /// Match score in [0, 1] along with the breakdown used to compute it
    pub fn evaluate(
        &self,
        profile: &PreferenceProfile,
        record: &LaptopRecord,
    ) -> (f64, ScoreBreakdown) {
        let profile = profile.normalized();
        let neutral = sanitize_unit(self.config.neutral_score, 0.5);
        let specs = &record.specs;

        let sub_scores = SubScores {
            budget: self.budget_fit(profile.budget, record.price),
            portability: slider_fit(portability_level(specs), profile.portability, neutral),
            performance: slider_fit(performance_level(specs), profile.performance, neutral),
            battery: slider_fit(battery_level(specs), profile.battery_life, neutral),
            display: slider_fit(
                specs.display.as_deref().and_then(display_level),
                profile.display_quality,
                neutral,
            ),
        };

        let weights = self.weights(&profile);
        let base = sub_scores.dot(&weights).clamp(0.0, 1.0);
        let use_case_bonus = self.use_case_bonus(&profile, specs);
        let score = (base + (1.0 - base) * use_case_bonus.min(1.0)).clamp(0.0, 1.0);

        let breakdown = ScoreBreakdown {
            sub_scores,
            weights,
            base,
            use_case_bonus,
        };

        (score, breakdown)
    }

    /// 1.0 within budget, decaying linearly to 0 across the overshoot band
    pub fn budget_fit(&self, budget: f64, price: f64) -> f64 {
        if !price.is_finite() {
            return sanitize_unit(self.config.neutral_score, 0.5);
        }
        let price = price.max(0.0);
        let budget = if budget.is_nan() { 0.0 } else { budget.max(0.0) };
        if price <= budget {
            return 1.0;
        }

        let fraction = if self.config.overshoot_band.is_finite() {
            self.config.overshoot_band.max(0.0)
        } else {
            0.0
        };
        let band = (budget * fraction).max(1.0);
        (1.0 - (price - budget) / band).max(0.0)
    }

    /// Normalized sub-score weights for a (normalized) profile
    fn weights(&self, profile: &PreferenceProfile) -> SubScores {
        let emphasis = purpose_emphasis(profile.purpose);
        let budget_weight = if self.config.budget_weight.is_nan() {
            0.0
        } else {
            clamp_intensity(self.config.budget_weight)
        };

        let raw = SubScores {
            budget: budget_weight * emphasis.budget,
            portability: profile.portability * emphasis.portability,
            performance: profile.performance * emphasis.performance,
            battery: profile.battery_life * emphasis.battery,
            display: profile.display_quality * emphasis.display,
        };

        let total = raw.sum();
        if total <= 0.0 || !total.is_finite() {
            return SubScores {
                budget: 0.2,
                portability: 0.2,
                performance: 0.2,
                battery: 0.2,
                display: 0.2,
            };
        }

        SubScores {
            budget: raw.budget / total,
            portability: raw.portability / total,
            performance: raw.performance / total,
            battery: raw.battery / total,
            display: raw.display / total,
        }
    }

    /// Sum of bonuses for the active use cases the laptop is fit for
    fn use_case_bonus(&self, profile: &PreferenceProfile, specs: &LaptopSpecs) -> f64 {
        let per_case = if self.config.use_case_bonus.is_finite() {
            self.config.use_case_bonus.max(0.0)
        } else {
            0.0
        };

        let use_cases = profile.use_cases;
        let satisfied = [
            use_cases.gaming && suits_gaming(specs),
            use_cases.video_editing && suits_video_editing(specs),
            use_cases.programming && suits_programming(specs),
            use_cases.office_work && suits_office_work(specs),
        ]
        .iter()
        .filter(|ok| **ok)
        .count();

        satisfied as f64 * per_case
    }
}

/// Per-purpose multipliers applied to the raw weights
fn purpose_emphasis(purpose: Purpose) -> SubScores {
    let neutral = SubScores {
        budget: 1.0,
        portability: 1.0,
        performance: 1.0,
        battery: 1.0,
        display: 1.0,
    };

    match purpose {
        Purpose::General => neutral,
        Purpose::Business => SubScores {
            portability: 1.5,
            battery: 1.5,
            ..neutral
        },
        Purpose::Creative => SubScores {
            display: 1.5,
            performance: 1.3,
            ..neutral
        },
        Purpose::Gaming => SubScores {
            performance: 1.6,
            display: 1.2,
            portability: 0.7,
            ..neutral
        },
        Purpose::Student => SubScores {
            budget: 1.5,
            battery: 1.3,
            ..neutral
        },
    }
}

fn sanitize_unit(value: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Closeness of an attribute level to the slider's desired level
fn slider_fit(level: Option<f64>, slider: f64, neutral: f64) -> f64 {
    match level {
        Some(level) => (1.0 - (level - slider / 100.0).abs()).clamp(0.0, 1.0),
        None => neutral,
    }
}

// ============================================================================
// Attribute Levels
// ============================================================================

/// Normalized processor class, e.g. an i7-12700H scores higher than an i5-1135G7
pub fn processor_tier(processor: &str) -> Option<f64> {
    let lower = processor.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let has = |word: &str| words.contains(&word);

    let tier = if let Some(generation) = words.iter().find_map(|w| apple_generation(w)) {
        let variant = if has("ultra") {
            0.3
        } else if has("max") {
            0.25
        } else if has("pro") {
            0.15
        } else {
            0.0
        };
        0.6 + 0.03 * generation.saturating_sub(1) as f64 + variant
    } else if let Some(class) = words.iter().find_map(|w| intel_class(w)) {
        class + mobile_suffix_boost(&words)
    } else if let Some(pos) = words.iter().position(|w| *w == "ryzen") {
        let class = words.get(pos + 1).and_then(|w| amd_class(w))?;
        class + mobile_suffix_boost(&words)
    } else if has("celeron") || has("pentium") || has("athlon") {
        0.15
    } else if has("snapdragon") {
        0.5
    } else {
        return None;
    };

    Some(tier.clamp(0.0, 1.0))
}

/// "m2" -> 2
fn apple_generation(word: &str) -> Option<u32> {
    let digits = word.strip_prefix('m')?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn intel_class(word: &str) -> Option<f64> {
    match word {
        "i3" => Some(0.3),
        "i5" => Some(0.5),
        "i7" => Some(0.7),
        "i9" => Some(0.85),
        _ => None,
    }
}

fn amd_class(word: &str) -> Option<f64> {
    match word {
        "3" => Some(0.3),
        "5" => Some(0.5),
        "7" => Some(0.7),
        "9" => Some(0.85),
        _ => None,
    }
}

/// High-power mobile parts (H, HS, HX model suffixes) get a boost
fn mobile_suffix_boost(words: &[&str]) -> f64 {
    words
        .iter()
        .filter(|w| w.len() >= 4 && w.starts_with(|c: char| c.is_ascii_digit()))
        .map(|w| match w.trim_start_matches(|c: char| c.is_ascii_digit()) {
            "hx" => 0.15,
            "h" | "hs" | "hk" => 0.1,
            _ => 0.0,
        })
        .fold(0.0, f64::max)
}

/// Combined processor, memory and storage level
pub fn performance_level(specs: &LaptopSpecs) -> Option<f64> {
    let processor = specs.processor.as_deref().and_then(processor_tier);
    let memory = specs
        .memory_gb
        .map(|gb| (gb as f64 / MEMORY_CEILING_GB).min(1.0));
    let storage = specs.storage_gb.map(|gb| {
        let level = (gb as f64 / STORAGE_CEILING_GB).min(1.0);
        match specs.storage_kind {
            Some(StorageKind::Hdd) | Some(StorageKind::Emmc) => level * 0.6,
            _ => level,
        }
    });

    let parts = [(processor, 0.5), (memory, 0.3), (storage, 0.2)];
    let (sum, weight) = parts
        .iter()
        .filter_map(|(level, weight)| level.map(|l| (l * weight, *weight)))
        .fold((0.0, 0.0), |(s, w), (ls, lw)| (s + ls, w + lw));

    if weight > 0.0 {
        Some((sum / weight).clamp(0.0, 1.0))
    } else {
        None
    }
}

/// Lighter and smaller machines are more portable
pub fn portability_level(specs: &LaptopSpecs) -> Option<f64> {
    if let Some(kg) = specs.weight_kg.filter(|kg| kg.is_finite() && *kg > 0.0) {
        return Some((1.0 - (kg - LIGHTEST_KG) / (HEAVIEST_KG - LIGHTEST_KG)).clamp(0.0, 1.0));
    }
    specs
        .display
        .as_deref()
        .and_then(parse_display_inches)
        .map(|inches| {
            ((LARGEST_INCHES - inches) / (LARGEST_INCHES - SMALLEST_INCHES)).clamp(0.0, 1.0)
        })
}

pub fn battery_level(specs: &LaptopSpecs) -> Option<f64> {
    specs
        .battery_hours
        .filter(|hours| hours.is_finite() && *hours >= 0.0)
        .map(|hours| (hours / BATTERY_CEILING_HOURS).min(1.0))
}

/// Panel quality from the display descriptor's keywords
///
/// A descriptor without any recognized keyword counts as missing.
pub fn display_level(display: &str) -> Option<f64> {
    let lower = display.to_lowercase();
    let keywords: [(&str, f64); 18] = [
        ("oled", 0.95),
        ("mini-led", 0.95),
        ("mini led", 0.95),
        ("xdr", 0.95),
        ("4k", 0.9),
        ("uhd", 0.9),
        ("retina", 0.85),
        ("3k", 0.75),
        ("2.8k", 0.75),
        ("qhd", 0.75),
        ("wqxga", 0.75),
        ("1440p", 0.75),
        ("pixelsense", 0.75),
        ("fhd+", 0.6),
        ("wuxga", 0.6),
        ("fhd", 0.5),
        ("1080p", 0.5),
        ("hd", 0.3),
    ];

    let base = keywords
        .iter()
        .filter(|(keyword, _)| lower.contains(keyword))
        .map(|(_, level)| *level)
        .fold(None, |best: Option<f64>, level| {
            Some(best.map_or(level, |b| b.max(level)))
        })?;

    let high_refresh = ["120hz", "144hz", "165hz", "240hz", "promotion"]
        .iter()
        .any(|keyword| lower.contains(keyword));

    Some(if high_refresh { (base + 0.05).min(1.0) } else { base })
}

/// Whether the graphics adapter is a discrete GPU; unknown when graphics is missing
pub fn has_discrete_gpu(specs: &LaptopSpecs) -> Option<bool> {
    let graphics = specs.graphics.as_deref()?.to_lowercase();
    Some(
        ["rtx", "gtx", "radeon rx", "arc a", "quadro"]
            .iter()
            .any(|keyword| graphics.contains(keyword)),
    )
}

fn memory_at_least(specs: &LaptopSpecs, gb: u32) -> bool {
    specs.memory_gb.is_some_and(|memory| memory >= gb)
}

fn performance_at_least(specs: &LaptopSpecs, level: f64) -> bool {
    performance_level(specs).is_some_and(|l| l >= level)
}

fn suits_gaming(specs: &LaptopSpecs) -> bool {
    has_discrete_gpu(specs) == Some(true) && memory_at_least(specs, 16)
}

fn suits_video_editing(specs: &LaptopSpecs) -> bool {
    performance_at_least(specs, 0.65) && memory_at_least(specs, 16)
}

fn suits_programming(specs: &LaptopSpecs) -> bool {
    performance_at_least(specs, 0.5) && memory_at_least(specs, 16)
}

fn suits_office_work(specs: &LaptopSpecs) -> bool {
    memory_at_least(specs, 8)
}
