use serde::{Deserialize, Serialize};

use super::LaptopId;

/// Kind of storage device
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Ssd,
    Hdd,
    Emmc,
}

/// Structured hardware specifications
///
/// Every field is optional: catalogs are assembled from several sources and
/// a missing attribute is scored as neutral rather than rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LaptopSpecs {
    pub processor: Option<String>,
    pub memory_gb: Option<u32>,
    pub storage_gb: Option<u32>,
    pub storage_kind: Option<StorageKind>,
    /// Display descriptor, e.g. `14" Retina XDR`
    pub display: Option<String>,
    pub graphics: Option<String>,
    pub battery_hours: Option<f64>,
    pub weight_kg: Option<f64>,
    pub os: Option<String>,
}

/// Software recommended alongside a laptop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SoftwareSuggestion {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub url: String,
}

/// A laptop available for recommendation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LaptopRecord {
    /// Unique, stable identifier
    pub id: LaptopId,
    /// Display name (e.g., "Dell XPS 15")
    pub name: String,
    /// Brand tag used by the brand filter (e.g., "Dell")
    pub brand: String,
    pub specs: LaptopSpecs,
    /// Price in currency units
    pub price: f64,
    /// Quality rating between 0 and 5
    pub rating: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub shop_url: Option<String>,
    #[serde(default)]
    pub software: Vec<SoftwareSuggestion>,
}

impl LaptopRecord {
    /// Creates a record with empty specs and no rating
    pub fn new(id: impl Into<LaptopId>, name: impl Into<String>, brand: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            brand: brand.into(),
            specs: LaptopSpecs::default(),
            price,
            rating: None,
            image: None,
            description: None,
            shop_url: None,
            software: Vec::new(),
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_specs(mut self, specs: LaptopSpecs) -> Self {
        self.specs = specs;
        self
    }
}

// ============================================================================
// Catalog File Types
// ============================================================================

/// Laptop entry as written in catalog files
///
/// Hardware fields are free text ("16GB", "1TB SSD", "Up to 12 hours") the
/// way product pages present them.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLaptop {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub price: f64,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub processor: Option<String>,
    #[serde(default)]
    pub ram: Option<String>,
    #[serde(default)]
    pub storage: Option<String>,
    #[serde(default)]
    pub display: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub specifications: Option<RawSpecifications>,
    #[serde(default)]
    pub shop_url: Option<String>,
    #[serde(default)]
    pub software: Vec<SoftwareSuggestion>,
}

/// Extended specification block of a catalog entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSpecifications {
    #[serde(default)]
    pub graphics: Option<String>,
    #[serde(default)]
    pub battery: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub os: Option<String>,
}

/// Valid catalog rating range; ratings outside it are treated as missing
pub const RATING_MIN: f64 = 0.0;
pub const RATING_MAX: f64 = 5.0;

impl From<RawLaptop> for LaptopRecord {
    fn from(raw: RawLaptop) -> Self {
        let extra = raw.specifications.unwrap_or_default();
        let (storage_gb, storage_kind) = raw
            .storage
            .as_deref()
            .map(parse_storage)
            .unwrap_or((None, None));

        let specs = LaptopSpecs {
            processor: raw.processor.filter(|p| !p.trim().is_empty()),
            memory_gb: raw.ram.as_deref().and_then(parse_capacity_gb),
            storage_gb,
            storage_kind,
            display: raw.display.filter(|d| !d.trim().is_empty()),
            graphics: extra.graphics,
            battery_hours: extra.battery.as_deref().and_then(parse_battery_hours),
            weight_kg: extra.weight.as_deref().and_then(parse_weight_kg),
            os: extra.os,
        };

        LaptopRecord {
            id: LaptopId::from(raw.id),
            name: raw.name,
            brand: raw.brand,
            specs,
            price: raw.price,
            rating: raw.rating.filter(|r| (RATING_MIN..=RATING_MAX).contains(r)),
            image: raw.image,
            description: raw.description,
            shop_url: raw.shop_url,
            software: raw.software,
        }
    }
}

/// Leading number of a string, e.g. `"15.6\" OLED"` -> 15.6
fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let end = text
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    text[..end].parse().ok()
}

/// Parses capacities such as "16GB", "1TB" or "512 GB" into gigabytes
pub fn parse_capacity_gb(text: &str) -> Option<u32> {
    let value = leading_number(text)?;
    let upper = text.to_ascii_uppercase();
    let gb = if upper.contains("TB") {
        value * 1024.0
    } else if upper.contains("GB") {
        value
    } else {
        return None;
    };
    if gb.is_finite() && gb > 0.0 && gb <= u32::MAX as f64 {
        Some(gb.round() as u32)
    } else {
        None
    }
}

/// Parses storage descriptors such as "1TB SSD" into capacity and kind
pub fn parse_storage(text: &str) -> (Option<u32>, Option<StorageKind>) {
    let upper = text.to_ascii_uppercase();
    let kind = if upper.contains("SSD") || upper.contains("NVME") {
        Some(StorageKind::Ssd)
    } else if upper.contains("HDD") {
        Some(StorageKind::Hdd)
    } else if upper.contains("EMMC") {
        Some(StorageKind::Emmc)
    } else {
        None
    };
    (parse_capacity_gb(text), kind)
}

/// Parses battery claims such as "Up to 22 hours"
pub fn parse_battery_hours(text: &str) -> Option<f64> {
    text.split_whitespace()
        .find_map(leading_number)
        .filter(|hours| *hours > 0.0)
}

/// Parses weights such as "1.96 kg (4.31 pounds)" or "3.5 lbs" into kilograms
pub fn parse_weight_kg(text: &str) -> Option<f64> {
    let value = leading_number(text).filter(|w| *w > 0.0)?;
    let lower = text.to_ascii_lowercase();
    let unit_end = lower.find('(').unwrap_or(lower.len());
    let unit = &lower[..unit_end];
    if unit.contains("kg") {
        Some(value)
    } else if unit.contains("lb") || unit.contains("pound") {
        Some(value * 0.453_592)
    } else {
        None
    }
}

/// Parses the screen diagonal out of a display descriptor, e.g. `14" QHD` -> 14.0
pub fn parse_display_inches(text: &str) -> Option<f64> {
    let quote = text.find(&['"', '\u{201d}'][..])?;
    leading_number(&text[..quote]).filter(|inches| *inches > 0.0)
}
