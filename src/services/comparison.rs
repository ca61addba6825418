use serde::Serialize;

use crate::{
    models::{LaptopId, LaptopRecord, StorageKind},
    services::{CatalogStore, FavoritesManager},
};

/// Placeholder for a specification the catalog does not know
pub const MISSING_VALUE: &str = "—";

/// One specification row across every compared laptop
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComparisonRow {
    pub label: String,
    pub values: Vec<String>,
}

/// Side-by-side specifications of the laptops being compared
///
/// Columns follow favoriting order.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ComparisonTable {
    pub ids: Vec<LaptopId>,
    pub headers: Vec<String>,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    /// Builds the table for the current comparison; empty unless comparing
    ///
    /// Favorites whose id is no longer in the catalog are skipped.
    pub fn build(catalog: &CatalogStore, favorites: &FavoritesManager) -> Self {
        let records: Vec<&LaptopRecord> = favorites
            .comparison()
            .into_iter()
            .filter_map(|entry| catalog.get(&entry.id))
            .collect();

        if records.is_empty() {
            return Self::default();
        }

        let rows = vec![
            row("Processor", &records, |r| r.specs.processor.clone()),
            row("RAM", &records, |r| r.specs.memory_gb.map(format_capacity)),
            row("Storage", &records, format_storage),
            row("Display", &records, |r| r.specs.display.clone()),
            row("Graphics", &records, |r| r.specs.graphics.clone()),
            row("Battery", &records, |r| {
                r.specs.battery_hours.map(|hours| format!("Up to {} hours", hours))
            }),
            row("Weight", &records, |r| {
                r.specs.weight_kg.map(|kg| format!("{:.2} kg", kg))
            }),
            row("Price", &records, |r| Some(format_price(r.price))),
        ];

        Self {
            ids: records.iter().map(|record| record.id.clone()).collect(),
            headers: records.iter().map(|record| record.name.clone()).collect(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

fn row(
    label: &str,
    records: &[&LaptopRecord],
    cell: impl Fn(&LaptopRecord) -> Option<String>,
) -> ComparisonRow {
    ComparisonRow {
        label: label.to_string(),
        values: records
            .iter()
            .map(|&record| cell(record).unwrap_or_else(|| MISSING_VALUE.to_string()))
            .collect(),
    }
}

fn format_capacity(gb: u32) -> String {
    if gb >= 1024 && gb % 1024 == 0 {
        format!("{}TB", gb / 1024)
    } else {
        format!("{}GB", gb)
    }
}

fn format_storage(record: &LaptopRecord) -> Option<String> {
    let capacity = format_capacity(record.specs.storage_gb?);
    let kind = match record.specs.storage_kind {
        Some(StorageKind::Ssd) => " SSD",
        Some(StorageKind::Hdd) => " HDD",
        Some(StorageKind::Emmc) => " eMMC",
        None => "",
    };
    Some(format!("{}{}", capacity, kind))
}

/// Whole currency units with thousands separators, cents when present
fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return MISSING_VALUE.to_string();
    }
    let cents = (price * 100.0).round() as i64;
    let (whole, fraction) = (cents.unsigned_abs() / 100, cents.unsigned_abs() % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if cents < 0 { "-" } else { "" };
    if fraction == 0 {
        format!("{}${}", sign, grouped)
    } else {
        format!("{}${}.{:02}", sign, grouped, fraction)
    }
}
